use crate::authenticator::{AuthOutcome, Authenticator, Credentials};

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters long";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password. Please try again.";
pub const UNEXPECTED_FAILURE: &str = "An error occurred. Please try again later.";
pub const TIMED_OUT: &str = "The server took too long to respond. Please try again.";

const MINIMUM_PASSWORD_LENGTH: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub email: Option<String>,
    pub password: Option<String>,
    pub general: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none() && self.general.is_none()
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Email => self.email.as_deref(),
            Field::Password => self.password.as_deref(),
        }
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Rejected,
    Succeeded,
    /// The attempt completed with a `general` error.
    Failed,
}

#[derive(Default)]
pub struct LoginForm {
    email: String,
    password: String,
    loading: bool,
    password_visible: bool,
    errors: FormErrors,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_password_visible(&self) -> bool {
        self.password_visible
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn update_field(&mut self, field: Field, value: &str) {
        match field {
            Field::Email => self.email = value.to_string(),
            Field::Password => self.password = value.to_string(),
        }
        let slot = self.errors.slot(field);
        if slot.is_some() {
            *slot = None;
        }
    }

    pub fn validate(&mut self) -> bool {
        let mut errors = FormErrors::default();

        if self.email.trim().is_empty() {
            errors.email = Some(EMAIL_REQUIRED.into());
        } else if !looks_like_email(&self.email) {
            errors.email = Some(EMAIL_INVALID.into());
        }

        if self.password.is_empty() {
            errors.password = Some(PASSWORD_REQUIRED.into());
        } else if self.password.encode_utf16().count() < MINIMUM_PASSWORD_LENGTH {
            errors.password = Some(PASSWORD_TOO_SHORT.into());
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// Validates and, when the form is acceptable, enters the loading state
    /// and hands out the credentials to check. Pair with [`Self::finish_submit`].
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if !self.validate() {
            log::debug!("[login] submit rejected by validation");
            return None;
        }
        self.loading = true;
        self.errors = FormErrors::default();
        Some(Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }

    pub fn finish_submit(&mut self, outcome: AuthOutcome) -> SubmitOutcome {
        self.loading = false;
        match outcome {
            AuthOutcome::Success => {
                log::info!("[login] signed in as {}", self.email);
                SubmitOutcome::Succeeded
            }
            AuthOutcome::InvalidCredentials => {
                log::info!("[login] credentials rejected for {}", self.email);
                self.errors.general = Some(INVALID_CREDENTIALS.into());
                SubmitOutcome::Failed
            }
            AuthOutcome::Timeout => {
                log::warn!("[login] authentication timed out");
                self.errors.general = Some(TIMED_OUT.into());
                SubmitOutcome::Failed
            }
            AuthOutcome::NetworkError(message) => {
                log::warn!("[login] authentication failed: {message}");
                self.errors.general = Some(UNEXPECTED_FAILURE.into());
                SubmitOutcome::Failed
            }
        }
    }

    pub async fn submit(&mut self, authenticator: &impl Authenticator) -> SubmitOutcome {
        let Some(credentials) = self.begin_submit() else {
            return SubmitOutcome::Rejected;
        };
        let outcome = authenticator.authenticate(&credentials).await;
        self.finish_submit(outcome)
    }

    pub fn toggle_password_visibility(&mut self) {
        self.password_visible = !self.password_visible;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// `local@domain.tld`: no whitespace anywhere, exactly one `@`, and a dot in
/// the domain with something on both sides of it.
pub fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .filter(|(_, character)| *character == '.')
        .any(|(index, _)| index > 0 && index + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::executor::block_on;

    use super::*;
    use crate::authenticator::{
        ACCEPTED_EMAIL, ACCEPTED_PASSWORD, SimulatedAuthenticator,
        testing::{FixedAuthenticator, InstantDelay},
    };

    fn form(email: &str, password: &str) -> LoginForm {
        let mut form = LoginForm::new();
        form.update_field(Field::Email, email);
        form.update_field(Field::Password, password);
        form
    }

    fn simulated() -> SimulatedAuthenticator<InstantDelay> {
        SimulatedAuthenticator::new(InstantDelay::default(), Duration::from_secs(2))
    }

    /// Records whether an authentication was attempted at all.
    struct Probe<'a> {
        called: &'a std::cell::Cell<bool>,
    }

    impl Authenticator for Probe<'_> {
        async fn authenticate(&self, _: &Credentials) -> AuthOutcome {
            self.called.set(true);
            AuthOutcome::InvalidCredentials
        }
    }

    #[test]
    fn bad_input_yields_both_field_errors_without_loading() {
        let mut form = form("not-an-email", "123");
        let called = std::cell::Cell::new(false);

        let outcome = block_on(form.submit(&Probe { called: &called }));

        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert!(!called.get());
        assert!(!form.is_loading());
        assert_eq!(form.errors().email.as_deref(), Some(EMAIL_INVALID));
        assert_eq!(form.errors().password.as_deref(), Some(PASSWORD_TOO_SHORT));
        assert!(form.errors().general.is_none());
    }

    #[test]
    fn accepted_account_signs_in() {
        let mut form = form(ACCEPTED_EMAIL, ACCEPTED_PASSWORD);
        let outcome = block_on(form.submit(&simulated()));

        assert_eq!(outcome, SubmitOutcome::Succeeded);
        assert!(form.errors().is_empty());
        assert!(!form.is_loading());
    }

    #[test]
    fn wrong_password_sets_general_error() {
        let mut form = form(ACCEPTED_EMAIL, "wrongpass");
        let outcome = block_on(form.submit(&simulated()));

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(form.errors().general.as_deref(), Some(INVALID_CREDENTIALS));
        assert!(form.errors().email.is_none());
        assert!(!form.is_loading());
    }

    #[test]
    fn loading_is_held_between_halves() {
        let mut form = form(ACCEPTED_EMAIL, "wrongpass");
        let credentials = form.begin_submit().unwrap();
        assert!(form.is_loading());
        assert_eq!(credentials.email, ACCEPTED_EMAIL);

        form.finish_submit(AuthOutcome::InvalidCredentials);
        assert!(!form.is_loading());
    }

    #[test]
    fn infrastructure_failures_map_to_general_errors() {
        let mut form = form(ACCEPTED_EMAIL, ACCEPTED_PASSWORD);
        let failing = FixedAuthenticator(AuthOutcome::NetworkError("connection reset".into()));
        assert_eq!(block_on(form.submit(&failing)), SubmitOutcome::Failed);
        assert_eq!(form.errors().general.as_deref(), Some(UNEXPECTED_FAILURE));
        assert!(!form.is_loading());

        let stalled = FixedAuthenticator(AuthOutcome::Timeout);
        assert_eq!(block_on(form.submit(&stalled)), SubmitOutcome::Failed);
        assert_eq!(form.errors().general.as_deref(), Some(TIMED_OUT));
        assert!(!form.is_loading());
    }

    #[test]
    fn typing_clears_only_that_fields_error() {
        let mut form = form("not-an-email", "123");
        assert!(!form.validate());

        form.update_field(Field::Email, "a");
        form.update_field(Field::Email, "ad");
        form.update_field(Field::Email, "adm");

        assert!(form.errors().email.is_none());
        assert_eq!(form.errors().password.as_deref(), Some(PASSWORD_TOO_SHORT));
    }

    #[test]
    fn validation_recomputes_from_scratch() {
        let mut form = form(ACCEPTED_EMAIL, "wrongpass");
        block_on(form.submit(&simulated()));
        assert!(form.errors().general.is_some());

        assert!(form.validate());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn empty_fields_are_required() {
        let mut form = form("   ", "");
        assert!(!form.validate());
        assert_eq!(form.errors().field(Field::Email), Some(EMAIL_REQUIRED));
        assert_eq!(form.errors().field(Field::Password), Some(PASSWORD_REQUIRED));
    }

    #[test]
    fn password_length_counts_utf16_units() {
        let mut form = form(ACCEPTED_EMAIL, "ñññññ");
        assert!(!form.validate());

        form.update_field(Field::Password, "ññññññ");
        assert!(form.validate());

        // Each emoji is a surrogate pair.
        form.update_field(Field::Password, "😀😀😀");
        assert!(form.validate());
        form.update_field(Field::Password, "😀😀");
        assert!(!form.validate());
    }

    #[test]
    fn password_visibility_does_not_affect_validation() {
        let mut form = form(ACCEPTED_EMAIL, ACCEPTED_PASSWORD);
        form.toggle_password_visibility();
        assert!(form.is_password_visible());
        assert!(form.validate());
        form.toggle_password_visibility();
        assert!(!form.is_password_visible());
    }

    #[test]
    fn failed_attempt_can_be_retried() {
        let mut form = form(ACCEPTED_EMAIL, "wrongpass");
        assert_eq!(block_on(form.submit(&simulated())), SubmitOutcome::Failed);

        form.update_field(Field::Password, ACCEPTED_PASSWORD);
        assert_eq!(block_on(form.submit(&simulated())), SubmitOutcome::Succeeded);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let mut form = form("x", "y");
        form.validate();
        form.toggle_password_visibility();
        form.reset();
        assert_eq!(form.email(), "");
        assert_eq!(form.password(), "");
        assert!(form.errors().is_empty());
        assert!(!form.is_password_visible());
    }

    #[test]
    fn email_shape() {
        for valid in ["a@b.co", "admin@barangay.gov.ph", "first.last@sub.domain.org"] {
            assert!(looks_like_email(valid), "{valid}");
        }
        for invalid in [
            "not-an-email",
            "@b.co",
            "a@b",
            "a@.co",
            "a@b.",
            "a@@b.co",
            "a@b@c.co",
            "a b@c.co",
            "a@b .co",
        ] {
            assert!(!looks_like_email(invalid), "{invalid}");
        }
    }
}
