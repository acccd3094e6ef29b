use std::{fmt, future::Future, time::Duration};

use futures::future::{Either, select};

pub const ACCEPTED_EMAIL: &str = "admin@barangay.gov.ph";
pub const ACCEPTED_PASSWORD: &str = "admin123";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    InvalidCredentials,
    NetworkError(String),
    Timeout,
}

pub trait Authenticator {
    fn authenticate(&self, credentials: &Credentials) -> impl Future<Output = AuthOutcome>;
}

/// Source of timers, so the same authenticator runs on the GPUI executor and
/// in plain unit tests.
pub trait Delay {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + 'static;
}

impl Delay for gpui::BackgroundExecutor {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + 'static {
        self.timer(duration)
    }
}

/// Stand-in for a real sign-in endpoint: one accepted account, answered after
/// a fixed delay.
pub struct SimulatedAuthenticator<D: Delay> {
    delay: D,
    latency: Duration,
}

impl<D: Delay> SimulatedAuthenticator<D> {
    pub fn new(delay: D, latency: Duration) -> Self {
        Self { delay, latency }
    }
}

impl<D: Delay> Authenticator for SimulatedAuthenticator<D> {
    async fn authenticate(&self, credentials: &Credentials) -> AuthOutcome {
        log::info!("[auth] checking credentials for {}", credentials.email);
        self.delay.sleep(self.latency).await;

        if credentials.email == ACCEPTED_EMAIL && credentials.password == ACCEPTED_PASSWORD {
            AuthOutcome::Success
        } else {
            AuthOutcome::InvalidCredentials
        }
    }
}

/// Resolves to [`AuthOutcome::Timeout`] if `limit` elapses before the
/// authentication finishes.
pub async fn with_timeout<D: Delay>(
    authentication: impl Future<Output = AuthOutcome>,
    delay: &D,
    limit: Duration,
) -> AuthOutcome {
    let authentication = std::pin::pin!(authentication);
    let timer = std::pin::pin!(delay.sleep(limit));
    match select(authentication, timer).await {
        Either::Left((outcome, _)) => outcome,
        Either::Right(((), _)) => {
            log::warn!("[auth] no answer after {}ms", limit.as_millis());
            AuthOutcome::Timeout
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{cell::RefCell, future::Future, rc::Rc, time::Duration};

    use super::{AuthOutcome, Authenticator, Credentials, Delay};

    /// Completes immediately and remembers what it was asked to wait for.
    #[derive(Clone, Default)]
    pub struct InstantDelay {
        pub requested: Rc<RefCell<Vec<Duration>>>,
    }

    impl Delay for InstantDelay {
        fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + 'static {
            self.requested.borrow_mut().push(duration);
            futures::future::ready(())
        }
    }

    /// Never completes.
    pub struct StalledDelay;

    impl Delay for StalledDelay {
        fn sleep(&self, _: Duration) -> impl Future<Output = ()> + 'static {
            futures::future::pending()
        }
    }

    pub struct FixedAuthenticator(pub AuthOutcome);

    impl Authenticator for FixedAuthenticator {
        async fn authenticate(&self, _: &Credentials) -> AuthOutcome {
            self.0.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::{testing::*, *};

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn accepts_only_the_known_account() {
        let delay = InstantDelay::default();
        let authenticator = SimulatedAuthenticator::new(delay.clone(), Duration::from_secs(2));

        let accepted = block_on(authenticator.authenticate(&credentials(ACCEPTED_EMAIL, ACCEPTED_PASSWORD)));
        assert_eq!(accepted, AuthOutcome::Success);

        let wrong = block_on(authenticator.authenticate(&credentials(ACCEPTED_EMAIL, "wrongpass")));
        assert_eq!(wrong, AuthOutcome::InvalidCredentials);

        let other = block_on(authenticator.authenticate(&credentials("clerk@barangay.gov.ph", ACCEPTED_PASSWORD)));
        assert_eq!(other, AuthOutcome::InvalidCredentials);

        assert_eq!(*delay.requested.borrow(), vec![Duration::from_secs(2); 3]);
    }

    #[test]
    fn timeout_wins_over_stalled_authentication() {
        let stalled = SimulatedAuthenticator::new(StalledDelay, Duration::from_secs(2));
        let limit = InstantDelay::default();
        let creds = credentials(ACCEPTED_EMAIL, ACCEPTED_PASSWORD);

        let outcome = block_on(with_timeout(
            stalled.authenticate(&creds),
            &limit,
            Duration::from_secs(10),
        ));
        assert_eq!(outcome, AuthOutcome::Timeout);
    }

    #[test]
    fn finished_authentication_beats_pending_timer() {
        let authenticator = FixedAuthenticator(AuthOutcome::InvalidCredentials);
        let creds = credentials(ACCEPTED_EMAIL, "nope123");

        let outcome = block_on(with_timeout(
            authenticator.authenticate(&creds),
            &StalledDelay,
            Duration::from_secs(10),
        ));
        assert_eq!(outcome, AuthOutcome::InvalidCredentials);
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", credentials(ACCEPTED_EMAIL, ACCEPTED_PASSWORD));
        assert!(rendered.contains(ACCEPTED_EMAIL));
        assert!(!rendered.contains(ACCEPTED_PASSWORD));
    }
}
