use std::time::Duration;

use gpui::{
    App, AsyncApp, Context, CursorStyle, Entity, FocusHandle, Focusable, MouseButton,
    MouseUpEvent, Subscription, WeakEntity, Window, actions, div, prelude::*, px, rgb,
};

use crate::{
    appearance::ThemePreference,
    authenticator::{AuthOutcome, Authenticator, SimulatedAuthenticator, with_timeout},
    components::*,
    login_form::{Field, FormErrors, LoginForm, SubmitOutcome},
    text_input::{TextInput, TextInputEvent},
    theme::*,
    theme_provider::ThemeProvider,
};

actions!(
    barangay,
    [
        Submit,
        FocusNext,
        FocusPrevious,
        Activate,
        ToggleTheme,
        FollowSystemTheme,
        Quit
    ]
);

const TITLE: &str = "Barangay Management System";
// Key context of the non-text controls, so space activates them without
// reaching the text inputs.
const CONTROL_CONTEXT: &str = "LoginControl";
// Label row plus gap plus half of the remaining field height.
const PASSWORD_CONTROL_TOP: f32 = LINE_HEIGHT_MEDIUM + GAP_EXTRA_SMALL + 8.0;

pub struct LoginScreen {
    theme: Entity<ThemeProvider>,
    form: LoginForm,
    email_input: Entity<TextInput>,
    password_input: Entity<TextInput>,
    remember_me: bool,
    signed_in_as: Option<String>,
    authentication_delay: Duration,
    authentication_timeout: Duration,
    focus_handle: FocusHandle,
    theme_toggle_focus_handle: FocusHandle,
    show_password_focus_handle: FocusHandle,
    remember_me_focus_handle: FocusHandle,
    forgot_password_focus_handle: FocusHandle,
    submit_focus_handle: FocusHandle,
    _subscriptions: Vec<Subscription>,
}

impl LoginScreen {
    pub fn new(
        theme: Entity<ThemeProvider>,
        authentication_delay: Duration,
        authentication_timeout: Duration,
        context: &mut Context<Self>,
    ) -> Self {
        let email_input = TextInput::new(context, "Enter your email", Some("✉"), false);
        let password_input = TextInput::new(context, "Enter your password", Some("⚿"), true);

        let subscriptions = vec![
            context.observe(&theme, |_, _, context| context.notify()),
            context.subscribe(&email_input, |this, _, event: &TextInputEvent, context| {
                let TextInputEvent::Changed(value) = event;
                this.form.update_field(Field::Email, value);
                context.notify();
            }),
            context.subscribe(&password_input, |this, _, event: &TextInputEvent, context| {
                let TextInputEvent::Changed(value) = event;
                this.form.update_field(Field::Password, value);
                context.notify();
            }),
        ];

        Self {
            theme,
            form: LoginForm::new(),
            email_input,
            password_input,
            remember_me: false,
            signed_in_as: None,
            authentication_delay,
            authentication_timeout,
            focus_handle: context.focus_handle(),
            theme_toggle_focus_handle: context.focus_handle(),
            show_password_focus_handle: context.focus_handle(),
            remember_me_focus_handle: context.focus_handle(),
            forgot_password_focus_handle: context.focus_handle(),
            submit_focus_handle: context.focus_handle(),
            _subscriptions: subscriptions,
        }
    }

    pub fn email_focus_handle(&self, context: &App) -> FocusHandle {
        self.email_input.read(context).focus_handle.clone()
    }

    fn submit(&mut self, _: &Submit, _window: &mut Window, context: &mut Context<Self>) {
        if self.form.is_loading() {
            return;
        }
        self.signed_in_as = None;

        let Some(credentials) = self.form.begin_submit() else {
            context.notify();
            return;
        };

        let executor = context.background_executor().clone();
        let latency = self.authentication_delay;
        let limit = self.authentication_timeout;

        context
            .spawn(async move |this: WeakEntity<Self>, context: &mut AsyncApp| {
                let authenticator = SimulatedAuthenticator::new(executor.clone(), latency);
                let outcome =
                    with_timeout(authenticator.authenticate(&credentials), &executor, limit).await;

                if let Err(error) = this.update(context, |this, context| {
                    this.complete_submit(outcome, context);
                }) {
                    log::warn!("[login] screen closed before authentication finished: {error}");
                }
            })
            .detach();

        context.notify();
    }

    fn complete_submit(&mut self, outcome: AuthOutcome, context: &mut Context<Self>) {
        let email = self.form.email().to_string();
        if self.form.finish_submit(outcome) == SubmitOutcome::Succeeded {
            self.signed_in_as = Some(email);
            self.form.reset();
            self.email_input
                .update(context, |input, context| input.set_text("", context));
            self.password_input
                .update(context, |input, context| input.set_text("", context));
        }
        context.notify();
    }

    fn toggle_password_visibility(&mut self, context: &mut Context<Self>) {
        self.form.toggle_password_visibility();
        context.notify();
    }

    fn toggle_remember_me(&mut self, context: &mut Context<Self>) {
        self.remember_me = !self.remember_me;
        context.notify();
    }

    fn forgot_password(&mut self) {
        log::info!("[login] password recovery requested; no recovery flow is available");
    }

    fn toggle_theme(&mut self, _: &ToggleTheme, window: &mut Window, context: &mut Context<Self>) {
        self.theme
            .update(context, |theme, context| theme.toggle_theme(window, context));
    }

    fn follow_system_theme(
        &mut self,
        _: &FollowSystemTheme,
        window: &mut Window,
        context: &mut Context<Self>,
    ) {
        self.theme.update(context, |theme, context| {
            theme.set_theme(ThemePreference::System, window, context);
        });
    }

    fn activate(&mut self, _: &Activate, window: &mut Window, context: &mut Context<Self>) {
        if self.theme_toggle_focus_handle.is_focused(window) {
            self.toggle_theme(&ToggleTheme, window, context);
        } else if self.show_password_focus_handle.is_focused(window) {
            self.toggle_password_visibility(context);
        } else if self.remember_me_focus_handle.is_focused(window) {
            self.toggle_remember_me(context);
        } else if self.forgot_password_focus_handle.is_focused(window) {
            self.forgot_password();
        } else if self.submit_focus_handle.is_focused(window) {
            self.submit(&Submit, window, context);
        }
    }

    fn focus_order(&self, context: &App) -> Vec<FocusHandle> {
        vec![
            self.email_focus_handle(context),
            self.password_input.read(context).focus_handle.clone(),
            self.show_password_focus_handle.clone(),
            self.remember_me_focus_handle.clone(),
            self.forgot_password_focus_handle.clone(),
            self.submit_focus_handle.clone(),
            self.theme_toggle_focus_handle.clone(),
        ]
    }

    fn focus_step(&mut self, forward: bool, window: &mut Window, context: &mut Context<Self>) {
        let order = self.focus_order(context);
        let current = order.iter().position(|handle| handle.is_focused(window));
        let next = match (current, forward) {
            (Some(index), true) => (index + 1) % order.len(),
            (Some(index), false) => (index + order.len() - 1) % order.len(),
            (None, _) => 0,
        };
        window.focus(&order[next]);
    }

    fn focus_next(&mut self, _: &FocusNext, window: &mut Window, context: &mut Context<Self>) {
        self.focus_step(true, window, context);
    }

    fn focus_previous(
        &mut self,
        _: &FocusPrevious,
        window: &mut Window,
        context: &mut Context<Self>,
    ) {
        self.focus_step(false, window, context);
    }

    fn quit(&mut self, _: &Quit, _window: &mut Window, context: &mut Context<Self>) {
        log::info!("[quit] shutting down");
        context.quit();
    }
}

impl Focusable for LoginScreen {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for LoginScreen {
    fn render(&mut self, _window: &mut Window, context: &mut Context<Self>) -> impl IntoElement {
        let palette = ActiveTheme::palette(context);
        let loading = self.form.is_loading();
        let errors = self.form.errors().clone();
        let password_visible = self.form.is_password_visible();
        let effective_theme = self.theme.read(context).effective_theme();
        let follows_system = self.theme.read(context).preference() == ThemePreference::System;

        self.email_input.update(context, |input, _| {
            input.disabled = loading;
            input.invalid = errors.field(Field::Email).is_some();
        });
        self.password_input.update(context, |input, context| {
            input.disabled = loading;
            input.invalid = errors.field(Field::Password).is_some();
            input.set_masked(!password_visible, context);
        });

        div()
            .key_context("LoginScreen")
            .track_focus(&self.focus_handle(context))
            .on_action(context.listener(Self::submit))
            .on_action(context.listener(Self::focus_next))
            .on_action(context.listener(Self::focus_previous))
            .on_action(context.listener(Self::activate))
            .on_action(context.listener(Self::toggle_theme))
            .on_action(context.listener(Self::follow_system_theme))
            .on_action(context.listener(Self::quit))
            .flex()
            .flex_col()
            .size_full()
            .bg(rgb(palette.surface))
            .text_color(rgb(palette.text_primary))
            .child(self.render_titlebar(palette, context))
            .child(
                div()
                    .relative()
                    .flex()
                    .flex_1()
                    .items_center()
                    .justify_center()
                    .p(px(PADDING_SCREEN))
                    .child(
                        div()
                            .absolute()
                            .top(px(PADDING_SCREEN))
                            .right(px(PADDING_SCREEN))
                            .flex()
                            .flex_col()
                            .items_end()
                            .gap(px(GAP_EXTRA_SMALL))
                            .child(
                                theme_toggle(
                                    effective_theme,
                                    &self.theme_toggle_focus_handle,
                                    palette,
                                )
                                .key_context(CONTROL_CONTEXT)
                                .on_mouse_up(
                                    MouseButton::Left,
                                    context.listener(|this, _: &MouseUpEvent, window, context| {
                                        this.toggle_theme(&ToggleTheme, window, context);
                                    }),
                                ),
                            )
                            .when(follows_system, |element| {
                                element.child(
                                    div()
                                        .text_size(px(TEXT_SIZE_SMALL))
                                        .text_color(rgb(palette.text_dim))
                                        .child("Following system"),
                                )
                            }),
                    )
                    .child(
                        card(palette)
                            .child(card_header().child(logo_badge("⌂", palette)).child(heading(
                                "Welcome Back",
                                "Sign in to your Barangay Management account",
                                palette,
                            )))
                            .child(self.render_form(
                                &errors,
                                loading,
                                password_visible,
                                palette,
                                context,
                            ))
                            .child(card_footer(palette).child(TITLE)),
                    ),
            )
    }
}

impl LoginScreen {
    fn render_titlebar(&self, palette: &Palette, context: &mut Context<Self>) -> impl IntoElement {
        div()
            .flex()
            .flex_row()
            .items_center()
            .w_full()
            .h(px(TITLEBAR_HEIGHT))
            .bg(rgb(palette.titlebar_background))
            .border_b_1()
            .border_color(rgb(palette.border))
            .child(
                titlebar_title(TITLE, palette)
                    .cursor(CursorStyle::default())
                    .on_mouse_down(
                        MouseButton::Left,
                        context.listener(|_, _, window, _| window.start_window_move()),
                    ),
            )
            .child(titlebar_close(palette).on_mouse_up(
                MouseButton::Left,
                context.listener(|this, _, window, context| this.quit(&Quit, window, context)),
            ))
    }

    fn render_form(
        &self,
        errors: &FormErrors,
        loading: bool,
        password_visible: bool,
        palette: &Palette,
        context: &mut Context<Self>,
    ) -> impl IntoElement {
        let show_hide_hover = palette.text_primary;

        card_content()
            .when_some(errors.general.as_deref(), |element, general| {
                element.child(banner(BannerKind::Error, general, palette))
            })
            .when_some(self.signed_in_as.as_deref(), |element, email| {
                element.child(banner(
                    BannerKind::Success,
                    &format!("Login successful! Signed in as {email}."),
                    palette,
                ))
            })
            .child(field(
                "Email Address",
                &self.email_input,
                errors.field(Field::Email),
                None,
                palette,
            ))
            .child(
                div()
                    .relative()
                    .w_full()
                    .child(field(
                        "Password",
                        &self.password_input,
                        errors.field(Field::Password),
                        Some("At least 6 characters"),
                        palette,
                    ))
                    .child(
                        div()
                            .key_context(CONTROL_CONTEXT)
                            .track_focus(&self.show_password_focus_handle)
                            .absolute()
                            .right(px(PADDING_INPUT_HORIZONTAL))
                            .top(px(PASSWORD_CONTROL_TOP))
                            .cursor_pointer()
                            .text_size(px(TEXT_SIZE_SMALL))
                            .text_color(rgb(palette.text_dim))
                            .hover(move |style| style.text_color(rgb(show_hide_hover)))
                            .focus(move |style| style.text_color(rgb(show_hide_hover)))
                            .child(if password_visible { "Hide" } else { "Show" })
                            .on_mouse_up(
                                MouseButton::Left,
                                context.listener(|this, _: &MouseUpEvent, _, context| {
                                    this.toggle_password_visibility(context);
                                }),
                            ),
                    ),
            )
            .child(
                div()
                    .flex()
                    .flex_row()
                    .items_center()
                    .justify_between()
                    .w_full()
                    .child(
                        checkbox(
                            "Remember me",
                            self.remember_me,
                            &self.remember_me_focus_handle,
                            palette,
                        )
                        .key_context(CONTROL_CONTEXT)
                        .on_mouse_up(
                            MouseButton::Left,
                            context.listener(|this, _: &MouseUpEvent, _, context| {
                                this.toggle_remember_me(context);
                            }),
                        ),
                    )
                    .child(
                        link(
                            "Forgot password?",
                            &self.forgot_password_focus_handle,
                            palette,
                        )
                        .key_context(CONTROL_CONTEXT)
                        .on_mouse_up(
                            MouseButton::Left,
                            context.listener(|this, _: &MouseUpEvent, _, _| {
                                this.forgot_password();
                            }),
                        ),
                    ),
            )
            .child(
                button_action(
                    "Sign In",
                    "Signing in…",
                    loading,
                    &self.submit_focus_handle,
                    palette,
                )
                .key_context(CONTROL_CONTEXT)
                .when(!loading, |element| {
                    element.on_mouse_up(
                        MouseButton::Left,
                        context.listener(|this, _: &MouseUpEvent, window, context| {
                            this.submit(&Submit, window, context);
                        }),
                    )
                }),
            )
    }
}
