mod appearance;
mod authenticator;
mod components;
mod login_form;
mod login_screen;
mod preference_store;
mod settings;
mod text_input;
mod theme;
mod theme_provider;

use gpui::{
    Application, Bounds, KeyBinding, WindowBackgroundAppearance, WindowBounds, WindowOptions,
    prelude::*, px, size,
};

use crate::{
    login_screen::{
        Activate, FocusNext, FocusPrevious, FollowSystemTheme, LoginScreen, Quit, Submit,
        ToggleTheme,
    },
    preference_store::FileStore,
    settings::Settings,
    text_input::{
        Backspace, Copy, Cut, Delete, End, Home, Left, Paste, Right, SelectAll, SelectLeft,
        SelectRight,
    },
    theme::{WINDOW_HEIGHT, WINDOW_WIDTH},
    theme_provider::ThemeProvider,
};

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("barangay_shell=info"),
    )
    .init();

    log::info!(
        "barangay-shell v{} starting (RUST_LOG={})",
        env!("CARGO_PKG_VERSION"),
        std::env::var("RUST_LOG").unwrap_or_else(|_| "<default: info>".into()),
    );

    let settings = Settings::load();
    log::info!(
        "[startup] default_theme={} storage_key={} delay={}ms timeout={}ms",
        settings.default_theme,
        settings.storage_key,
        settings.authentication_delay_ms,
        settings.authentication_timeout_ms,
    );

    Application::new().run(move |context| {
        let bounds = Bounds::centered(None, size(px(WINDOW_WIDTH), px(WINDOW_HEIGHT)), context);

        bind_keys(context);

        let window = context.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(bounds)),
                titlebar: None,
                window_background: WindowBackgroundAppearance::Opaque,
                ..Default::default()
            },
            |window, context| {
                let store = FileStore::new(FileStore::default_path());
                let theme = context.new(|_| ThemeProvider::new(store, &settings));
                theme.update(context, |provider, context| {
                    provider.initialize(window, context);
                });

                context.new(|context| {
                    LoginScreen::new(
                        theme,
                        settings.authentication_delay(),
                        settings.authentication_timeout(),
                        context,
                    )
                })
            },
        );

        match window {
            Ok(window) => {
                if let Err(error) = window.update(context, |view, window, context| {
                    let handle = view.email_focus_handle(context);
                    window.focus(&handle);
                    context.activate(true);
                }) {
                    log::error!("[startup] failed to initialize application window: {error}");
                    context.quit();
                }
            }
            Err(error) => {
                log::error!("[startup] failed to open application window: {error}");
                context.quit();
            }
        }
    });
}

fn bind_keys(context: &mut gpui::App) {
    context.bind_keys([
        KeyBinding::new("backspace", Backspace, Some("TextInput")),
        KeyBinding::new("delete", Delete, Some("TextInput")),
        KeyBinding::new("left", Left, Some("TextInput")),
        KeyBinding::new("right", Right, Some("TextInput")),
        KeyBinding::new("shift-left", SelectLeft, Some("TextInput")),
        KeyBinding::new("shift-right", SelectRight, Some("TextInput")),
        KeyBinding::new("home", Home, Some("TextInput")),
        KeyBinding::new("end", End, Some("TextInput")),
        KeyBinding::new("cmd-a", SelectAll, Some("TextInput")),
        KeyBinding::new("cmd-v", Paste, Some("TextInput")),
        KeyBinding::new("cmd-c", Copy, Some("TextInput")),
        KeyBinding::new("cmd-x", Cut, Some("TextInput")),
        KeyBinding::new("ctrl-a", SelectAll, Some("TextInput")),
        KeyBinding::new("ctrl-v", Paste, Some("TextInput")),
        KeyBinding::new("ctrl-c", Copy, Some("TextInput")),
        KeyBinding::new("ctrl-x", Cut, Some("TextInput")),
    ]);

    context.bind_keys([KeyBinding::new("space", Activate, Some("LoginControl"))]);

    context.bind_keys([
        KeyBinding::new("tab", FocusNext, Some("LoginScreen")),
        KeyBinding::new("shift-tab", FocusPrevious, Some("LoginScreen")),
        KeyBinding::new("enter", Submit, Some("LoginScreen")),
        KeyBinding::new("cmd-shift-l", ToggleTheme, Some("LoginScreen")),
        KeyBinding::new("ctrl-shift-l", ToggleTheme, Some("LoginScreen")),
        KeyBinding::new("cmd-shift-s", FollowSystemTheme, Some("LoginScreen")),
        KeyBinding::new("ctrl-shift-s", FollowSystemTheme, Some("LoginScreen")),
        KeyBinding::new("cmd-q", Quit, Some("LoginScreen")),
        KeyBinding::new("ctrl-q", Quit, Some("LoginScreen")),
    ]);
}
