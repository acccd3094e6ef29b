use gpui::{Context, Subscription, Window, WindowAppearance};

use crate::{
    appearance::{EffectiveTheme, SystemSignal, ThemePreference, ThemeResolver},
    preference_store::FileStore,
    settings::Settings,
    theme::ActiveTheme,
};

pub fn system_signal(appearance: WindowAppearance) -> SystemSignal {
    match appearance {
        WindowAppearance::Dark | WindowAppearance::VibrantDark => SystemSignal::Dark,
        WindowAppearance::Light | WindowAppearance::VibrantLight => SystemSignal::Light,
    }
}

/// Window-scoped owner of the theme resolver.
///
/// Publishes the applied marker as the [`ActiveTheme`] global and holds the
/// window appearance subscription only while the preference is `system`.
pub struct ThemeProvider {
    resolver: ThemeResolver<FileStore>,
    appearance_subscription: Option<Subscription>,
}

impl ThemeProvider {
    pub fn new(store: FileStore, settings: &Settings) -> Self {
        log::info!("[theme] preference store: {}", store.path().display());
        Self {
            resolver: ThemeResolver::new(store, settings.default_theme, &settings.storage_key),
            appearance_subscription: None,
        }
    }

    pub fn initialize(&mut self, window: &mut Window, context: &mut Context<Self>) {
        self.resolver
            .initialize(system_signal(window.appearance()));
        self.sync(window, context);
    }

    pub fn preference(&self) -> ThemePreference {
        self.resolver.preference()
    }

    pub fn effective_theme(&self) -> EffectiveTheme {
        self.resolver.effective_theme()
    }

    pub fn set_theme(
        &mut self,
        preference: ThemePreference,
        window: &mut Window,
        context: &mut Context<Self>,
    ) {
        self.refresh_system(window);
        self.resolver.set_theme(preference);
        self.sync(window, context);
    }

    pub fn toggle_theme(&mut self, window: &mut Window, context: &mut Context<Self>) {
        self.refresh_system(window);
        self.resolver.toggle_theme();
        self.sync(window, context);
    }

    // Appearance changes are only observed under `system`, so the signal can
    // be stale by the time the preference changes.
    fn refresh_system(&mut self, window: &Window) {
        self.resolver
            .system_changed(system_signal(window.appearance()));
    }

    fn sync(&mut self, window: &mut Window, context: &mut Context<Self>) {
        match (
            self.resolver.wants_system_notifications(),
            self.appearance_subscription.is_some(),
        ) {
            (true, false) => {
                log::debug!("[theme] following window appearance");
                self.appearance_subscription = Some(context.observe_window_appearance(
                    window,
                    |this, window, context| {
                        this.resolver
                            .system_changed(system_signal(window.appearance()));
                        this.publish(window, context);
                    },
                ));
            }
            (false, true) => {
                log::debug!("[theme] no longer following window appearance");
                self.appearance_subscription = None;
            }
            _ => {}
        }
        self.publish(window, context);
    }

    fn publish(&mut self, window: &mut Window, context: &mut Context<Self>) {
        let Some(marker) = self.resolver.applied() else {
            return;
        };
        let changed = context
            .try_global::<ActiveTheme>()
            .is_none_or(|active| active.marker != marker);
        if changed {
            context.set_global(ActiveTheme { marker });
            window.refresh();
        }
        context.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vibrant_appearances_map_like_plain_ones() {
        assert_eq!(system_signal(WindowAppearance::Dark), SystemSignal::Dark);
        assert_eq!(system_signal(WindowAppearance::VibrantDark), SystemSignal::Dark);
        assert_eq!(system_signal(WindowAppearance::Light), SystemSignal::Light);
        assert_eq!(system_signal(WindowAppearance::VibrantLight), SystemSignal::Light);
    }
}
