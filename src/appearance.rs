use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::preference_store::PreferenceStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    System,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Only the exact lowercase names are accepted.
impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(format!("unknown theme preference {other:?}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectiveTheme {
    Light,
    Dark,
}

impl EffectiveTheme {
    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    pub fn marker(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Last known state of the host's colour scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemSignal {
    Dark,
    Light,
    Unavailable,
}

impl SystemSignal {
    fn resolve(self) -> EffectiveTheme {
        match self {
            Self::Dark => EffectiveTheme::Dark,
            Self::Light | Self::Unavailable => EffectiveTheme::Light,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Ready,
}

/// Reconciles the stored preference, explicit overrides and the system
/// colour scheme into one effective theme, and keeps the root marker and
/// the persisted preference in step with it.
///
/// Until [`ThemeResolver::initialize`] has read the store, every mutation is
/// recorded but no marker is applied and nothing is written.
pub struct ThemeResolver<S: PreferenceStore> {
    store: S,
    storage_key: String,
    default_preference: ThemePreference,
    preference: ThemePreference,
    system: SystemSignal,
    lifecycle: Lifecycle,
    applied: Option<EffectiveTheme>,
}

impl<S: PreferenceStore> ThemeResolver<S> {
    pub fn new(store: S, default_preference: ThemePreference, storage_key: &str) -> Self {
        Self {
            store,
            storage_key: storage_key.to_string(),
            default_preference,
            preference: default_preference,
            system: SystemSignal::Unavailable,
            lifecycle: Lifecycle::Uninitialized,
            applied: None,
        }
    }

    pub fn initialize(&mut self, system: SystemSignal) {
        if self.lifecycle == Lifecycle::Ready {
            log::warn!("[theme] initialize called twice, ignoring");
            return;
        }

        self.system = system;
        self.preference = match self.store.read(&self.storage_key) {
            Ok(Some(saved)) => match saved.parse() {
                Ok(preference) => preference,
                Err(error) => {
                    log::warn!(
                        "[theme] {error} under {}, using default {}",
                        self.storage_key,
                        self.default_preference
                    );
                    self.default_preference
                }
            },
            Ok(None) => self.default_preference,
            Err(error) => {
                log::warn!("[theme] failed to read preference: {error}");
                self.default_preference
            }
        };
        self.lifecycle = Lifecycle::Ready;
        log::info!(
            "[theme] initialized with preference={} system={:?}",
            self.preference,
            self.system
        );
        self.commit();
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    pub fn preference(&self) -> ThemePreference {
        if self.is_ready() {
            self.preference
        } else {
            self.default_preference
        }
    }

    pub fn effective_theme(&self) -> EffectiveTheme {
        if !self.is_ready() {
            return EffectiveTheme::Light;
        }
        match self.preference {
            ThemePreference::Light => EffectiveTheme::Light,
            ThemePreference::Dark => EffectiveTheme::Dark,
            ThemePreference::System => self.system.resolve(),
        }
    }

    /// Marker currently carried by the UI root, `None` before initialization.
    pub fn applied(&self) -> Option<EffectiveTheme> {
        self.applied
    }

    pub fn set_theme(&mut self, next: ThemePreference) {
        self.preference = next;
        self.commit();
    }

    pub fn toggle_theme(&mut self) {
        let next = match self.effective_theme() {
            EffectiveTheme::Dark => ThemePreference::Light,
            EffectiveTheme::Light => ThemePreference::Dark,
        };
        log::info!("[theme] toggling from {} to {next}", self.preference);
        self.set_theme(next);
    }

    /// Whether the host should be delivering colour scheme notifications.
    pub fn wants_system_notifications(&self) -> bool {
        self.is_ready() && self.preference == ThemePreference::System
    }

    /// Records a system colour scheme change. Re-applies the root marker when
    /// the preference follows the system; the preference itself is untouched.
    pub fn system_changed(&mut self, system: SystemSignal) {
        if self.system != system {
            log::info!("[theme] system scheme changed to {system:?}");
        }
        self.system = system;
        if self.wants_system_notifications() {
            self.apply();
        }
    }

    fn commit(&mut self) {
        if !self.is_ready() {
            return;
        }
        self.apply();
        if let Err(error) = self.store.write(&self.storage_key, self.preference.as_str()) {
            log::warn!("[theme] failed to persist preference: {error}");
        }
    }

    fn apply(&mut self) {
        let effective = self.effective_theme();
        if self.applied != Some(effective) {
            self.applied = Some(effective);
            log::debug!("[theme] applied root marker {}", effective.marker());
        }
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference_store::{MemoryStore, StoreError};

    const KEY: &str = "barangay-theme";

    struct FailingStore;

    impl PreferenceStore for FailingStore {
        fn read(&self, _: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Io {
                path: "preferences.toml".into(),
                source: std::io::Error::other("denied"),
            })
        }

        fn write(&mut self, _: &str, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Io {
                path: "preferences.toml".into(),
                source: std::io::Error::other("denied"),
            })
        }
    }

    fn ready(stored: Option<&str>, system: SystemSignal) -> ThemeResolver<MemoryStore> {
        let store = stored
            .map(|value| MemoryStore::with_value(KEY, value))
            .unwrap_or_default();
        let mut resolver = ThemeResolver::new(store, ThemePreference::Light, KEY);
        resolver.initialize(system);
        resolver
    }

    fn stored(resolver: &ThemeResolver<MemoryStore>) -> Option<String> {
        resolver.store().read(KEY).unwrap()
    }

    #[test]
    fn concrete_preference_ignores_system() {
        for system in [SystemSignal::Dark, SystemSignal::Light, SystemSignal::Unavailable] {
            let mut resolver = ready(None, system);
            resolver.set_theme(ThemePreference::Light);
            assert_eq!(resolver.effective_theme(), EffectiveTheme::Light);
            resolver.set_theme(ThemePreference::Dark);
            assert_eq!(resolver.effective_theme(), EffectiveTheme::Dark);
        }
    }

    #[test]
    fn system_preference_follows_signal() {
        let mut resolver = ready(Some("system"), SystemSignal::Dark);
        assert_eq!(resolver.effective_theme(), EffectiveTheme::Dark);

        resolver.system_changed(SystemSignal::Light);
        assert_eq!(resolver.effective_theme(), EffectiveTheme::Light);

        resolver.system_changed(SystemSignal::Unavailable);
        assert_eq!(resolver.effective_theme(), EffectiveTheme::Light);
    }

    #[test]
    fn returning_to_system_uses_the_latest_signal() {
        let mut resolver = ready(Some("light"), SystemSignal::Light);

        // Recorded while not following the system, without re-applying.
        resolver.system_changed(SystemSignal::Dark);
        assert_eq!(resolver.applied(), Some(EffectiveTheme::Light));

        resolver.set_theme(ThemePreference::System);
        assert_eq!(resolver.effective_theme(), EffectiveTheme::Dark);
        assert_eq!(resolver.applied(), Some(EffectiveTheme::Dark));
    }

    #[test]
    fn toggle_twice_is_identity() {
        for start in [ThemePreference::Light, ThemePreference::Dark] {
            let mut resolver = ready(Some(start.as_str()), SystemSignal::Light);
            resolver.toggle_theme();
            assert_ne!(resolver.preference(), start);
            resolver.toggle_theme();
            assert_eq!(resolver.preference(), start);
        }
    }

    #[test]
    fn toggle_from_system_resolves_to_concrete_choice() {
        let mut resolver = ready(Some("system"), SystemSignal::Dark);
        resolver.toggle_theme();
        assert_eq!(resolver.preference(), ThemePreference::Light);

        let mut resolver = ready(Some("system"), SystemSignal::Light);
        resolver.toggle_theme();
        assert_eq!(resolver.preference(), ThemePreference::Dark);
    }

    #[test]
    fn invalid_stored_value_falls_back_to_default() {
        let store = MemoryStore::with_value(KEY, "blue");
        let mut resolver = ThemeResolver::new(store, ThemePreference::Dark, KEY);
        resolver.initialize(SystemSignal::Light);
        assert_eq!(resolver.preference(), ThemePreference::Dark);
        assert_eq!(stored(&resolver).as_deref(), Some("dark"));
    }

    #[test]
    fn stored_value_wins_over_default() {
        let resolver = ready(Some("dark"), SystemSignal::Light);
        assert_eq!(resolver.preference(), ThemePreference::Dark);
        assert_eq!(resolver.applied(), Some(EffectiveTheme::Dark));
    }

    #[test]
    fn uninitialized_reports_light_and_has_no_side_effects() {
        let mut resolver =
            ThemeResolver::new(MemoryStore::default(), ThemePreference::System, KEY);
        assert!(!resolver.is_ready());
        assert_eq!(resolver.effective_theme(), EffectiveTheme::Light);
        assert_eq!(resolver.preference(), ThemePreference::System);

        resolver.set_theme(ThemePreference::Dark);
        assert_eq!(resolver.effective_theme(), EffectiveTheme::Light);
        assert_eq!(resolver.applied(), None);
        assert!(stored(&resolver).is_none());
        assert!(!resolver.wants_system_notifications());
    }

    #[test]
    fn changes_persist_raw_preference_not_effective_theme() {
        let mut resolver = ready(None, SystemSignal::Dark);
        resolver.set_theme(ThemePreference::System);
        assert_eq!(stored(&resolver).as_deref(), Some("system"));
        assert_eq!(resolver.applied(), Some(EffectiveTheme::Dark));
    }

    #[test]
    fn system_notification_reapplies_without_touching_preference() {
        let mut resolver = ready(Some("system"), SystemSignal::Light);
        assert_eq!(resolver.applied(), Some(EffectiveTheme::Light));

        resolver.system_changed(SystemSignal::Dark);
        assert_eq!(resolver.applied(), Some(EffectiveTheme::Dark));
        assert_eq!(resolver.preference(), ThemePreference::System);
    }

    #[test]
    fn system_notification_is_ignored_for_concrete_preference() {
        let mut resolver = ready(Some("light"), SystemSignal::Light);
        resolver.system_changed(SystemSignal::Dark);
        assert_eq!(resolver.applied(), Some(EffectiveTheme::Light));
    }

    #[test]
    fn subscription_is_wanted_only_under_system() {
        let mut resolver = ready(Some("system"), SystemSignal::Light);
        assert!(resolver.wants_system_notifications());
        resolver.set_theme(ThemePreference::Dark);
        assert!(!resolver.wants_system_notifications());
        resolver.set_theme(ThemePreference::System);
        assert!(resolver.wants_system_notifications());
    }

    #[test]
    fn store_failures_degrade_to_default() {
        let mut resolver = ThemeResolver::new(FailingStore, ThemePreference::Light, KEY);
        resolver.initialize(SystemSignal::Dark);
        assert!(resolver.is_ready());
        assert_eq!(resolver.preference(), ThemePreference::Light);

        resolver.set_theme(ThemePreference::Dark);
        assert_eq!(resolver.applied(), Some(EffectiveTheme::Dark));
    }

    #[test]
    fn second_initialize_is_ignored() {
        let mut resolver = ready(Some("dark"), SystemSignal::Light);
        resolver.set_theme(ThemePreference::Light);
        resolver.initialize(SystemSignal::Dark);
        assert_eq!(resolver.preference(), ThemePreference::Light);
    }

    #[test]
    fn preference_parsing_is_exact() {
        assert_eq!("system".parse::<ThemePreference>(), Ok(ThemePreference::System));
        assert!("Dark".parse::<ThemePreference>().is_err());
        assert!(" light".parse::<ThemePreference>().is_err());
    }
}
