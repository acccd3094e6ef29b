use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::appearance::ThemePreference;

pub fn configuration_directory() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("barangay")
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_theme")]
    pub default_theme: ThemePreference,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_authentication_delay_ms")]
    pub authentication_delay_ms: u64,
    #[serde(default = "default_authentication_timeout_ms")]
    pub authentication_timeout_ms: u64,
}

fn default_theme() -> ThemePreference {
    ThemePreference::Light
}

fn default_storage_key() -> String {
    "barangay-theme".into()
}

fn default_authentication_delay_ms() -> u64 {
    2000
}

fn default_authentication_timeout_ms() -> u64 {
    10_000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_theme: default_theme(),
            storage_key: default_storage_key(),
            authentication_delay_ms: default_authentication_delay_ms(),
            authentication_timeout_ms: default_authentication_timeout_ms(),
        }
    }
}

impl Settings {
    pub fn settings_file_path() -> PathBuf {
        configuration_directory().join("settings.toml")
    }

    /// Loads the settings file, writing the defaults out on first run so
    /// there is something to edit.
    pub fn load() -> Self {
        let path = Self::settings_file_path();
        if !path.exists() {
            let settings = Self::default();
            log::info!("[settings] writing defaults to {}", path.display());
            settings.save_to(&path);
            return settings;
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Self>(&content) {
                Ok(settings) => {
                    log::info!("[settings] loaded from {}", path.display());
                    settings.sanitized()
                }
                Err(error) => {
                    log::warn!("[settings] failed to parse {}: {error}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!(
                    "[settings] no settings file at {}, using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent()
            && let Err(error) = std::fs::create_dir_all(parent)
        {
            log::warn!(
                "[settings] failed to create settings directory {}: {error}",
                parent.display()
            );
        }
        match toml::to_string_pretty(self) {
            Ok(content) => {
                if let Err(error) = std::fs::write(path, content) {
                    log::warn!("[settings] failed to write {}: {error}", path.display());
                }
            }
            Err(error) => {
                log::warn!("[settings] failed to serialize settings: {error}");
            }
        }
    }

    pub fn authentication_delay(&self) -> Duration {
        Duration::from_millis(self.authentication_delay_ms)
    }

    pub fn authentication_timeout(&self) -> Duration {
        Duration::from_millis(self.authentication_timeout_ms)
    }

    fn sanitized(mut self) -> Self {
        if self.storage_key.trim().is_empty() {
            log::warn!("[settings] empty storage_key, using {}", default_storage_key());
            self.storage_key = default_storage_key();
        }
        if self.authentication_timeout_ms == 0 {
            log::warn!("[settings] authentication_timeout_ms must be positive, using default");
            self.authentication_timeout_ms = default_authentication_timeout_ms();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let directory = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&directory.path().join("settings.toml"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.storage_key, "barangay-theme");
        assert_eq!(settings.default_theme, ThemePreference::Light);
        assert_eq!(settings.authentication_delay(), Duration::from_secs(2));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("settings.toml");
        std::fs::write(&path, "default_theme = \"system\"\n").unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.default_theme, ThemePreference::System);
        assert_eq!(settings.authentication_timeout_ms, 10_000);
    }

    #[test]
    fn unknown_theme_name_falls_back_to_defaults() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("settings.toml");
        std::fs::write(&path, "default_theme = \"blue\"\n").unwrap();

        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn saved_settings_load_back() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("nested").join("settings.toml");
        let settings = Settings {
            default_theme: ThemePreference::Dark,
            storage_key: "custom-key".into(),
            authentication_delay_ms: 10,
            authentication_timeout_ms: 500,
        };
        settings.save_to(&path);
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn blank_values_are_sanitized() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("settings.toml");
        std::fs::write(&path, "storage_key = \"  \"\nauthentication_timeout_ms = 0\n").unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.storage_key, "barangay-theme");
        assert_eq!(settings.authentication_timeout_ms, 10_000);
    }
}
