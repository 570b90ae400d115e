use std::path::Path;

use quiz_core::theme::ThemeError;
use quiz_core::{AgeGroup, QuizSettings, QuizSettingsDraft, SettingsError};
use serde::Deserialize;

/// Contents of the optional `--config` file.
///
/// ```toml
/// [quiz]
/// time_limit_ms = 8000
/// auto_advance = false
///
/// [theme]
/// age_group = "9-11"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub quiz: QuizSettingsDraft,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub age_group: Option<String>,
}

impl AppConfig {
    /// Read the config file; an unreadable or malformed file falls back to defaults.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Self::default();
            }
        };

        match toml::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Self::default()
            }
        }
    }

    /// # Errors
    ///
    /// Returns `SettingsError` when a `[quiz]` value is out of range.
    pub fn settings(&self) -> Result<QuizSettings, SettingsError> {
        self.quiz.clone().validate()
    }

    /// # Errors
    ///
    /// Returns `ThemeError` for an unknown `[theme] age_group`.
    pub fn age_group(&self) -> Result<Option<AgeGroup>, ThemeError> {
        self.theme
            .age_group
            .as_deref()
            .map(str::parse)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_uses_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/quiz.toml"));
        assert_eq!(config.settings().unwrap(), QuizSettings::standard());
        assert_eq!(config.age_group().unwrap(), None);
    }

    #[test]
    fn reads_quiz_and_theme_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[quiz]\ntime_limit_ms = 8000\nauto_advance = false\n\n[theme]\nage_group = \"9-11\""
        )
        .unwrap();

        let config = AppConfig::load(file.path());
        let settings = config.settings().unwrap();
        assert_eq!(settings.time_limit_ms(), 8_000);
        assert!(!settings.auto_advance());
        assert_eq!(settings.tick_interval_ms(), 100);
        assert_eq!(config.age_group().unwrap(), Some(AgeGroup::Junior));
    }

    #[test]
    fn out_of_range_values_are_errors() {
        let config: AppConfig = toml::from_str("[quiz]\ntick_interval_ms = 5").unwrap();
        assert_eq!(
            config.settings().unwrap_err(),
            SettingsError::InvalidTickInterval(5)
        );

        let config: AppConfig = toml::from_str("[theme]\nage_group = \"toddler\"").unwrap();
        assert!(config.age_group().is_err());
    }

    #[test]
    fn bundled_config_matches_defaults() {
        let config: AppConfig = toml::from_str(include_str!("../decks/quiz.toml")).unwrap();
        assert_eq!(config.settings().unwrap(), QuizSettings::standard());
        assert_eq!(config.age_group().unwrap(), Some(AgeGroup::Teen));
    }

    #[test]
    fn malformed_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[quiz\ntime_limit_ms = ").unwrap();
        let config = AppConfig::load(file.path());
        assert_eq!(config.settings().unwrap(), QuizSettings::standard());
    }
}
