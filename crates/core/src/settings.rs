use chrono::Duration;
use serde::Deserialize;
use thiserror::Error;

use crate::model::QuizPrompt;

pub const DEFAULT_TIME_LIMIT_MS: u32 = 10_000;
pub const MAX_TIME_LIMIT_MS: u32 = 600_000;
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 100;
/// The three widget variants this replaces used 800, 1000 and 1500 ms.
/// 1500 ms stays the default until product settles on one value.
pub const DEFAULT_AUTO_ADVANCE_DELAY_MS: u32 = 1_500;
pub const MAX_AUTO_ADVANCE_DELAY_MS: u32 = 60_000;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("time limit must be between 1 and {MAX_TIME_LIMIT_MS} ms, got {0}")]
    InvalidTimeLimit(u32),

    #[error("tick interval must be between 10 and 1000 ms, got {0}")]
    InvalidTickInterval(u32),

    #[error("auto-advance delay must be at most {MAX_AUTO_ADVANCE_DELAY_MS} ms, got {0}")]
    InvalidAutoAdvanceDelay(u32),
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Validated controller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    time_limit_ms: u32,
    auto_advance: bool,
    auto_advance_delay_ms: u32,
    haptic_feedback: bool,
    tick_interval_ms: u32,
}

impl QuizSettings {
    /// Default settings:
    /// - 10 s per prompt
    /// - auto-advance after 1.5 s
    /// - haptics on
    /// - 100 ms ticks
    #[must_use]
    pub fn standard() -> Self {
        Self {
            time_limit_ms: DEFAULT_TIME_LIMIT_MS,
            auto_advance: true,
            auto_advance_delay_ms: DEFAULT_AUTO_ADVANCE_DELAY_MS,
            haptic_feedback: true,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }

    /// # Errors
    ///
    /// Returns `SettingsError` when the time limit is zero or too long, the tick interval
    /// is outside `10..=1000` ms, or the advance delay exceeds one minute.
    pub fn new(
        time_limit_ms: u32,
        auto_advance: bool,
        auto_advance_delay_ms: u32,
        haptic_feedback: bool,
        tick_interval_ms: u32,
    ) -> Result<Self, SettingsError> {
        if time_limit_ms == 0 || time_limit_ms > MAX_TIME_LIMIT_MS {
            return Err(SettingsError::InvalidTimeLimit(time_limit_ms));
        }
        if !(10..=1000).contains(&tick_interval_ms) {
            return Err(SettingsError::InvalidTickInterval(tick_interval_ms));
        }
        if auto_advance_delay_ms > MAX_AUTO_ADVANCE_DELAY_MS {
            return Err(SettingsError::InvalidAutoAdvanceDelay(auto_advance_delay_ms));
        }

        Ok(Self {
            time_limit_ms,
            auto_advance,
            auto_advance_delay_ms,
            haptic_feedback,
            tick_interval_ms,
        })
    }

    #[must_use]
    pub fn time_limit_ms(&self) -> u32 {
        self.time_limit_ms
    }

    #[must_use]
    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    #[must_use]
    pub fn auto_advance_delay_ms(&self) -> u32 {
        self.auto_advance_delay_ms
    }

    #[must_use]
    pub fn haptic_feedback(&self) -> bool {
        self.haptic_feedback
    }

    #[must_use]
    pub fn tick_interval_ms(&self) -> u32 {
        self.tick_interval_ms
    }

    /// Effective limit for a prompt; the prompt's own limit wins.
    #[must_use]
    pub fn time_limit_for(&self, prompt: &QuizPrompt) -> u32 {
        prompt.time_limit_ms().unwrap_or(self.time_limit_ms)
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::milliseconds(i64::from(self.tick_interval_ms))
    }

    /// `None` when auto-advance is off.
    #[must_use]
    pub fn auto_advance_delay(&self) -> Option<Duration> {
        self.auto_advance
            .then(|| Duration::milliseconds(i64::from(self.auto_advance_delay_ms)))
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self::standard()
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Partial settings as read from a config file; missing values take defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuizSettingsDraft {
    pub time_limit_ms: Option<u32>,
    pub auto_advance: Option<bool>,
    pub auto_advance_delay_ms: Option<u32>,
    pub haptic_feedback: Option<bool>,
    pub tick_interval_ms: Option<u32>,
}

impl QuizSettingsDraft {
    /// # Errors
    ///
    /// Returns `SettingsError` if any provided value is out of range.
    pub fn validate(self) -> Result<QuizSettings, SettingsError> {
        let defaults = QuizSettings::standard();
        QuizSettings::new(
            self.time_limit_ms.unwrap_or(defaults.time_limit_ms),
            self.auto_advance.unwrap_or(defaults.auto_advance),
            self.auto_advance_delay_ms
                .unwrap_or(defaults.auto_advance_delay_ms),
            self.haptic_feedback.unwrap_or(defaults.haptic_feedback),
            self.tick_interval_ms.unwrap_or(defaults.tick_interval_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PromptDraft;

    #[test]
    fn standard_settings() {
        let settings = QuizSettings::standard();
        assert_eq!(settings.time_limit_ms(), 10_000);
        assert!(settings.auto_advance());
        assert_eq!(settings.auto_advance_delay_ms(), 1_500);
        assert!(settings.haptic_feedback());
        assert_eq!(settings.tick_interval_ms(), 100);
        assert_eq!(QuizSettings::default(), settings);
    }

    #[test]
    fn rejects_zero_time_limit() {
        let err = QuizSettings::new(0, true, 1_500, true, 100).unwrap_err();
        assert_eq!(err, SettingsError::InvalidTimeLimit(0));
    }

    #[test]
    fn rejects_tick_interval_out_of_range() {
        let err = QuizSettings::new(5_000, true, 1_500, true, 5).unwrap_err();
        assert_eq!(err, SettingsError::InvalidTickInterval(5));
    }

    #[test]
    fn rejects_long_advance_delay() {
        let err = QuizSettings::new(5_000, true, 60_001, true, 100).unwrap_err();
        assert_eq!(err, SettingsError::InvalidAutoAdvanceDelay(60_001));
    }

    #[test]
    fn draft_fills_defaults() {
        let settings = QuizSettingsDraft {
            time_limit_ms: Some(5_000),
            auto_advance: Some(false),
            ..QuizSettingsDraft::default()
        }
        .validate()
        .unwrap();

        assert_eq!(settings.time_limit_ms(), 5_000);
        assert!(!settings.auto_advance());
        assert_eq!(settings.auto_advance_delay(), None);
        assert_eq!(settings.tick_interval_ms(), DEFAULT_TICK_INTERVAL_MS);
    }

    #[test]
    fn prompt_limit_overrides_default() {
        let settings = QuizSettings::standard();
        let prompt = PromptDraft {
            time_limit_ms: Some(3_000),
            ..PromptDraft::new(1, "Q", true)
        }
        .validate()
        .unwrap();
        let plain = PromptDraft::new(2, "Q", true).validate().unwrap();

        assert_eq!(settings.time_limit_for(&prompt), 3_000);
        assert_eq!(settings.time_limit_for(&plain), DEFAULT_TIME_LIMIT_MS);
    }
}
