//! Design tokens for feedback rendering.
//!
//! A `Theme` is built once and handed to the controller; presentation layers read
//! colours, labels and haptic patterns from the emitted feedback signals.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::model::Feedback;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ThemeError {
    #[error("unknown age group: {0} (expected 6-8, 9-11, 12-15 or 16+)")]
    UnknownAgeGroup(String),
}

/// Learner age bands used to pick feedback tone and colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AgeGroup {
    EarlyReader,
    Junior,
    #[default]
    Teen,
    Adult,
}

impl AgeGroup {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AgeGroup::EarlyReader => "6-8",
            AgeGroup::Junior => "9-11",
            AgeGroup::Teen => "12-15",
            AgeGroup::Adult => "16+",
        }
    }
}

impl FromStr for AgeGroup {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "6-8" => Ok(Self::EarlyReader),
            "9-11" => Ok(Self::Junior),
            "12-15" => Ok(Self::Teen),
            "16+" | "adult" => Ok(Self::Adult),
            other => Err(ThemeError::UnknownAgeGroup(other.to_owned())),
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// sRGB colour token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Haptic pulse requested alongside visual feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticPattern {
    Success,
    Error,
    Warning,
}

impl HapticPattern {
    #[must_use]
    pub fn for_feedback(feedback: Feedback) -> Self {
        match feedback {
            Feedback::Correct => Self::Success,
            Feedback::Incorrect => Self::Error,
            Feedback::Timeout => Self::Warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackStyle {
    pub color: Rgb,
    pub label: &'static str,
}

/// Immutable feedback design tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    age_group: AgeGroup,
    correct: FeedbackStyle,
    incorrect: FeedbackStyle,
    timeout: FeedbackStyle,
}

impl Theme {
    #[must_use]
    pub fn for_age_group(age_group: AgeGroup) -> Self {
        match age_group {
            AgeGroup::EarlyReader | AgeGroup::Junior => Self {
                age_group,
                correct: FeedbackStyle {
                    color: Rgb::new(0x22, 0xc5, 0x5e),
                    label: "Great job!",
                },
                incorrect: FeedbackStyle {
                    color: Rgb::new(0xf9, 0x73, 0x16),
                    label: "Not quite!",
                },
                timeout: FeedbackStyle {
                    color: Rgb::new(0xa8, 0x55, 0xf7),
                    label: "Time's up!",
                },
            },
            AgeGroup::Teen | AgeGroup::Adult => Self {
                age_group,
                correct: FeedbackStyle {
                    color: Rgb::new(0x10, 0xb9, 0x81),
                    label: "Correct",
                },
                incorrect: FeedbackStyle {
                    color: Rgb::new(0xef, 0x44, 0x44),
                    label: "Incorrect",
                },
                timeout: FeedbackStyle {
                    color: Rgb::new(0x6b, 0x72, 0x80),
                    label: "Out of time",
                },
            },
        }
    }

    #[must_use]
    pub fn age_group(&self) -> AgeGroup {
        self.age_group
    }

    #[must_use]
    pub fn style(&self, feedback: Feedback) -> &FeedbackStyle {
        match feedback {
            Feedback::Correct => &self.correct,
            Feedback::Incorrect => &self.incorrect,
            Feedback::Timeout => &self.timeout,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_age_group(AgeGroup::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_age_groups() {
        assert_eq!("9-11".parse::<AgeGroup>().unwrap(), AgeGroup::Junior);
        assert_eq!(" 16+ ".parse::<AgeGroup>().unwrap(), AgeGroup::Adult);
        assert_eq!(
            "4-5".parse::<AgeGroup>().unwrap_err(),
            ThemeError::UnknownAgeGroup("4-5".into())
        );
    }

    #[test]
    fn younger_themes_use_encouraging_labels() {
        let theme = Theme::for_age_group(AgeGroup::EarlyReader);
        assert_eq!(theme.style(Feedback::Correct).label, "Great job!");
        assert_eq!(theme.style(Feedback::Timeout).color.to_string(), "#a855f7");
    }

    #[test]
    fn haptics_follow_feedback() {
        assert_eq!(
            HapticPattern::for_feedback(Feedback::Incorrect),
            HapticPattern::Error
        );
        assert_eq!(
            HapticPattern::for_feedback(Feedback::Timeout),
            HapticPattern::Warning
        );
    }
}
