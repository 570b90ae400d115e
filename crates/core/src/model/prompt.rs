use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::PromptId;

pub const MAX_PROMPT_TEXT_CHARS: usize = 1000;
pub const MAX_EXPLANATION_CHARS: usize = 2000;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PromptError {
    #[error("prompt text cannot be empty")]
    EmptyText,

    #[error("prompt text is too long: {len} chars (max {MAX_PROMPT_TEXT_CHARS})")]
    TextTooLong { len: usize },

    #[error("explanation is too long: {len} chars (max {MAX_EXPLANATION_CHARS})")]
    ExplanationTooLong { len: usize },

    #[error("prompt time limit must be > 0")]
    InvalidTimeLimit,

    #[error("difficulty must be between 1 and 10, got {0}")]
    InvalidDifficulty(u8),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty on the platform's 1–10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Difficulty(u8);

impl Difficulty {
    /// # Errors
    ///
    /// Returns `PromptError::InvalidDifficulty` outside `1..=10`.
    pub fn new(value: u8) -> Result<Self, PromptError> {
        if (1..=10).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PromptError::InvalidDifficulty(value))
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated prompt as read from a deck file or built by a host.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptDraft {
    pub id: u64,
    pub text: String,
    pub answer: bool,
    #[serde(default)]
    pub time_limit_ms: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<u8>,
    #[serde(default)]
    pub concept: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub order: u32,
}

impl PromptDraft {
    #[must_use]
    pub fn new(id: u64, text: impl Into<String>, answer: bool) -> Self {
        Self {
            id,
            text: text.into(),
            answer,
            ..Self::default()
        }
    }

    /// Validate and normalize the draft into an immutable prompt.
    ///
    /// # Errors
    ///
    /// Returns `PromptError` when text, explanation, time limit or difficulty are invalid.
    pub fn validate(self) -> Result<QuizPrompt, PromptError> {
        let text = self.text.trim().to_owned();
        if text.is_empty() {
            return Err(PromptError::EmptyText);
        }
        let len = text.chars().count();
        if len > MAX_PROMPT_TEXT_CHARS {
            return Err(PromptError::TextTooLong { len });
        }

        let explanation = normalize_optional(self.explanation);
        if let Some(explanation) = explanation.as_deref() {
            let len = explanation.chars().count();
            if len > MAX_EXPLANATION_CHARS {
                return Err(PromptError::ExplanationTooLong { len });
            }
        }

        if self.time_limit_ms == Some(0) {
            return Err(PromptError::InvalidTimeLimit);
        }

        let difficulty = self.difficulty.map(Difficulty::new).transpose()?;

        Ok(QuizPrompt {
            id: PromptId::new(self.id),
            text,
            expected: self.answer,
            time_limit_ms: self.time_limit_ms,
            difficulty,
            concept: normalize_optional(self.concept),
            explanation,
            order: self.order,
        })
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

//
// ─── PROMPT ────────────────────────────────────────────────────────────────────
//

/// A single true/false question with its answer key and time budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizPrompt {
    id: PromptId,
    text: String,
    expected: bool,
    time_limit_ms: Option<u32>,
    difficulty: Option<Difficulty>,
    concept: Option<String>,
    explanation: Option<String>,
    order: u32,
}

impl QuizPrompt {
    #[must_use]
    pub fn id(&self) -> PromptId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn expected(&self) -> bool {
        self.expected
    }

    /// Per-prompt override of the configured time limit.
    #[must_use]
    pub fn time_limit_ms(&self) -> Option<u32> {
        self.time_limit_ms
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    #[must_use]
    pub fn concept(&self) -> Option<&str> {
        self.concept.as_deref()
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }
}
