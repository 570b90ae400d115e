use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::ids::PromptId;

//
// ─── RESPONSE ──────────────────────────────────────────────────────────────────
//

/// The single answer accepted for a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponseEvent {
    pub prompt_id: PromptId,
    pub answer: bool,
    /// Time from prompt display to submission.
    pub response_time_ms: u32,
    pub submitted_at: DateTime<Utc>,
}

//
// ─── RESOLUTION ────────────────────────────────────────────────────────────────
//

/// Why a prompt stopped accepting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionReason {
    Answered,
    Timeout,
}

/// Terminal feedback shown to the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Correct,
    Incorrect,
    Timeout,
}

/// Final outcome of a presented prompt.
///
/// Built once by the controller and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    prompt_id: PromptId,
    correct: bool,
    reason: ResolutionReason,
    response: Option<ResponseEvent>,
    presented_at: DateTime<Utc>,
    resolved_at: DateTime<Utc>,
}

impl Resolution {
    #[must_use]
    pub fn answered(
        response: ResponseEvent,
        correct: bool,
        presented_at: DateTime<Utc>,
    ) -> Self {
        Self {
            prompt_id: response.prompt_id,
            correct,
            reason: ResolutionReason::Answered,
            response: Some(response),
            presented_at,
            resolved_at: response.submitted_at,
        }
    }

    /// A timeout never counts as correct.
    #[must_use]
    pub fn timed_out(
        prompt_id: PromptId,
        presented_at: DateTime<Utc>,
        resolved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            prompt_id,
            correct: false,
            reason: ResolutionReason::Timeout,
            response: None,
            presented_at,
            resolved_at,
        }
    }

    #[must_use]
    pub fn prompt_id(&self) -> PromptId {
        self.prompt_id
    }

    #[must_use]
    pub fn correct(&self) -> bool {
        self.correct
    }

    #[must_use]
    pub fn reason(&self) -> ResolutionReason {
        self.reason
    }

    #[must_use]
    pub fn response(&self) -> Option<&ResponseEvent> {
        self.response.as_ref()
    }

    #[must_use]
    pub fn response_time_ms(&self) -> Option<u32> {
        self.response.map(|r| r.response_time_ms)
    }

    #[must_use]
    pub fn presented_at(&self) -> DateTime<Utc> {
        self.presented_at
    }

    #[must_use]
    pub fn resolved_at(&self) -> DateTime<Utc> {
        self.resolved_at
    }

    #[must_use]
    pub fn feedback(&self) -> Feedback {
        match (self.reason, self.correct) {
            (ResolutionReason::Timeout, _) => Feedback::Timeout,
            (ResolutionReason::Answered, true) => Feedback::Correct,
            (ResolutionReason::Answered, false) => Feedback::Incorrect,
        }
    }
}
