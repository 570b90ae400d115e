use serde::Serialize;

use crate::controller::FeedbackSignal;
use crate::model::{PromptId, Resolution};

/// Output of the controller, in the order state transitions happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizEvent {
    Tick {
        prompt_id: PromptId,
        remaining_ms: u32,
    },
    Resolved(Resolution),
    Feedback(FeedbackSignal),
    AdvanceRequested {
        prompt_id: PromptId,
    },
}

impl QuizEvent {
    #[must_use]
    pub fn prompt_id(&self) -> PromptId {
        match self {
            QuizEvent::Tick { prompt_id, .. } | QuizEvent::AdvanceRequested { prompt_id } => {
                *prompt_id
            }
            QuizEvent::Resolved(resolution) => resolution.prompt_id(),
            QuizEvent::Feedback(signal) => signal.prompt_id,
        }
    }
}

/// Host-side callbacks.
///
/// Callbacks run while the driver holds its controller lock: implementations must
/// not call back into the driver synchronously.
pub trait QuizObserver: Send + Sync {
    fn on_tick(&self, _prompt_id: PromptId, _remaining_ms: u32) {}

    fn on_resolved(&self, resolution: &Resolution);

    fn on_feedback(&self, _signal: &FeedbackSignal) {}

    fn on_advance_requested(&self, _prompt_id: PromptId) {}

    /// Entry point used by drivers; routes to the specific callbacks.
    fn on_event(&self, event: &QuizEvent) {
        match event {
            QuizEvent::Tick {
                prompt_id,
                remaining_ms,
            } => self.on_tick(*prompt_id, *remaining_ms),
            QuizEvent::Resolved(resolution) => self.on_resolved(resolution),
            QuizEvent::Feedback(signal) => self.on_feedback(signal),
            QuizEvent::AdvanceRequested { prompt_id } => self.on_advance_requested(*prompt_id),
        }
    }
}
