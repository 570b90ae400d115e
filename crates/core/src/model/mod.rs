mod ids;
mod prompt;
mod resolution;
mod summary;

pub use ids::{PromptId, RoundId};
pub use prompt::{
    Difficulty, MAX_EXPLANATION_CHARS, MAX_PROMPT_TEXT_CHARS, PromptDraft, PromptError,
    QuizPrompt,
};
pub use resolution::{Feedback, Resolution, ResolutionReason, ResponseEvent};
pub use summary::{RoundSummary, SummaryError};
