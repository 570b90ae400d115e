use chrono::{DateTime, Utc};
use quiz_core::model::{QuizPrompt, Resolution, RoundId, RoundSummary};

use super::plan::RoundPlan;
use super::progress::RoundProgress;
use crate::error::RoundError;

/// In-memory round over a fixed list of prompts.
///
/// Steps through prompts in plan order and keeps one resolution per prompt.
pub struct QuizRound {
    round_id: RoundId,
    prompts: Vec<QuizPrompt>,
    current: usize,
    resolutions: Vec<Resolution>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    summary_id: Option<i64>,
    correct_streak: u32,
    best_streak: u32,
}

impl QuizRound {
    /// # Errors
    ///
    /// Returns `RoundError::Empty` if the plan has no prompts.
    pub fn new(
        round_id: RoundId,
        plan: RoundPlan,
        started_at: DateTime<Utc>,
    ) -> Result<Self, RoundError> {
        if plan.is_empty() {
            return Err(RoundError::Empty);
        }

        Ok(Self {
            round_id,
            prompts: plan.prompts,
            current: 0,
            resolutions: Vec::new(),
            started_at,
            completed_at: None,
            summary_id: None,
            correct_streak: 0,
            best_streak: 0,
        })
    }

    #[must_use]
    pub fn round_id(&self) -> RoundId {
        self.round_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn summary_id(&self) -> Option<i64> {
        self.summary_id
    }

    pub(crate) fn set_summary_id(&mut self, id: i64) {
        self.summary_id = Some(id);
    }

    #[must_use]
    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    #[must_use]
    pub fn total_prompts(&self) -> usize {
        self.prompts.len()
    }

    /// The prompt awaiting a resolution, if any.
    #[must_use]
    pub fn current_prompt(&self) -> Option<&QuizPrompt> {
        self.prompts.get(self.current)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.prompts.len()
    }

    #[must_use]
    pub fn progress(&self) -> RoundProgress {
        let total = self.prompts.len();
        let answered = self.resolutions.len();
        RoundProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            correct_streak: self.correct_streak,
            best_streak: self.best_streak,
            is_complete: self.is_complete(),
        }
    }

    /// Record the resolution of the current prompt and move on.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Completed` when every prompt is already resolved, or
    /// `RoundError::UnexpectedResolution` when the resolution is for another prompt.
    pub fn record(&mut self, resolution: Resolution) -> Result<RoundProgress, RoundError> {
        let Some(prompt) = self.current_prompt() else {
            return Err(RoundError::Completed);
        };
        if prompt.id() != resolution.prompt_id() {
            return Err(RoundError::UnexpectedResolution(
                resolution.prompt_id().value(),
            ));
        }

        if resolution.correct() {
            self.correct_streak = self.correct_streak.saturating_add(1);
            self.best_streak = self.best_streak.max(self.correct_streak);
        } else {
            self.correct_streak = 0;
        }

        self.current += 1;
        if self.is_complete() {
            self.completed_at = Some(resolution.resolved_at());
        }
        self.resolutions.push(resolution);
        Ok(self.progress())
    }

    /// # Errors
    ///
    /// Returns `RoundError::Incomplete` before the last prompt resolves, or `RoundError::Summary`
    /// if the aggregate is inconsistent.
    pub fn build_summary(&self) -> Result<RoundSummary, RoundError> {
        let completed_at = self.completed_at.ok_or(RoundError::Incomplete)?;
        Ok(RoundSummary::from_resolutions(
            self.round_id,
            self.started_at,
            completed_at,
            &self.resolutions,
        )?)
    }
}
