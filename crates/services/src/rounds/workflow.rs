use std::sync::Arc;

use quiz_core::model::{PromptId, QuizPrompt, Resolution, RoundSummary};
use quiz_core::{Clock, Phase, QuizController, QuizEvent, QuizSettings, SubmitOutcome, Theme};
use serde::Serialize;
use storage::repository::{ResolutionRepository, RoundSummaryRepository, Storage};
use tokio::sync::mpsc;

use super::progress::RoundProgress;
use super::service::QuizRound;
use crate::error::RoundError;
use crate::observer::ChannelObserver;
use crate::runner::QuizRunner;

/// What the round loop did in response to a controller event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundEvent {
    /// A tick or feedback signal for the prompt on screen.
    Quiz(QuizEvent),
    /// The prompt on screen resolved and its resolution was persisted.
    Recorded {
        resolution: Resolution,
        log_id: i64,
        progress: RoundProgress,
    },
    /// The next prompt is on screen.
    Presented(QuizPrompt),
    /// Every prompt resolved; the summary was persisted.
    Completed {
        summary: RoundSummary,
        summary_id: i64,
    },
}

/// Plays a `QuizRound` through a `QuizRunner` and persists the outcome.
pub struct RoundLoop {
    runner: QuizRunner,
    events: mpsc::UnboundedReceiver<QuizEvent>,
    round: QuizRound,
    on_screen: Option<PromptId>,
    resolutions: Arc<dyn ResolutionRepository>,
    summaries: Arc<dyn RoundSummaryRepository>,
}

impl RoundLoop {
    #[must_use]
    pub fn new(
        settings: QuizSettings,
        theme: Theme,
        clock: Clock,
        round: QuizRound,
        storage: &Storage,
    ) -> Self {
        let (observer, events) = ChannelObserver::channel();
        let runner = QuizRunner::new(
            QuizController::new(settings, theme),
            clock,
            Arc::new(observer),
        );
        Self {
            runner,
            events,
            round,
            on_screen: None,
            resolutions: Arc::clone(&storage.resolutions),
            summaries: Arc::clone(&storage.summaries),
        }
    }

    #[must_use]
    pub fn round(&self) -> &QuizRound {
        &self.round
    }

    /// Present the first prompt.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Completed` if the round has no prompt left, or a runner error.
    pub fn start(&mut self) -> Result<QuizPrompt, RoundError> {
        let prompt = self
            .round
            .current_prompt()
            .cloned()
            .ok_or(RoundError::Completed)?;
        self.show(prompt.clone())?;
        Ok(prompt)
    }

    /// Forward an answer to the prompt on screen.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Runner` when nothing has been presented yet.
    pub fn submit(&self, answer: bool) -> Result<SubmitOutcome, RoundError> {
        Ok(self.runner.submit(answer)?)
    }

    /// Wait for the next controller event and apply it to the round.
    ///
    /// Returns `Ok(None)` once the round is complete and its summary is stored.
    /// Cancel-safe while waiting: the in-memory repositories never suspend.
    ///
    /// # Errors
    ///
    /// Returns `RoundError` for persistence or runner failures.
    pub async fn next_event(&mut self) -> Result<Option<RoundEvent>, RoundError> {
        if self.round.summary_id().is_some() {
            return Ok(None);
        }

        loop {
            let Some(event) = self.events.recv().await else {
                return Ok(None);
            };
            if Some(event.prompt_id()) != self.on_screen {
                tracing::debug!(
                    prompt_id = %event.prompt_id(),
                    "event for replaced prompt skipped"
                );
                continue;
            }

            match event {
                QuizEvent::Resolved(resolution) => {
                    if self.awaiting_record() != Some(resolution.prompt_id()) {
                        tracing::debug!(
                            prompt_id = %resolution.prompt_id(),
                            "resolution already recorded"
                        );
                        continue;
                    }
                    return self.record(resolution).await.map(Some);
                }
                QuizEvent::AdvanceRequested { prompt_id } => {
                    if self.runner.phase()? != (Phase::Advancing { prompt_id }) {
                        continue;
                    }
                    return self.advance().await.map(Some);
                }
                other => return Ok(Some(RoundEvent::Quiz(other))),
            }
        }
    }

    /// Move past the resolved prompt: present the next one or finish the round.
    ///
    /// A resolution still queued for [`next_event`](Self::next_event) is recorded
    /// first, so the prompt on screen is never shown twice.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Pending` while the prompt on screen is unresolved.
    pub async fn advance(&mut self) -> Result<RoundEvent, RoundError> {
        if matches!(self.runner.phase()?, Phase::Pending { .. }) {
            return Err(RoundError::Pending);
        }
        self.record_queued_resolution().await?;

        if let Some(next) = self.round.current_prompt().cloned() {
            self.show(next.clone())?;
            return Ok(RoundEvent::Presented(next));
        }

        let (summary, summary_id) = self.finalize_summary().await?;
        Ok(RoundEvent::Completed {
            summary,
            summary_id,
        })
    }

    /// Persist the summary of a completed round; returns the stored id on retry.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Incomplete` if prompts remain, or `RoundError::Storage`.
    pub async fn finalize_summary(&mut self) -> Result<(RoundSummary, i64), RoundError> {
        let summary = self.round.build_summary()?;
        if let Some(id) = self.round.summary_id() {
            return Ok((summary, id));
        }
        self.runner.dismiss()?;
        self.on_screen = None;

        let id = self.summaries.append_summary(&summary).await?;
        self.round.set_summary_id(id);
        tracing::debug!(
            round_id = %summary.round_id(),
            accuracy = summary.accuracy(),
            summary_id = id,
            "round completed"
        );
        Ok((summary, id))
    }

    /// End the round early, for hosts that will send no more input.
    ///
    /// Records a resolution still queued for the prompt on screen. Returns
    /// `Completed` if that finished the round; otherwise the round is dismissed
    /// with its remaining prompts unplayed and `None` is returned.
    ///
    /// # Errors
    ///
    /// Returns `RoundError` for persistence or runner failures.
    pub async fn finish(&mut self) -> Result<Option<RoundEvent>, RoundError> {
        if self.round.summary_id().is_some() {
            return Ok(None);
        }
        self.record_queued_resolution().await?;

        if self.round.is_complete() {
            let (summary, summary_id) = self.finalize_summary().await?;
            return Ok(Some(RoundEvent::Completed {
                summary,
                summary_id,
            }));
        }
        tracing::debug!(
            round_id = %self.round.round_id(),
            remaining = self.round.progress().remaining,
            "round ended early"
        );
        self.dismiss()?;
        Ok(None)
    }

    /// Stop the round, cancelling the timer and any scheduled advance.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Runner` if the runner lock was poisoned.
    pub fn dismiss(&mut self) -> Result<(), RoundError> {
        self.on_screen = None;
        Ok(self.runner.dismiss()?)
    }

    /// The prompt on screen, while its resolution is not yet in the round.
    fn awaiting_record(&self) -> Option<PromptId> {
        let current = self.round.current_prompt().map(QuizPrompt::id);
        current.filter(|id| self.on_screen == Some(*id))
    }

    async fn record_queued_resolution(&mut self) -> Result<(), RoundError> {
        if self.awaiting_record().is_none() {
            return Ok(());
        }
        if let Some(resolution) = self.runner.resolution()? {
            self.record(resolution).await?;
        }
        Ok(())
    }

    async fn record(&mut self, resolution: Resolution) -> Result<RoundEvent, RoundError> {
        let log_id = self
            .resolutions
            .append_resolution(self.round.round_id(), &resolution)
            .await?;
        let progress = self.round.record(resolution.clone())?;
        Ok(RoundEvent::Recorded {
            resolution,
            log_id,
            progress,
        })
    }

    fn show(&mut self, prompt: QuizPrompt) -> Result<(), RoundError> {
        self.on_screen = Some(prompt.id());
        self.runner.present(prompt)?;
        Ok(())
    }
}
