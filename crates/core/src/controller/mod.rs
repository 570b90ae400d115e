//! Binary-choice quiz controller.
//!
//! One prompt at a time moves through `idle → pending → resolved → advancing`.
//! The controller is synchronous: callers pass the current time into every
//! operation and collect emitted events with [`QuizController::take_events`].
//! Timer wake-ups are the caller's job; [`QuizController::next_wakeup`] says when.

mod countdown;
mod event;
mod feedback;

use std::mem;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Feedback, PromptId, QuizPrompt, Resolution};
use crate::scorer::score_answer;
use crate::settings::QuizSettings;
use crate::theme::Theme;

use countdown::Countdown;
pub use event::{QuizEvent, QuizObserver};
pub use feedback::FeedbackSignal;
use feedback::FeedbackEmitter;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ControllerError {
    #[error("answer submitted with no prompt presented")]
    NoPrompt,
}

/// Public view of the controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending { prompt_id: PromptId },
    Resolved { prompt_id: PromptId, feedback: Feedback },
    Advancing { prompt_id: PromptId },
}

/// What happened to a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// First answer in time; the prompt is now resolved.
    Accepted(Resolution),
    /// The deadline had already passed; the prompt resolved as a timeout instead.
    Expired(Resolution),
    /// The prompt was already resolved; nothing changed.
    Ignored,
}

enum Stage {
    Idle,
    Pending {
        prompt: QuizPrompt,
        presented_at: DateTime<Utc>,
        countdown: Countdown,
    },
    Resolved {
        prompt: QuizPrompt,
        resolution: Resolution,
        advance_at: Option<DateTime<Utc>>,
    },
    Advancing {
        prompt: QuizPrompt,
        resolution: Resolution,
    },
}

pub struct QuizController {
    settings: QuizSettings,
    feedback: FeedbackEmitter,
    stage: Stage,
    generation: u64,
    events: Vec<QuizEvent>,
}

impl QuizController {
    #[must_use]
    pub fn new(settings: QuizSettings, theme: Theme) -> Self {
        Self {
            feedback: FeedbackEmitter::new(theme, settings.haptic_feedback()),
            settings,
            stage: Stage::Idle,
            generation: 0,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        self.feedback.theme()
    }

    /// Bumped on every `present` and `dismiss`.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match &self.stage {
            Stage::Idle => Phase::Idle,
            Stage::Pending { prompt, .. } => Phase::Pending {
                prompt_id: prompt.id(),
            },
            Stage::Resolved { resolution, .. } => Phase::Resolved {
                prompt_id: resolution.prompt_id(),
                feedback: resolution.feedback(),
            },
            Stage::Advancing { prompt, .. } => Phase::Advancing {
                prompt_id: prompt.id(),
            },
        }
    }

    #[must_use]
    pub fn current_prompt(&self) -> Option<&QuizPrompt> {
        match &self.stage {
            Stage::Idle => None,
            Stage::Pending { prompt, .. }
            | Stage::Resolved { prompt, .. }
            | Stage::Advancing { prompt, .. } => Some(prompt),
        }
    }

    /// Resolution of the current prompt, once it has one.
    #[must_use]
    pub fn resolution(&self) -> Option<&Resolution> {
        match &self.stage {
            Stage::Resolved { resolution, .. } | Stage::Advancing { resolution, .. } => {
                Some(resolution)
            }
            Stage::Idle | Stage::Pending { .. } => None,
        }
    }

    /// Events emitted since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<QuizEvent> {
        mem::take(&mut self.events)
    }

    /// Show `prompt` and start its countdown.
    ///
    /// Any earlier prompt is dropped without a resolution if still pending, and a
    /// scheduled advance for it is cancelled.
    pub fn present(&mut self, prompt: QuizPrompt, now: DateTime<Utc>) {
        if let Stage::Pending { prompt: old, .. } = &self.stage {
            tracing::debug!(prompt_id = %old.id(), "pending prompt superseded");
        }
        self.generation += 1;
        let limit_ms = self.settings.time_limit_for(&prompt);
        let countdown = Countdown::start(now, limit_ms, self.settings.tick_interval());
        tracing::debug!(
            prompt_id = %prompt.id(),
            limit_ms,
            generation = self.generation,
            "prompt presented"
        );

        self.events.push(QuizEvent::Tick {
            prompt_id: prompt.id(),
            remaining_ms: countdown.limit_ms(),
        });
        self.stage = Stage::Pending {
            prompt,
            presented_at: now,
            countdown,
        };
    }

    /// Submit the learner's answer.
    ///
    /// Only the first answer of a pending prompt counts. Later answers are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NoPrompt` when nothing has been presented.
    pub fn submit(
        &mut self,
        answer: bool,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome, ControllerError> {
        match &self.stage {
            Stage::Idle => Err(ControllerError::NoPrompt),
            Stage::Resolved { prompt, .. } | Stage::Advancing { prompt, .. } => {
                tracing::debug!(prompt_id = %prompt.id(), "late answer ignored");
                Ok(SubmitOutcome::Ignored)
            }
            Stage::Pending { countdown, .. } if countdown.is_expired(now) => {
                let resolution = self.expire();
                Ok(SubmitOutcome::Expired(resolution))
            }
            Stage::Pending { .. } => {
                let Stage::Pending {
                    prompt,
                    presented_at,
                    ..
                } = mem::replace(&mut self.stage, Stage::Idle)
                else {
                    unreachable!("stage checked above");
                };
                let resolution = score_answer(&prompt, answer, presented_at, now);
                self.resolve(prompt, resolution.clone());
                Ok(SubmitOutcome::Accepted(resolution))
            }
        }
    }

    /// Advance timers to `now`: emit a tick, expire the prompt, or request the advance.
    pub fn poll(&mut self, now: DateTime<Utc>) {
        match &mut self.stage {
            Stage::Pending { countdown, .. } if countdown.is_expired(now) => {
                self.expire();
            }
            Stage::Pending {
                prompt, countdown, ..
            } => {
                if let Some(remaining_ms) = countdown.take_tick(now) {
                    self.events.push(QuizEvent::Tick {
                        prompt_id: prompt.id(),
                        remaining_ms,
                    });
                }
            }
            Stage::Resolved {
                advance_at: Some(at),
                ..
            } if now >= *at => {
                let Stage::Resolved {
                    prompt, resolution, ..
                } = mem::replace(&mut self.stage, Stage::Idle)
                else {
                    unreachable!("stage checked above");
                };
                tracing::debug!(prompt_id = %prompt.id(), "advance requested");
                self.events.push(QuizEvent::AdvanceRequested {
                    prompt_id: prompt.id(),
                });
                self.stage = Stage::Advancing { prompt, resolution };
            }
            Stage::Idle | Stage::Resolved { .. } | Stage::Advancing { .. } => {}
        }
    }

    /// When the caller must call [`poll`](Self::poll) next, if at all.
    #[must_use]
    pub fn next_wakeup(&self) -> Option<DateTime<Utc>> {
        match &self.stage {
            Stage::Pending { countdown, .. } => Some(countdown.next_wakeup()),
            Stage::Resolved { advance_at, .. } => *advance_at,
            Stage::Idle | Stage::Advancing { .. } => None,
        }
    }

    /// Drop the current prompt, its countdown and any scheduled advance.
    pub fn dismiss(&mut self) {
        if !matches!(self.stage, Stage::Idle) {
            tracing::debug!(generation = self.generation, "controller dismissed");
        }
        self.generation += 1;
        self.stage = Stage::Idle;
        self.events.clear();
    }

    fn expire(&mut self) -> Resolution {
        let Stage::Pending {
            prompt,
            presented_at,
            countdown,
        } = mem::replace(&mut self.stage, Stage::Idle)
        else {
            unreachable!("expire is only called while pending");
        };
        let resolution = Resolution::timed_out(prompt.id(), presented_at, countdown.deadline());
        self.resolve(prompt, resolution.clone());
        resolution
    }

    fn resolve(&mut self, prompt: QuizPrompt, resolution: Resolution) {
        tracing::debug!(
            prompt_id = %prompt.id(),
            feedback = ?resolution.feedback(),
            response_time_ms = ?resolution.response_time_ms(),
            "prompt resolved"
        );
        let signal = self.feedback.signal(&prompt, &resolution);
        let advance_at = self
            .settings
            .auto_advance_delay()
            .map(|delay| resolution.resolved_at() + delay);

        self.events.push(QuizEvent::Resolved(resolution.clone()));
        self.events.push(QuizEvent::Feedback(signal));
        self.stage = Stage::Resolved {
            prompt,
            resolution,
            advance_at,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PromptDraft, ResolutionReason};
    use crate::time::{Clock, fixed_clock, fixed_now};

    fn prompt(id: u64, expected: bool) -> QuizPrompt {
        PromptDraft::new(id, format!("Q{id}"), expected)
            .validate()
            .unwrap()
    }

    fn controller(auto_advance: bool) -> QuizController {
        let settings = QuizSettings::new(5_000, auto_advance, 1_500, true, 100).unwrap();
        QuizController::new(settings, Theme::default())
    }

    fn resolutions(events: &[QuizEvent]) -> Vec<&Resolution> {
        events
            .iter()
            .filter_map(|e| match e {
                QuizEvent::Resolved(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn answer_before_deadline_resolves_once() {
        let mut clock = fixed_clock();
        let mut ctrl = controller(true);
        ctrl.present(prompt(1, true), clock.now());

        clock.advance_ms(1_200);
        let outcome = ctrl.submit(true, clock.now()).unwrap();
        let SubmitOutcome::Accepted(resolution) = outcome else {
            panic!("expected accepted answer");
        };
        assert!(resolution.correct());
        assert_eq!(resolution.reason(), ResolutionReason::Answered);
        assert_eq!(resolution.response_time_ms(), Some(1_200));

        clock.advance_ms(100);
        assert_eq!(ctrl.submit(false, clock.now()).unwrap(), SubmitOutcome::Ignored);

        let events = ctrl.take_events();
        assert_eq!(resolutions(&events).len(), 1);
        assert_eq!(ctrl.resolution(), Some(&resolution));
    }

    #[test]
    fn wrong_answer_is_incorrect() {
        let mut ctrl = controller(false);
        ctrl.present(prompt(1, false), fixed_now());

        let outcome = ctrl.submit(true, fixed_now()).unwrap();
        assert!(matches!(outcome, SubmitOutcome::Accepted(ref r) if !r.correct()));
        assert_eq!(
            ctrl.phase(),
            Phase::Resolved {
                prompt_id: PromptId::new(1),
                feedback: Feedback::Incorrect
            }
        );
    }

    #[test]
    fn expiry_resolves_as_timeout_at_deadline() {
        let mut clock = fixed_clock();
        let mut ctrl = controller(false);
        ctrl.present(prompt(2, false), clock.now());

        clock.advance_ms(5_030);
        ctrl.poll(clock.now());

        let resolution = ctrl.resolution().cloned().unwrap();
        assert!(!resolution.correct());
        assert_eq!(resolution.reason(), ResolutionReason::Timeout);
        assert_eq!(
            resolution.resolved_at(),
            fixed_now() + chrono::Duration::milliseconds(5_000)
        );
        assert_eq!(ctrl.next_wakeup(), None);
    }

    #[test]
    fn submit_at_deadline_loses_to_expiry() {
        let mut clock = fixed_clock();
        let mut ctrl = controller(false);
        ctrl.present(prompt(3, true), clock.now());

        clock.advance_ms(5_000);
        let outcome = ctrl.submit(true, clock.now()).unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Expired(ref r) if r.reason() == ResolutionReason::Timeout
        ));
        assert_eq!(ctrl.submit(true, clock.now()).unwrap(), SubmitOutcome::Ignored);
    }

    #[test]
    fn submit_while_idle_is_an_error() {
        let mut ctrl = controller(true);
        assert_eq!(
            ctrl.submit(true, fixed_now()).unwrap_err(),
            ControllerError::NoPrompt
        );
    }

    #[test]
    fn no_ticks_after_resolution() {
        let mut clock = fixed_clock();
        let mut ctrl = controller(true);
        ctrl.present(prompt(1, true), clock.now());
        for _ in 0..5 {
            clock.advance_ms(100);
            ctrl.poll(clock.now());
        }
        ctrl.submit(false, clock.now()).unwrap();
        let before = ctrl.take_events();
        let ticks: Vec<u32> = before
            .iter()
            .filter_map(|e| match e {
                QuizEvent::Tick { remaining_ms, .. } => Some(*remaining_ms),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![5_000, 4_900, 4_800, 4_700, 4_600, 4_500]);

        for _ in 0..10 {
            clock.advance_ms(100);
            ctrl.poll(clock.now());
        }
        assert!(
            ctrl.take_events()
                .iter()
                .all(|e| !matches!(e, QuizEvent::Tick { .. }))
        );
    }

    #[test]
    fn auto_advance_fires_once_after_delay() {
        let mut clock = fixed_clock();
        let mut ctrl = controller(true);
        ctrl.present(prompt(1, true), clock.now());
        clock.advance_ms(1_000);
        ctrl.submit(true, clock.now()).unwrap();
        ctrl.take_events();

        clock.advance_ms(1_499);
        ctrl.poll(clock.now());
        assert!(ctrl.take_events().is_empty());
        assert_eq!(
            ctrl.next_wakeup(),
            Some(fixed_now() + chrono::Duration::milliseconds(2_500))
        );

        clock.advance_ms(1);
        ctrl.poll(clock.now());
        clock.advance_ms(1_000);
        ctrl.poll(clock.now());

        let events = ctrl.take_events();
        assert_eq!(
            events,
            vec![QuizEvent::AdvanceRequested {
                prompt_id: PromptId::new(1)
            }]
        );
        assert_eq!(
            ctrl.phase(),
            Phase::Advancing {
                prompt_id: PromptId::new(1)
            }
        );
        assert_eq!(ctrl.submit(true, clock.now()).unwrap(), SubmitOutcome::Ignored);
    }

    #[test]
    fn disabled_auto_advance_never_fires() {
        let mut clock = fixed_clock();
        let mut ctrl = controller(false);
        ctrl.present(prompt(1, true), clock.now());
        ctrl.submit(true, clock.now()).unwrap();
        ctrl.take_events();

        clock.advance_ms(60_000);
        ctrl.poll(clock.now());
        assert!(ctrl.take_events().is_empty());
    }

    #[test]
    fn presenting_supersedes_pending_prompt() {
        let mut clock = fixed_clock();
        let mut ctrl = controller(true);
        ctrl.present(prompt(1, true), clock.now());
        let first_generation = ctrl.generation();

        clock.advance_ms(300);
        ctrl.present(prompt(2, false), clock.now());
        assert!(ctrl.generation() > first_generation);

        clock.advance_ms(5_000);
        ctrl.poll(clock.now());
        let events = ctrl.take_events();
        let resolved = resolutions(&events);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].prompt_id(), PromptId::new(2));
    }

    #[test]
    fn dismiss_cancels_scheduled_advance() {
        let mut clock = Clock::fixed(fixed_now());
        let mut ctrl = controller(true);
        ctrl.present(prompt(1, true), clock.now());
        ctrl.submit(true, clock.now()).unwrap();

        ctrl.dismiss();
        assert_eq!(ctrl.phase(), Phase::Idle);
        assert_eq!(ctrl.next_wakeup(), None);

        clock.advance_ms(10_000);
        ctrl.poll(clock.now());
        assert!(ctrl.take_events().is_empty());
    }

    #[test]
    fn feedback_follows_resolution() {
        let mut ctrl = controller(true);
        ctrl.present(prompt(1, true), fixed_now());
        ctrl.take_events();
        ctrl.submit(true, fixed_now()).unwrap();

        let events = ctrl.take_events();
        assert!(matches!(events[0], QuizEvent::Resolved(_)));
        let QuizEvent::Feedback(signal) = &events[1] else {
            panic!("expected feedback, got {:?}", events[1]);
        };
        assert_eq!(signal.feedback, Feedback::Correct);
        assert_eq!(signal.haptic, Some(crate::theme::HapticPattern::Success));
    }
}
