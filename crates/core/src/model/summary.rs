use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::{Feedback, Resolution, RoundId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("too many resolutions for a single round: {len}")]
    TooManyResolutions { len: usize },

    #[error("total prompts ({total}) does not match outcome counts ({sum})")]
    CountMismatch { total: u32, sum: u64 },
}

/// Aggregate outcome of one round of prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    round_id: RoundId,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total: u32,
    correct: u32,
    incorrect: u32,
    timed_out: u32,
    average_response_ms: Option<u32>,
}

impl RoundSummary {
    /// Rehydrate a summary from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidTimeRange` or `SummaryError::CountMismatch`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        round_id: RoundId,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        total: u32,
        correct: u32,
        incorrect: u32,
        timed_out: u32,
        average_response_ms: Option<u32>,
    ) -> Result<Self, SummaryError> {
        if completed_at < started_at {
            return Err(SummaryError::InvalidTimeRange);
        }
        let sum = correct
            .checked_add(incorrect)
            .and_then(|partial| partial.checked_add(timed_out));
        if sum != Some(total) {
            return Err(SummaryError::CountMismatch {
                total,
                sum: u64::from(correct) + u64::from(incorrect) + u64::from(timed_out),
            });
        }

        Ok(Self {
            round_id,
            started_at,
            completed_at,
            total,
            correct,
            incorrect,
            timed_out,
            average_response_ms,
        })
    }

    /// Build a summary from the resolutions recorded during a round.
    ///
    /// The average response time only covers answered prompts.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SummaryError::TooManyResolutions` if the count cannot fit in `u32`.
    pub fn from_resolutions(
        round_id: RoundId,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        resolutions: &[Resolution],
    ) -> Result<Self, SummaryError> {
        if completed_at < started_at {
            return Err(SummaryError::InvalidTimeRange);
        }
        let mut correct = 0_u32;
        let mut incorrect = 0_u32;
        let mut timed_out = 0_u32;
        let mut response_total = 0_u64;
        let mut answered = 0_u64;

        for resolution in resolutions {
            match resolution.feedback() {
                Feedback::Correct => correct = correct.saturating_add(1),
                Feedback::Incorrect => incorrect = incorrect.saturating_add(1),
                Feedback::Timeout => timed_out = timed_out.saturating_add(1),
            }
            if let Some(ms) = resolution.response_time_ms() {
                response_total += u64::from(ms);
                answered += 1;
            }
        }

        let total = u32::try_from(resolutions.len()).map_err(|_| {
            SummaryError::TooManyResolutions {
                len: resolutions.len(),
            }
        })?;
        let average_response_ms = (answered > 0)
            .then(|| u32::try_from(response_total / answered).unwrap_or(u32::MAX));

        Self::from_persisted(
            round_id,
            started_at,
            completed_at,
            total,
            correct,
            incorrect,
            timed_out,
            average_response_ms,
        )
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
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn timed_out(&self) -> u32 {
        self.timed_out
    }

    #[must_use]
    pub fn average_response_ms(&self) -> Option<u32> {
        self.average_response_ms
    }

    /// Share of correct answers in percent; 0 when nothing was attempted.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.total) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PromptId, ResponseEvent};
    use crate::time::fixed_now;
    use chrono::Duration;

    fn answered(id: u64, correct: bool, ms: u32) -> Resolution {
        let presented = fixed_now();
        let response = ResponseEvent {
            prompt_id: PromptId::new(id),
            answer: correct,
            response_time_ms: ms,
            submitted_at: presented + Duration::milliseconds(i64::from(ms)),
        };
        Resolution::answered(response, correct, presented)
    }

    #[test]
    fn summary_counts_outcomes() {
        let now = fixed_now();
        let resolutions = vec![
            answered(1, true, 1_000),
            answered(2, false, 2_000),
            Resolution::timed_out(PromptId::new(3), now, now + Duration::seconds(5)),
            answered(4, true, 3_000),
        ];

        let summary =
            RoundSummary::from_resolutions(RoundId::new(1), now, now, &resolutions).unwrap();

        assert_eq!(summary.total(), 4);
        assert_eq!(summary.correct(), 2);
        assert_eq!(summary.incorrect(), 1);
        assert_eq!(summary.timed_out(), 1);
        assert_eq!(summary.average_response_ms(), Some(2_000));
        assert!((summary.accuracy() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_summary_has_zero_accuracy() {
        let now = fixed_now();
        let summary = RoundSummary::from_resolutions(RoundId::new(1), now, now, &[]).unwrap();
        assert_eq!(summary.accuracy(), 0.0);
        assert_eq!(summary.average_response_ms(), None);
    }

    #[test]
    fn rejects_inverted_time_range() {
        let now = fixed_now();
        let err = RoundSummary::from_resolutions(
            RoundId::new(1),
            now,
            now - Duration::seconds(1),
            &[],
        )
        .unwrap_err();
        assert_eq!(err, SummaryError::InvalidTimeRange);
    }

    #[test]
    fn persisted_counts_must_add_up() {
        let now = fixed_now();
        let err = RoundSummary::from_persisted(RoundId::new(1), now, now, 3, 1, 1, 0, None)
            .unwrap_err();
        assert_eq!(err, SummaryError::CountMismatch { total: 3, sum: 2 });
    }

    #[test]
    fn persisted_counts_that_overflow_are_a_mismatch() {
        let now = fixed_now();
        let err = RoundSummary::from_persisted(
            RoundId::new(1),
            now,
            now,
            u32::MAX,
            u32::MAX,
            1,
            0,
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SummaryError::CountMismatch {
                total: u32::MAX,
                sum: u64::from(u32::MAX) + 1,
            }
        );
    }
}
