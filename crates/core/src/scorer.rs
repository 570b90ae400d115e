use chrono::{DateTime, Utc};

use crate::model::{QuizPrompt, Resolution, ResponseEvent};
use crate::time::millis_between;

/// Correctness of a binary answer.
#[must_use]
pub fn score(expected: bool, actual: bool) -> bool {
    expected == actual
}

/// Build the answered resolution for `prompt`, measuring response time from display.
#[must_use]
pub fn score_answer(
    prompt: &QuizPrompt,
    answer: bool,
    presented_at: DateTime<Utc>,
    submitted_at: DateTime<Utc>,
) -> Resolution {
    let response = ResponseEvent {
        prompt_id: prompt.id(),
        answer,
        response_time_ms: millis_between(presented_at, submitted_at),
        submitted_at,
    };
    Resolution::answered(response, score(prompt.expected(), answer), presented_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PromptDraft, ResolutionReason};
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn score_is_equality() {
        assert!(score(true, true));
        assert!(score(false, false));
        assert!(!score(true, false));
        assert!(!score(false, true));
    }

    #[test]
    fn answer_records_response_time() {
        let prompt = PromptDraft::new(1, "Water boils at 100C at sea level.", true)
            .validate()
            .unwrap();
        let presented = fixed_now();
        let resolution =
            score_answer(&prompt, true, presented, presented + Duration::milliseconds(1_200));

        assert!(resolution.correct());
        assert_eq!(resolution.reason(), ResolutionReason::Answered);
        assert_eq!(resolution.response_time_ms(), Some(1_200));
    }
}
