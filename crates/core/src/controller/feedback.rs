use serde::Serialize;

use crate::model::{Feedback, PromptId, QuizPrompt, Resolution};
use crate::theme::{HapticPattern, Rgb, Theme};

/// Visual and haptic feedback for a resolved prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackSignal {
    pub prompt_id: PromptId,
    pub feedback: Feedback,
    pub color: Rgb,
    pub label: &'static str,
    /// `None` when haptics are disabled.
    pub haptic: Option<HapticPattern>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct FeedbackEmitter {
    theme: Theme,
    haptics: bool,
}

impl FeedbackEmitter {
    pub(crate) fn new(theme: Theme, haptics: bool) -> Self {
        Self { theme, haptics }
    }

    pub(crate) fn theme(&self) -> &Theme {
        &self.theme
    }

    pub(crate) fn signal(&self, prompt: &QuizPrompt, resolution: &Resolution) -> FeedbackSignal {
        let feedback = resolution.feedback();
        let style = self.theme.style(feedback);
        FeedbackSignal {
            prompt_id: resolution.prompt_id(),
            feedback,
            color: style.color,
            label: style.label,
            haptic: self.haptics.then(|| HapticPattern::for_feedback(feedback)),
            explanation: prompt.explanation().map(str::to_owned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PromptDraft;
    use crate::theme::AgeGroup;
    use crate::time::fixed_now;

    fn prompt() -> QuizPrompt {
        PromptDraft {
            explanation: Some("Spiders have eight legs.".into()),
            ..PromptDraft::new(4, "Spiders are insects.", false)
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn timeout_signal_carries_warning_haptic() {
        let emitter = FeedbackEmitter::new(Theme::default(), true);
        let now = fixed_now();
        let resolution = Resolution::timed_out(PromptId::new(4), now, now);

        let signal = emitter.signal(&prompt(), &resolution);

        assert_eq!(signal.feedback, Feedback::Timeout);
        assert_eq!(signal.haptic, Some(HapticPattern::Warning));
        assert_eq!(signal.label, "Out of time");
        assert_eq!(signal.explanation.as_deref(), Some("Spiders have eight legs."));
    }

    #[test]
    fn haptics_can_be_disabled() {
        let emitter = FeedbackEmitter::new(Theme::for_age_group(AgeGroup::Junior), false);
        let now = fixed_now();
        let resolution = Resolution::timed_out(PromptId::new(4), now, now);

        let signal = emitter.signal(&prompt(), &resolution);

        assert_eq!(signal.haptic, None);
        assert_eq!(signal.label, "Time's up!");
        assert_eq!(emitter.theme().age_group(), AgeGroup::Junior);
    }
}
