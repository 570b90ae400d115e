use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::model::QuizPrompt;

/// Ordered prompt selection for one round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundPlan {
    pub prompts: Vec<QuizPrompt>,
}

impl RoundPlan {
    #[must_use]
    pub fn total(&self) -> usize {
        self.prompts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

/// Builds a round from a deck's prompts.
///
/// Prompts play in deck order (`order`, then id) unless shuffled.
pub struct RoundBuilder {
    prompts: Vec<QuizPrompt>,
    shuffle: bool,
    limit: Option<usize>,
}

impl RoundBuilder {
    #[must_use]
    pub fn new(prompts: impl IntoIterator<Item = QuizPrompt>) -> Self {
        Self {
            prompts: prompts.into_iter().collect(),
            shuffle: false,
            limit: None,
        }
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Cap the round size; `None` plays every prompt.
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn build(self) -> RoundPlan {
        let mut prompts = self.prompts;
        prompts.sort_by_key(|p| (p.order(), p.id()));
        if self.shuffle {
            let mut rng = rng();
            prompts.as_mut_slice().shuffle(&mut rng);
        }
        if let Some(limit) = self.limit {
            prompts.truncate(limit);
        }
        RoundPlan { prompts }
    }
}
