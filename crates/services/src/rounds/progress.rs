use serde::Serialize;

/// Aggregated view of round progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub correct_streak: u32,
    pub best_streak: u32,
    pub is_complete: bool,
}
