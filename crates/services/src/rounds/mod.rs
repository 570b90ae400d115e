mod plan;
mod progress;
mod service;
mod workflow;

pub use plan::{RoundBuilder, RoundPlan};
pub use progress::RoundProgress;
pub use service::QuizRound;
pub use workflow::{RoundEvent, RoundLoop};
