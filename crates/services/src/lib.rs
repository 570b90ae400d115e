#![forbid(unsafe_code)]

pub mod clock;
pub mod error;
pub mod observer;
pub mod rounds;
pub mod runner;

pub use quiz_core::Clock;

pub use clock::RuntimeClock;
pub use error::{RoundError, RunnerError};
pub use observer::ChannelObserver;
pub use runner::QuizRunner;

pub use rounds::{QuizRound, RoundBuilder, RoundEvent, RoundLoop, RoundPlan, RoundProgress};
