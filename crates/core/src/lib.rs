#![forbid(unsafe_code)]

pub mod controller;
pub mod error;
pub mod model;
pub mod scorer;
pub mod settings;
pub mod theme;
pub mod time;

pub use controller::{
    ControllerError, FeedbackSignal, Phase, QuizController, QuizEvent, QuizObserver,
    SubmitOutcome,
};
pub use error::Error;
pub use settings::{QuizSettings, QuizSettingsDraft, SettingsError};
pub use theme::{AgeGroup, HapticPattern, Theme};
pub use time::Clock;
