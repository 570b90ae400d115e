use thiserror::Error;

use crate::controller::ControllerError;
use crate::model::{PromptError, SummaryError};
use crate::settings::SettingsError;
use crate::theme::ThemeError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Theme(#[from] ThemeError),
    #[error(transparent)]
    Controller(#[from] ControllerError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
}
