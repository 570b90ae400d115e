use std::collections::HashSet;
use std::path::{Path, PathBuf};

use quiz_core::model::{PromptDraft, PromptError, QuizPrompt};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to read deck {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse deck: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("prompt {id}: {source}")]
    Prompt { id: u64, source: PromptError },
    #[error("prompt id {0} appears more than once")]
    DuplicateId(u64),
}

/// A deck file: a list of `[[prompts]]` tables.
///
/// ```toml
/// [[prompts]]
/// id = 1
/// text = "The Pacific is the largest ocean."
/// answer = true
/// time_limit_ms = 8000
/// explanation = "It covers about a third of the planet."
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct DeckFile {
    #[serde(default)]
    pub prompts: Vec<PromptDraft>,
}

impl DeckFile {
    /// # Errors
    ///
    /// Returns `DeckError::Read` or `DeckError::Parse`.
    pub fn load(path: &Path) -> Result<Self, DeckError> {
        let content = std::fs::read_to_string(path).map_err(|source| DeckError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate every prompt and reject duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns the first `DeckError::Prompt` or `DeckError::DuplicateId`.
    pub fn into_prompts(self) -> Result<Vec<QuizPrompt>, DeckError> {
        let mut seen = HashSet::new();
        self.prompts
            .into_iter()
            .map(|draft| {
                let id = draft.id;
                if !seen.insert(id) {
                    return Err(DeckError::DuplicateId(id));
                }
                draft
                    .validate()
                    .map_err(|source| DeckError::Prompt { id, source })
            })
            .collect()
    }
}
