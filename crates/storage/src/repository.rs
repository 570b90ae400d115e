use async_trait::async_trait;
use quiz_core::model::{Resolution, RoundId, RoundSummary};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),
}

/// Persisted resolution, tagged with the round it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRecord {
    pub id: i64,
    pub round_id: RoundId,
    pub resolution: Resolution,
}

/// Append-only log of prompt resolutions.
#[async_trait]
pub trait ResolutionRepository: Send + Sync {
    /// Append a resolution for a round and return its log id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the prompt already has a resolution in this round.
    async fn append_resolution(
        &self,
        round_id: RoundId,
        resolution: &Resolution,
    ) -> Result<i64, StorageError>;

    /// List resolutions for a round in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    async fn list_resolutions(
        &self,
        round_id: RoundId,
    ) -> Result<Vec<ResolutionRecord>, StorageError>;
}

#[async_trait]
pub trait RoundSummaryRepository: Send + Sync {
    /// Persist a round summary and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the summary cannot be stored.
    async fn append_summary(&self, summary: &RoundSummary) -> Result<i64, StorageError>;

    /// Fetch a summary by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn get_summary(&self, id: i64) -> Result<RoundSummary, StorageError>;

    /// Most recent summaries first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the summaries cannot be read.
    async fn list_summaries(
        &self,
        limit: usize,
    ) -> Result<Vec<(i64, RoundSummary)>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    resolutions: Arc<Mutex<Vec<ResolutionRecord>>>,
    summaries: Arc<Mutex<HashMap<i64, RoundSummary>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResolutionRepository for InMemoryRepository {
    async fn append_resolution(
        &self,
        round_id: RoundId,
        resolution: &Resolution,
    ) -> Result<i64, StorageError> {
        let mut guard = self
            .resolutions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let duplicate = guard
            .iter()
            .any(|r| r.round_id == round_id && r.resolution.prompt_id() == resolution.prompt_id());
        if duplicate {
            return Err(StorageError::Conflict);
        }
        let id = i64::try_from(guard.len())
            .map_err(|e| StorageError::Connection(e.to_string()))?
            + 1;
        guard.push(ResolutionRecord {
            id,
            round_id,
            resolution: resolution.clone(),
        });
        Ok(id)
    }

    async fn list_resolutions(
        &self,
        round_id: RoundId,
    ) -> Result<Vec<ResolutionRecord>, StorageError> {
        let guard = self
            .resolutions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|r| r.round_id == round_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RoundSummaryRepository for InMemoryRepository {
    async fn append_summary(&self, summary: &RoundSummary) -> Result<i64, StorageError> {
        let mut guard = self
            .summaries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = guard.keys().copied().max().unwrap_or(0) + 1;
        guard.insert(id, summary.clone());
        Ok(id)
    }

    async fn get_summary(&self, id: i64) -> Result<RoundSummary, StorageError> {
        let guard = self
            .summaries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_summaries(
        &self,
        limit: usize,
    ) -> Result<Vec<(i64, RoundSummary)>, StorageError> {
        let guard = self
            .summaries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut items: Vec<(i64, RoundSummary)> =
            guard.iter().map(|(id, s)| (*id, s.clone())).collect();
        items.sort_by(|a, b| b.1.completed_at().cmp(&a.1.completed_at()).then(b.0.cmp(&a.0)));
        items.truncate(limit);
        Ok(items)
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub resolutions: Arc<dyn ResolutionRepository>,
    pub summaries: Arc<dyn RoundSummaryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let resolutions: Arc<dyn ResolutionRepository> = Arc::new(repo.clone());
        let summaries: Arc<dyn RoundSummaryRepository> = Arc::new(repo);
        Self {
            resolutions,
            summaries,
        }
    }
}
