/// Candidate Sources
///
/// Every source hands back a fresh candidate list per call. A source that cannot
/// read its backing store logs the failure and returns an empty list; the caller
/// treats "empty" as "data unavailable".
mod sheets;

pub use sheets::{candidates_from_rows, SheetsCandidateSource};

use crate::models::Candidate;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Read timed out after {0:?}")]
    Timeout(Duration),

    #[error("Required column missing: {0}")]
    MissingColumn(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Empty on any read failure; never errors.
    async fn load(&self) -> Vec<Candidate>;

    fn name(&self) -> &'static str;
}

/// Fixed candidate list held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticCandidateSource {
    candidates: Vec<Candidate>,
}

impl StaticCandidateSource {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// Reads a JSON array of candidates
    pub async fn from_json_file(path: &Path) -> Result<Self, SourceError> {
        let bytes = tokio::fs::read(path).await?;
        let candidates: Vec<Candidate> = serde_json::from_slice(&bytes)?;
        info!(
            path = %path.display(),
            count = candidates.len(),
            "Loaded fixed candidate list"
        );
        Ok(Self::new(candidates))
    }
}

#[async_trait]
impl CandidateSource for StaticCandidateSource {
    async fn load(&self) -> Vec<Candidate> {
        self.candidates.clone()
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
