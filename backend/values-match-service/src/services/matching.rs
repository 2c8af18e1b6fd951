use crate::error::{AppError, Result};
use crate::models::{ScoredCandidate, UserResponse};
use crate::services::candidates::CandidateSource;
use crate::services::scoring::Scorer;
use std::sync::Arc;
use tracing::{info, warn};

/// Company matching for one quiz submission
///
/// Loads a fresh candidate list, scores it, and keeps the best matches.
pub struct MatchService {
    source: Arc<dyn CandidateSource>,
    scorer: Scorer,
    default_limit: usize,
    max_limit: usize,
}

impl MatchService {
    pub fn new(
        source: Arc<dyn CandidateSource>,
        scorer: Scorer,
        default_limit: usize,
        max_limit: usize,
    ) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            source,
            scorer,
            default_limit: default_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    /// Requested limit clamped to `1..=max_limit`; `None` means the default.
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit)
    }

    /// Top matches, best first.
    ///
    /// An empty candidate list means the source could not be read and becomes
    /// `AppError::DataUnavailable`. Candidates sharing no axis with the
    /// submission are never returned.
    pub async fn rank(
        &self,
        response: &UserResponse,
        limit: Option<usize>,
    ) -> Result<Vec<ScoredCandidate>> {
        let candidates = self.source.load().await;
        if candidates.is_empty() {
            warn!(source = self.source.name(), "No candidates available");
            return Err(AppError::DataUnavailable);
        }

        let limit = self.effective_limit(limit);
        let ranked = self.scorer.rank(response.vector(), &candidates, limit);

        info!(
            source = self.source.name(),
            candidates = candidates.len(),
            answered_axes = response.vector().len(),
            returned = ranked.len(),
            top_score = ranked.first().map(|s| s.score),
            "Ranking complete"
        );

        Ok(ranked)
    }
}
