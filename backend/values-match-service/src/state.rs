use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::RatingBounds;
use crate::services::candidates::CandidateSource;
use crate::services::geo::IpLocator;
use crate::services::matching::MatchService;
use crate::services::questions::QuestionBank;
use crate::services::scoring::Scorer;

/// Shared application state, built once in `main` and handed to every worker
pub struct AppState {
    pub matcher: MatchService,
    pub locator: IpLocator,
    pub questions: QuestionBank,
    pub bounds: RatingBounds,
}

impl AppState {
    pub fn new(config: &Config, source: Arc<dyn CandidateSource>) -> Result<Self> {
        let scoring = &config.scoring;
        let scorer = Scorer::new(scoring.weights.clone(), scoring.min_shared_axes);
        let locator = IpLocator::new(&config.geo)
            .map_err(|e| AppError::Config(format!("failed to build geo client: {}", e)))?;

        Ok(Self {
            matcher: MatchService::new(source, scorer, scoring.default_limit, scoring.max_limit),
            locator,
            questions: QuestionBank::new(&scoring.bounds),
            bounds: scoring.bounds,
        })
    }
}
