/// Similarity Scoring
///
/// Inverse-distance similarity between a quiz submission and a candidate,
/// computed only over the axes both of them carry.
use crate::models::{Axis, AxisVector, Candidate, ScoredCandidate};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightError {
    #[error("unknown axis in weights: {0}")]
    UnknownAxis(String),

    #[error("weight for {axis} must be a finite number > 0, got {raw}")]
    InvalidWeight { axis: Axis, raw: String },

    #[error("malformed weight entry: {0}")]
    Malformed(String),
}

/// Per-axis multipliers on the squared difference. Axes without an entry weigh 1.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisWeights(BTreeMap<Axis, f64>);

impl AxisWeights {
    pub fn uniform() -> Self {
        Self::default()
    }

    pub fn set(&mut self, axis: Axis, weight: f64) -> Result<(), WeightError> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(WeightError::InvalidWeight {
                axis,
                raw: weight.to_string(),
            });
        }
        self.0.insert(axis, weight);
        Ok(())
    }

    pub fn weight(&self, axis: Axis) -> f64 {
        self.0.get(&axis).copied().unwrap_or(1.0)
    }

    /// Parses `security=2,power=0.5`. An empty string yields uniform weights.
    pub fn parse(raw: &str) -> Result<Self, WeightError> {
        let mut weights = Self::uniform();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, value) = entry
                .split_once('=')
                .ok_or_else(|| WeightError::Malformed(entry.to_string()))?;
            let axis =
                Axis::parse(name).ok_or_else(|| WeightError::UnknownAxis(name.trim().to_string()))?;
            let weight: f64 = value.trim().parse().map_err(|_| WeightError::InvalidWeight {
                axis,
                raw: value.trim().to_string(),
            })?;
            weights.set(axis, weight)?;
        }
        Ok(weights)
    }
}

/// Weighted Euclidean distance over shared axes. No shared axes gives 0.
pub fn distance(user: &AxisVector, candidate: &AxisVector, weights: &AxisWeights) -> f64 {
    user.shared(candidate)
        .map(|(axis, u, c)| weights.weight(axis) * (u - c).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Maps a distance onto (0, 1]
pub fn similarity(distance: f64) -> f64 {
    // 1 / (1 + inf) would be 0; keep the result strictly positive
    (1.0 / (1.0 + distance)).max(f64::MIN_POSITIVE)
}

/// Ranks candidates against a submission
#[derive(Debug, Clone)]
pub struct Scorer {
    weights: AxisWeights,
    min_shared_axes: usize,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(AxisWeights::uniform(), 1)
    }
}

impl Scorer {
    /// `min_shared_axes` is raised to 1: a candidate sharing no axis would score a meaningless 1.0.
    pub fn new(weights: AxisWeights, min_shared_axes: usize) -> Self {
        Self {
            weights,
            min_shared_axes: min_shared_axes.max(1),
        }
    }

    pub fn score(&self, user: &AxisVector, candidate: &AxisVector) -> f64 {
        similarity(distance(user, candidate, &self.weights))
    }

    /// Scores every eligible candidate and returns the best `limit`, highest first.
    ///
    /// Candidates sharing fewer than `min_shared_axes` axes with the submission are skipped.
    /// Equal scores keep their input order.
    pub fn rank(
        &self,
        user: &AxisVector,
        candidates: &[Candidate],
        limit: usize,
    ) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .enumerate()
            .filter_map(|(position, candidate)| {
                let shared_axes = user.shared(&candidate.scores).count();
                if shared_axes < self.min_shared_axes {
                    return None;
                }
                Some(ScoredCandidate {
                    candidate: candidate.clone(),
                    score: self.score(user, &candidate.scores),
                    shared_axes,
                    position,
                })
            })
            .collect();

        let skipped = candidates.len() - scored.len();
        if skipped > 0 {
            debug!(
                skipped,
                min_shared_axes = self.min_shared_axes,
                "Candidates skipped for lack of shared axes"
            );
        }

        // sort_by is stable, so ties stay in input order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(limit);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(values: &[(Axis, f64)]) -> AxisVector {
        values.iter().copied().collect()
    }

    fn candidate(name: &str, scores: AxisVector) -> Candidate {
        Candidate {
            name: name.to_string(),
            url: format!("https://{}.example", name),
            value: String::new(),
            color_primary: "#000000".to_string(),
            color_secondary: "#ffffff".to_string(),
            scores,
        }
    }

    const A: Axis = Axis::SelfDirection;
    const B: Axis = Axis::Security;
    const C: Axis = Axis::Universalism;

    #[test]
    fn test_identical_vectors_score_one() {
        let v = vector(&[(A, 4.0), (B, 4.0), (C, 4.0)]);
        let scorer = Scorer::default();
        assert_eq!(scorer.score(&v, &v.clone()), 1.0);
    }

    #[test]
    fn test_distance_three_scores_quarter() {
        let user = vector(&[(A, 0.0), (B, 0.0), (C, 0.0)]);
        let cand = vector(&[(A, 1.0), (B, 2.0), (C, 2.0)]);
        assert_eq!(distance(&user, &cand, &AxisWeights::uniform()), 3.0);
        assert_eq!(Scorer::default().score(&user, &cand), 0.25);
    }

    #[test]
    fn test_axes_missing_from_candidate_are_ignored() {
        let user = vector(&[(A, 4.0), (B, 1.0), (C, 7.0)]);
        let cand = vector(&[(A, 4.0)]);
        assert_eq!(Scorer::default().score(&user, &cand), 1.0);
    }

    #[test]
    fn test_no_shared_axes_is_degenerate_one() {
        let user = vector(&[(A, 4.0)]);
        let cand = vector(&[(B, 1.0)]);
        assert_eq!(distance(&user, &cand, &AxisWeights::uniform()), 0.0);
        assert_eq!(Scorer::default().score(&user, &cand), 1.0);
    }

    #[test]
    fn test_score_monotone_and_bounded() {
        let user = vector(&[(A, 0.0)]);
        let mut previous = f64::INFINITY;
        for step in 0..200 {
            let cand = vector(&[(A, step as f64 * 0.5)]);
            let score = Scorer::default().score(&user, &cand);
            assert!(score > 0.0 && score <= 1.0);
            assert!(score <= previous);
            previous = score;
        }

        let far = vector(&[(A, 1e300)]);
        let near_zero = Scorer::default().score(&vector(&[(A, -1e300)]), &far);
        assert!(near_zero > 0.0);
    }

    #[test]
    fn test_weights_scale_squared_difference() {
        let mut weights = AxisWeights::uniform();
        weights.set(A, 4.0).unwrap();
        let user = vector(&[(A, 0.0)]);
        let cand = vector(&[(A, 1.0)]);
        // sqrt(4 * 1) = 2
        assert_eq!(distance(&user, &cand, &weights), 2.0);
    }

    #[test]
    fn test_weights_parse() {
        let weights = AxisWeights::parse("security=2, PVQ_権力=0.5").unwrap();
        assert_eq!(weights.weight(Axis::Security), 2.0);
        assert_eq!(weights.weight(Axis::Power), 0.5);
        assert_eq!(weights.weight(Axis::Hedonism), 1.0);

        assert_eq!(AxisWeights::parse("").unwrap(), AxisWeights::uniform());
        assert!(matches!(
            AxisWeights::parse("kindness=1"),
            Err(WeightError::UnknownAxis(_))
        ));
        assert!(matches!(
            AxisWeights::parse("security=0"),
            Err(WeightError::InvalidWeight { .. })
        ));
        assert!(matches!(
            AxisWeights::parse("security"),
            Err(WeightError::Malformed(_))
        ));
    }

    #[test]
    fn test_rank_top_three_of_five() {
        let user = vector(&[(A, 4.0), (B, 4.0)]);
        let candidates = vec![
            candidate("far", vector(&[(A, 1.0), (B, 1.0)])),
            candidate("exact", vector(&[(A, 4.0), (B, 4.0)])),
            candidate("near", vector(&[(A, 5.0), (B, 4.0)])),
            candidate("mid", vector(&[(A, 6.0), (B, 5.0)])),
            candidate("farthest", vector(&[(A, 7.0), (B, 7.0)])),
        ];

        let ranked = Scorer::default().rank(&user, &candidates, 3);
        assert_eq!(ranked.len(), 3);
        let names: Vec<_> = ranked.iter().map(|s| s.candidate.name.as_str()).collect();
        assert_eq!(names, vec!["exact", "near", "mid"]);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let user = vector(&[(A, 4.0), (B, 4.0)]);
        let candidates = vec![
            candidate("first", vector(&[(A, 5.0), (B, 4.0)])),
            candidate("best", vector(&[(A, 4.0), (B, 4.0)])),
            candidate("second", vector(&[(A, 4.0), (B, 3.0)])),
            candidate("third", vector(&[(A, 3.0), (B, 4.0)])),
        ];

        let ranked = Scorer::default().rank(&user, &candidates, 10);
        let names: Vec<_> = ranked.iter().map(|s| s.candidate.name.as_str()).collect();
        assert_eq!(names, vec!["best", "first", "second", "third"]);
        assert_eq!(ranked[1].position, 0);
        assert_eq!(ranked[2].position, 2);
    }

    #[test]
    fn test_rank_uses_full_precision_not_display_rounding() {
        let user = vector(&[(A, 4.0), (B, 4.0)]);
        let candidates = vec![
            candidate("coarse", vector(&[(A, 4.0004), (B, 4.0)])),
            candidate("fine", vector(&[(A, 4.0001), (B, 4.0)])),
        ];

        let ranked = Scorer::default().rank(&user, &candidates, 2);
        let names: Vec<_> = ranked.iter().map(|s| s.candidate.name.as_str()).collect();
        assert_eq!(names, vec!["fine", "coarse"]);
        assert_eq!(ranked[0].display_score(), ranked[1].display_score());
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_rank_skips_candidates_without_shared_axes() {
        let user = vector(&[(A, 4.0), (B, 4.0)]);
        let candidates = vec![
            candidate("unrelated", vector(&[(Axis::Hedonism, 4.0)])),
            candidate("partial", vector(&[(A, 1.0)])),
        ];

        let ranked = Scorer::default().rank(&user, &candidates, 3);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].candidate.name, "partial");
        assert_eq!(ranked[0].shared_axes, 1);

        let strict = Scorer::new(AxisWeights::uniform(), 2).rank(&user, &candidates, 3);
        assert!(strict.is_empty());
    }

    #[test]
    fn test_rank_does_not_mutate_input() {
        let user = vector(&[(A, 4.0), (B, 4.0)]);
        let candidates = vec![
            candidate("x", vector(&[(A, 1.0), (B, 2.0)])),
            candidate("y", vector(&[(A, 4.0), (B, 4.0)])),
        ];
        let before = candidates.clone();
        let _ = Scorer::default().rank(&user, &candidates, 1);
        assert_eq!(candidates, before);
    }
}
