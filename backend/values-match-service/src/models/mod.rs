mod axis;

pub use axis::{Axis, AxisVector, RatingBounds, RatingError, UserResponse};

use serde::{Deserialize, Serialize};

/// A company ranked against quiz answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub url: String,
    /// Free-text company values shown under the name
    #[serde(default)]
    pub value: String,
    pub color_primary: String,
    pub color_secondary: String,
    pub scores: AxisVector,
}

/// Candidate with its derived similarity score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    /// Full precision, in (0, 1]
    pub score: f64,
    pub shared_axes: usize,
    /// Index in the source list, kept so equal scores stay in input order
    pub position: usize,
}

impl ScoredCandidate {
    pub fn display_score(&self) -> f64 {
        round_score(self.score)
    }
}

/// Rounds to 3 decimal places for display
pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

/// Quiz prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub axis: Axis,
    pub column: &'static str,
    pub text: &'static str,
}

/// Visitor location resolved from an IP address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub org: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Location {
    pub fn unknown(ip: &str, error: Option<String>) -> Self {
        Self {
            ip: ip.to_string(),
            error,
            ..Default::default()
        }
    }

    pub fn region_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.region.trim().is_empty() {
            fallback
        } else {
            &self.region
        }
    }
}
