/// Ranking API
///
/// GET /api/rank?self_direction=5&security=3&...&limit=3&format=html
use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse, ResponseError};
use serde::Serialize;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::{Axis, ScoredCandidate, UserResponse};
use crate::render;
use crate::state::AppState;

/// Parameters of the legacy three-question quiz
const LEGACY_KEYS: [(&str, Axis); 3] = [
    ("q1", Axis::SelfDirection),
    ("q2", Axis::Security),
    ("q3", Axis::Universalism),
];

/// Rating assumed for every legacy question when nothing was answered
const LEGACY_DEFAULT_RATING: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
}

impl OutputFormat {
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self> {
        match pairs.iter().rev().find(|(k, _)| k == "format") {
            None => Ok(OutputFormat::Html),
            Some((_, v)) => match v.trim().to_ascii_lowercase().as_str() {
                "html" => Ok(OutputFormat::Html),
                "json" => Ok(OutputFormat::Json),
                other => Err(AppError::BadRequest(format!(
                    "unsupported format '{}' (use html|json)",
                    other
                ))),
            },
        }
    }
}

/// Query string of a ranking request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankParams {
    pub ratings: Vec<(Axis, i64)>,
    pub limit: Option<usize>,
}

impl RankParams {
    /// Axis keys may be ASCII keys or sheet column names; `q1..q3` map onto the
    /// first three axes. Unless a named axis key is given, each of `q1..q3` left
    /// out of the query defaults to 4.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self> {
        let mut ratings = Vec::new();
        let mut limit = None;
        let mut named_axis = false;

        for (key, value) in pairs {
            let key = key.trim();
            match key {
                "format" => {}
                "limit" => {
                    limit = Some(value.trim().parse::<usize>().map_err(|_| {
                        AppError::BadRequest(format!("limit must be a positive integer, got '{}'", value))
                    })?);
                }
                _ => {
                    let legacy = LEGACY_KEYS
                        .iter()
                        .find(|(legacy, _)| *legacy == key)
                        .map(|(_, axis)| *axis);
                    let axis = match legacy {
                        Some(axis) => axis,
                        None => {
                            named_axis = true;
                            Axis::parse(key).ok_or_else(|| {
                                AppError::BadRequest(format!("unknown parameter '{}'", key))
                            })?
                        }
                    };
                    let rating = value.trim().parse::<i64>().map_err(|_| {
                        AppError::Validation(format!(
                            "rating for {} must be an integer, got '{}'",
                            axis, value
                        ))
                    })?;
                    ratings.push((axis, rating));
                }
            }
        }

        if !named_axis {
            for (_, axis) in LEGACY_KEYS {
                if !ratings.iter().any(|(answered, _)| *answered == axis) {
                    ratings.push((axis, LEGACY_DEFAULT_RATING));
                }
            }
        }

        Ok(Self { ratings, limit })
    }
}

#[derive(Debug, Serialize)]
pub struct MatchView {
    pub rank: usize,
    pub name: String,
    pub url: String,
    pub value: String,
    pub colors: [String; 2],
    /// Rounded to 3 decimals
    pub score: f64,
    pub shared_axes: usize,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub count: usize,
    pub results: Vec<MatchView>,
}

impl From<Vec<ScoredCandidate>> for RankResponse {
    fn from(ranked: Vec<ScoredCandidate>) -> Self {
        let results: Vec<MatchView> = ranked
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let score = item.display_score();
                let c = item.candidate;
                MatchView {
                    rank: i + 1,
                    name: c.name,
                    url: c.url,
                    value: c.value,
                    colors: [c.color_primary, c.color_secondary],
                    score,
                    shared_axes: item.shared_axes,
                }
            })
            .collect();
        Self {
            count: results.len(),
            results,
        }
    }
}

async fn run_ranking(
    pairs: &[(String, String)],
    state: &AppState,
) -> Result<Vec<ScoredCandidate>> {
    let params = RankParams::from_pairs(pairs)?;
    debug!(ratings = ?params.ratings, limit = ?params.limit, "Rank request");
    let response = UserResponse::new(params.ratings, &state.bounds)?;
    state.matcher.rank(&response, params.limit).await
}

fn html_error(err: &AppError) -> HttpResponse {
    let message = match err {
        AppError::DataUnavailable => render::UNAVAILABLE_MESSAGE.to_string(),
        other => other.to_string(),
    };
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!(error = %err, "Ranking failed");
    }
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(render::message_fragment(&message))
}

/// GET /api/rank
///
/// HTML fragments by default (table view + card view), JSON with `format=json`.
pub async fn rank(
    query: web::Query<Vec<(String, String)>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let pairs = query.into_inner();
    let format = OutputFormat::from_pairs(&pairs)?;
    let outcome = run_ranking(&pairs, &state).await;

    match format {
        OutputFormat::Json => Ok(HttpResponse::Ok().json(RankResponse::from(outcome?))),
        OutputFormat::Html => Ok(match outcome {
            Ok(ranked) => HttpResponse::Ok()
                .content_type(ContentType::html())
                .body(render::results_fragment(&ranked)),
            Err(e) => html_error(&e),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_to_legacy_quiz() {
        let params = RankParams::from_pairs(&[]).unwrap();
        assert_eq!(
            params.ratings,
            vec![
                (Axis::SelfDirection, 4),
                (Axis::Security, 4),
                (Axis::Universalism, 4)
            ]
        );
        assert_eq!(params.limit, None);
    }

    #[test]
    fn test_missing_legacy_questions_default_individually() {
        let params = RankParams::from_pairs(&pairs(&[("q1", "5")])).unwrap();
        assert_eq!(
            params.ratings,
            vec![
                (Axis::SelfDirection, 5),
                (Axis::Security, 4),
                (Axis::Universalism, 4)
            ]
        );

        let params = RankParams::from_pairs(&pairs(&[("q3", "2"), ("q1", "6"), ("limit", "1")])).unwrap();
        assert_eq!(
            params.ratings,
            vec![
                (Axis::Universalism, 2),
                (Axis::SelfDirection, 6),
                (Axis::Security, 4)
            ]
        );
    }

    #[test]
    fn test_named_axes_disable_legacy_defaults() {
        let params = RankParams::from_pairs(&pairs(&[("power", "3"), ("hedonism", "5")])).unwrap();
        assert_eq!(params.ratings, vec![(Axis::Power, 3), (Axis::Hedonism, 5)]);
    }

    #[test]
    fn test_mixed_keys() {
        let params = RankParams::from_pairs(&pairs(&[
            ("q1", "2"),
            ("PVQ_権力", "6"),
            ("hedonism", " 7 "),
            ("limit", "5"),
            ("format", "json"),
        ]))
        .unwrap();
        assert_eq!(
            params.ratings,
            vec![(Axis::SelfDirection, 2), (Axis::Power, 6), (Axis::Hedonism, 7)]
        );
        assert_eq!(params.limit, Some(5));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            RankParams::from_pairs(&pairs(&[("security", "4.5")])),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            RankParams::from_pairs(&pairs(&[("kindness", "4")])),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            RankParams::from_pairs(&pairs(&[("limit", "-1")])),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_output_format() {
        assert_eq!(OutputFormat::from_pairs(&[]).unwrap(), OutputFormat::Html);
        assert_eq!(
            OutputFormat::from_pairs(&pairs(&[("format", "JSON")])).unwrap(),
            OutputFormat::Json
        );
        assert!(OutputFormat::from_pairs(&pairs(&[("format", "xml")])).is_err());
    }
}
