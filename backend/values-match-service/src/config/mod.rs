use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::models::RatingBounds;
use crate::services::scoring::AxisWeights;

/// Public company worksheet used when nothing else is configured
const DEFAULT_SPREADSHEET_ID: &str = "18Sb4CcAE5JPFeufHG97tLZz9Uj_TvSGklVQQhoFF28w";
const DEFAULT_WORKSHEET: &str = "バリュー抽出";

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub app: AppConfig,
    pub scoring: ScoringConfig,
    pub source: SourceConfig,
    pub geo: GeoConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub service_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            service_name: "values-match-service".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub default_limit: usize,
    pub max_limit: usize,
    pub bounds: RatingBounds,
    pub min_shared_axes: usize,
    pub weights: AxisWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_limit: 3,
            max_limit: 10,
            bounds: RatingBounds::default(),
            min_shared_axes: 1,
            weights: AxisWeights::uniform(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Sheets,
    File,
}

impl FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sheets" => Ok(SourceKind::Sheets),
            "file" => Ok(SourceKind::File),
            other => bail!("unknown candidate source '{}' (use sheets|file)", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub candidates_file: PathBuf,
    pub sheets: SheetsConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Sheets,
            candidates_file: PathBuf::from("data/candidates.json"),
            sheets: SheetsConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub base_url: String,
    pub spreadsheet_id: String,
    pub worksheet: String,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sheets.googleapis.com".to_string(),
            spreadsheet_id: DEFAULT_SPREADSHEET_ID.to_string(),
            worksheet: DEFAULT_WORKSHEET.to_string(),
            api_key: None,
            access_token: None,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeoConfig {
    pub enabled: bool,
    pub base_url: String,
    pub timeout: Duration,
    pub cache_capacity: u64,
    pub cache_ttl: Duration,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://ipinfo.io".to_string(),
            timeout: Duration::from_secs(5),
            cache_capacity: 10_000,
            cache_ttl: Duration::from_secs(3600),
        }
    }
}

/// Unset and blank both mean "use the default"
fn var_or(name: &str, default: &str) -> String {
    optional_var(name)
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| default.to_string())
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} must be valid: {}", name, e)),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let bounds = RatingBounds {
            min_rating: parse_var("RATING_MIN", 1)?,
            max_rating: parse_var("RATING_MAX", 7)?,
            min_axes: parse_var("MIN_ANSWERED_AXES", 2)?,
            max_axes: parse_var("MAX_ANSWERED_AXES", 7)?,
        };
        if bounds.min_rating > bounds.max_rating {
            bail!("RATING_MIN must not exceed RATING_MAX");
        }
        if bounds.min_axes == 0 || bounds.min_axes > bounds.max_axes {
            bail!("MIN_ANSWERED_AXES must be within 1..=MAX_ANSWERED_AXES");
        }

        let scoring = ScoringConfig {
            default_limit: parse_var("RANK_DEFAULT_LIMIT", 3)?,
            max_limit: parse_var("RANK_MAX_LIMIT", 10)?,
            bounds,
            min_shared_axes: parse_var("MIN_SHARED_AXES", 1)?,
            weights: AxisWeights::parse(&var_or("AXIS_WEIGHTS", ""))
                .context("AXIS_WEIGHTS is invalid")?,
        };
        if scoring.default_limit == 0 || scoring.default_limit > scoring.max_limit {
            bail!("RANK_DEFAULT_LIMIT must be within 1..=RANK_MAX_LIMIT");
        }

        let sheets_defaults = SheetsConfig::default();
        let geo_defaults = GeoConfig::default();

        Ok(Config {
            app: AppConfig {
                env: var_or("APP_ENV", "development"),
                host: var_or("APP_HOST", "0.0.0.0"),
                port: parse_var("APP_PORT", 8080)?,
                service_name: var_or("SERVICE_NAME", "values-match-service"),
            },
            scoring,
            source: SourceConfig {
                kind: parse_var("CANDIDATE_SOURCE", SourceKind::Sheets)?,
                candidates_file: PathBuf::from(var_or(
                    "CANDIDATES_FILE",
                    "data/candidates.json",
                )),
                sheets: SheetsConfig {
                    base_url: var_or("SHEETS_BASE_URL", &sheets_defaults.base_url),
                    spreadsheet_id: var_or(
                        "SHEETS_SPREADSHEET_ID",
                        &sheets_defaults.spreadsheet_id,
                    ),
                    worksheet: var_or("SHEETS_WORKSHEET", &sheets_defaults.worksheet),
                    api_key: optional_var("SHEETS_API_KEY"),
                    access_token: optional_var("SHEETS_ACCESS_TOKEN"),
                    timeout: Duration::from_secs(parse_var(
                        "SHEETS_TIMEOUT_SECS",
                        sheets_defaults.timeout.as_secs(),
                    )?),
                },
            },
            geo: GeoConfig {
                enabled: parse_var("GEO_ENABLED", geo_defaults.enabled)?,
                base_url: var_or("GEO_BASE_URL", &geo_defaults.base_url),
                timeout: Duration::from_secs(parse_var(
                    "GEO_TIMEOUT_SECS",
                    geo_defaults.timeout.as_secs(),
                )?),
                cache_capacity: parse_var("GEO_CACHE_CAPACITY", geo_defaults.cache_capacity)?,
                cache_ttl: Duration::from_secs(parse_var(
                    "GEO_CACHE_TTL_SECS",
                    geo_defaults.cache_ttl.as_secs(),
                )?),
            },
        })
    }
}
