use super::{CandidateSource, SourceError};
use crate::config::SheetsConfig;
use crate::models::{Axis, AxisVector, Candidate};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, error, info};

const NAME_COLUMN: &str = "会社名";
const URL_COLUMN: &str = "URL";
const VALUE_COLUMN: &str = "バリュー";
const COLOR_PRIMARY_COLUMN: &str = "色1コード";
const COLOR_SECONDARY_COLUMN: &str = "色2コード";

/// Name used in the sheet for rows that must not be offered
const EXCLUDED_NAME: &str = "対象外";

/// Body of the Sheets API `values.get` call
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Reads candidates from a Google Sheets worksheet on every call
pub struct SheetsCandidateSource {
    client: reqwest::Client,
    config: SheetsConfig,
}

impl SheetsCandidateSource {
    pub fn new(config: SheetsConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn values_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.spreadsheet_id),
            urlencoding::encode(&self.config.worksheet),
        )
    }

    async fn fetch_rows(&self) -> Result<Vec<Vec<String>>, SourceError> {
        let mut request = self.client.get(self.values_url());
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key.as_str())]);
        }
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let range: ValueRange = serde_json::from_slice(&body)?;
        Ok(range.values)
    }

    pub async fn try_load(&self) -> Result<Vec<Candidate>, SourceError> {
        let rows = tokio::time::timeout(self.config.timeout, self.fetch_rows())
            .await
            .map_err(|_| SourceError::Timeout(self.config.timeout))??;
        candidates_from_rows(&rows)
    }
}

#[async_trait]
impl CandidateSource for SheetsCandidateSource {
    async fn load(&self) -> Vec<Candidate> {
        match self.try_load().await {
            Ok(candidates) => {
                info!(
                    worksheet = %self.config.worksheet,
                    count = candidates.len(),
                    "Spreadsheet candidates loaded"
                );
                candidates
            }
            Err(e) => {
                error!(
                    worksheet = %self.config.worksheet,
                    error = %e,
                    "Spreadsheet read failed"
                );
                Vec::new()
            }
        }
    }

    fn name(&self) -> &'static str {
        "sheets"
    }
}

struct Columns {
    name: usize,
    url: usize,
    value: Option<usize>,
    color_primary: usize,
    color_secondary: usize,
    axes: Vec<(Axis, usize)>,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self, SourceError> {
        let index: HashMap<&str, usize> = header
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();
        let required = |column: &str| {
            index
                .get(column)
                .copied()
                .ok_or_else(|| SourceError::MissingColumn(column.to_string()))
        };

        Ok(Self {
            name: required(NAME_COLUMN)?,
            url: required(URL_COLUMN)?,
            value: index.get(VALUE_COLUMN).copied(),
            color_primary: required(COLOR_PRIMARY_COLUMN)?,
            color_secondary: required(COLOR_SECONDARY_COLUMN)?,
            axes: Axis::ALL
                .iter()
                .filter_map(|axis| index.get(axis.column()).map(|&i| (*axis, i)))
                .collect(),
        })
    }
}

fn cell(row: &[String], index: usize) -> &str {
    // The API drops trailing empty cells, so rows may be shorter than the header
    row.get(index).map(|s| s.trim()).unwrap_or("")
}

/// Converts a worksheet (header row first) into candidates.
///
/// Rows without a name, marked `対象外`, or missing either color are dropped.
/// Non-numeric axis cells leave that axis out for the row; rows with no usable
/// axis at all are dropped.
pub fn candidates_from_rows(rows: &[Vec<String>]) -> Result<Vec<Candidate>, SourceError> {
    let Some((header, body)) = rows.split_first() else {
        return Ok(Vec::new());
    };
    let columns = Columns::from_header(header)?;

    let mut candidates = Vec::with_capacity(body.len());
    let mut dropped = 0usize;
    let mut malformed_cells = 0usize;

    for row in body {
        let name = cell(row, columns.name);
        let color_primary = cell(row, columns.color_primary);
        let color_secondary = cell(row, columns.color_secondary);
        if name.is_empty()
            || name == EXCLUDED_NAME
            || color_primary.is_empty()
            || color_secondary.is_empty()
        {
            dropped += 1;
            continue;
        }

        let mut scores = AxisVector::new();
        for &(axis, index) in &columns.axes {
            let raw = cell(row, index);
            if raw.is_empty() {
                continue;
            }
            match raw.parse::<f64>() {
                Ok(value) if scores.insert(axis, value) => {}
                _ => malformed_cells += 1,
            }
        }
        if scores.is_empty() {
            dropped += 1;
            continue;
        }

        candidates.push(Candidate {
            name: name.to_string(),
            url: cell(row, columns.url).to_string(),
            value: columns
                .value
                .map(|i| cell(row, i).to_string())
                .unwrap_or_default(),
            color_primary: color_primary.to_string(),
            color_secondary: color_secondary.to_string(),
            scores,
        });
    }

    debug!(
        kept = candidates.len(),
        dropped, malformed_cells, "Worksheet rows converted"
    );
    Ok(candidates)
}
