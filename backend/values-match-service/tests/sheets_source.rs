use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use values_match_service::config::SheetsConfig;
use values_match_service::models::Axis;
use values_match_service::services::{CandidateSource, SheetsCandidateSource, SourceError};

const VALUES_PATH: &str = "/v4/spreadsheets/sheet-123/values/Values";

fn sheets_config(server: &MockServer) -> SheetsConfig {
    SheetsConfig {
        base_url: server.uri(),
        spreadsheet_id: "sheet-123".to_string(),
        worksheet: "Values".to_string(),
        api_key: Some("test-key".to_string()),
        access_token: None,
        timeout: Duration::from_millis(500),
    }
}

fn worksheet() -> serde_json::Value {
    json!({
        "range": "Values!A1:H4",
        "majorDimension": "ROWS",
        "values": [
            ["会社名", "URL", "バリュー", "色1コード", "色2コード", "PVQ_自己方向性", "PVQ_安全", "PVQ_権力"],
            ["Aozora Systems", "https://aozora.example", "挑戦を楽しむ", "#1e90ff", "#ffffff", "6", "3", "2"],
            ["対象外", "https://skip.example", "", "#000000", "#000000", "1", "1", "1"],
            ["Kanade Foods", "https://kanade.example", "", "#ff8c00", "#8b4513", "2", "6.5"]
        ]
    })
}

#[tokio::test]
async fn loads_candidates_from_worksheet() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VALUES_PATH))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(worksheet()))
        .expect(2)
        .mount(&server)
        .await;

    let source = SheetsCandidateSource::new(sheets_config(&server)).unwrap();
    let candidates = source.load().await;

    let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Aozora Systems", "Kanade Foods"]);
    assert_eq!(candidates[0].scores.get(Axis::Power), Some(2.0));
    // Trailing cells omitted by the API leave that axis out
    assert_eq!(candidates[1].scores.len(), 2);
    assert_eq!(candidates[1].scores.get(Axis::Security), Some(6.5));

    // Every call reads the sheet again
    assert_eq!(source.load().await.len(), 2);
}

#[tokio::test]
async fn sends_bearer_token_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VALUES_PATH))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(worksheet()))
        .expect(1)
        .mount(&server)
        .await;

    let config = SheetsConfig {
        api_key: None,
        access_token: Some("secret-token".to_string()),
        ..sheets_config(&server)
    };
    let source = SheetsCandidateSource::new(config).unwrap();
    assert_eq!(source.load().await.len(), 2);
}

#[tokio::test]
async fn error_status_yields_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VALUES_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let source = SheetsCandidateSource::new(sheets_config(&server)).unwrap();
    assert!(matches!(source.try_load().await, Err(SourceError::Status(403))));
    assert!(source.load().await.is_empty());
}

#[tokio::test]
async fn malformed_payload_yields_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VALUES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let source = SheetsCandidateSource::new(sheets_config(&server)).unwrap();
    assert!(matches!(source.try_load().await, Err(SourceError::Payload(_))));
    assert!(source.load().await.is_empty());
}

#[tokio::test]
async fn missing_required_column_yields_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VALUES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [["URL", "色1コード", "色2コード"], ["https://a.example", "#1", "#2"]]
        })))
        .mount(&server)
        .await;

    let source = SheetsCandidateSource::new(sheets_config(&server)).unwrap();
    assert!(source.load().await.is_empty());
}

#[tokio::test]
async fn slow_sheet_times_out_to_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VALUES_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(worksheet())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = SheetsConfig {
        timeout: Duration::from_millis(100),
        ..sheets_config(&server)
    };
    let source = SheetsCandidateSource::new(config).unwrap();
    assert!(source.load().await.is_empty());
}
