use creator_match::core::selector::seed_hash;
use creator_match::utils::error::ErrorKind;
use creator_match::{Category, MatchConfig, MatchOutcome};
use httpmock::prelude::*;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const SHEET_ID: &str = "test-sheet";
const GVIZ_PATH: &str = "/spreadsheets/d/test-sheet/gviz/tq";
const CSV_PATH: &str = "/spreadsheets/d/test-sheet/export";

fn test_config(server: &MockServer) -> MatchConfig {
    let mut config = MatchConfig::default();
    config.roster.base_url = server.base_url();
    config.roster.spreadsheet_id = SHEET_ID.to_string();
    config.roster.timeout_seconds = 5;
    config.classifier.endpoint = server.url("/api/classify");
    config.classifier.timeout_seconds = 5;
    config.matching.min_display_ms = 50;
    config.matching.finding_stage_ms = 10;
    config.matching.finalizing_stage_ms = 20;
    config
}

fn gviz_body(rows: &[(&str, &str)]) -> String {
    let rows: Vec<serde_json::Value> = rows
        .iter()
        .map(|(name, category)| {
            serde_json::json!({"c": [{"v": name}, {"v": category}, null, {"v": 25}]})
        })
        .collect();
    let table = serde_json::json!({
        "version": "0.6",
        "status": "ok",
        "table": {
            "cols": [
                {"id": "A", "label": "Creator", "type": "string"},
                {"id": "B", "label": "Category", "type": "string"},
                {"id": "C", "label": "Photo", "type": "string"},
                {"id": "D", "label": "Price", "type": "number"}
            ],
            "rows": rows
        }
    });
    format!(
        "/*O_o*/\ngoogle.visualization.Query.setResponse({});",
        table
    )
}

async fn mock_classifier(server: &MockServer, body: serde_json::Value) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/classify");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(body);
        })
        .await
}

async fn mock_gviz<'a>(server: &'a MockServer, rows: &[(&str, &str)]) -> httpmock::Mock<'a> {
    let body = gviz_body(rows);
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(GVIZ_PATH)
                .query_param("tqx", "out:json");
            then.status(200)
                .header("Content-Type", "text/javascript")
                .body(body);
        })
        .await
}

#[tokio::test]
async fn test_gaming_site_matches_same_creator_every_time() {
    let server = MockServer::start_async().await;
    let classify_mock =
        mock_classifier(&server, serde_json::json!({"category": "gaming", "confidence": 0.9}))
            .await;
    let gviz_mock = mock_gviz(
        &server,
        &[("Ana Lee", "Games"), ("Ben Ortiz", "Games"), ("Cleo Park", "Games")],
    )
    .await;

    let orchestrator = test_config(&server).orchestrator().unwrap();

    let mut picked = Vec::new();
    for _ in 0..3 {
        let session = orchestrator.run("example.com").await;
        match session.outcome() {
            MatchOutcome::Matched(m) => {
                assert_eq!(m.category, Category::Games);
                assert_eq!(m.confidence, 0.9);
                assert!(m.fallback.is_none());
                assert_eq!(m.creator.price, Some(25.0));
                picked.push(m.creator.name.clone());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    let names = ["Ana Lee", "Ben Ortiz", "Cleo Park"];
    let expected = names[seed_hash("example.com/") as usize % names.len()];
    assert!(picked.iter().all(|name| name == expected));

    assert_eq!(classify_mock.hits_async().await, 3);
    assert_eq!(gviz_mock.hits_async().await, 3);
}

#[tokio::test]
async fn test_category_without_creators_offers_fallback() {
    let server = MockServer::start_async().await;
    mock_classifier(
        &server,
        serde_json::json!({"category": "Education", "confidence": 0.8}),
    )
    .await;
    mock_gviz(&server, &[("Ana Lee", "Games"), ("Dan Cho", "banking")]).await;

    let session = test_config(&server)
        .orchestrator()
        .unwrap()
        .run("https://learn.example.org/courses")
        .await;

    match session.outcome() {
        MatchOutcome::NoCreatorForCategory {
            category,
            confidence,
            fallback,
            ..
        } => {
            assert_eq!(*category, Category::Education);
            assert_eq!(*confidence, 0.8);
            assert!(!fallback.options.is_empty());
            assert_eq!(fallback.options, vec![Category::Games, Category::Finance]);
            assert_eq!(fallback.preselected, Category::Games);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    match session.refine("Finance").unwrap() {
        MatchOutcome::Matched(m) => {
            assert_eq!(m.creator.name, "Dan Cho");
            assert_eq!(m.confidence, 0.85);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_both_roster_transports_failing() {
    let server = MockServer::start_async().await;
    mock_classifier(&server, serde_json::json!({"category": "Games", "confidence": 0.9})).await;
    let gviz_mock = server
        .mock_async(|when, then| {
            when.method(GET).path(GVIZ_PATH);
            then.status(500);
        })
        .await;
    let csv_mock = server
        .mock_async(|when, then| {
            when.method(GET).path(CSV_PATH).query_param("format", "csv");
            then.status(503);
        })
        .await;

    let started = Instant::now();
    let session = test_config(&server)
        .orchestrator()
        .unwrap()
        .run("example.com")
        .await;

    assert!(started.elapsed() >= Duration::from_millis(50));
    gviz_mock.assert_async().await;
    csv_mock.assert_async().await;

    match session.outcome() {
        MatchOutcome::Failed(failure) => {
            assert_eq!(failure.kind, ErrorKind::RosterUnavailable);
            assert_eq!(failure.message, "Request failed: 503");
            let fallback = failure.fallback.as_ref().unwrap();
            assert_eq!(fallback.options, Category::ALL.to_vec());
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(session.refine("Games").is_err());
}

#[tokio::test]
async fn test_low_confidence_match_suggests_refine() {
    let server = MockServer::start_async().await;
    mock_classifier(&server, serde_json::json!({"category": "Games", "confidence": 0.4})).await;
    mock_gviz(&server, &[("Ana Lee", "Games"), ("Ben Ortiz", "Social")]).await;

    let session = test_config(&server)
        .orchestrator()
        .unwrap()
        .run("example.com")
        .await;

    match session.outcome() {
        MatchOutcome::Matched(m) => {
            assert_eq!(m.creator.name, "Ana Lee");
            assert_eq!(m.confidence, 0.4);
            let fallback = m.fallback.as_ref().expect("low confidence offers refine");
            assert_eq!(fallback.preselected, Category::Games);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_csv_transport_used_when_gviz_is_malformed() {
    let server = MockServer::start_async().await;
    mock_classifier(&server, serde_json::json!({"category": "Fitness"})).await;
    let gviz_mock = server
        .mock_async(|when, then| {
            when.method(GET).path(GVIZ_PATH);
            then.status(200).body("<html>Sign in to continue</html>");
        })
        .await;
    let csv_mock = server
        .mock_async(|when, then| {
            when.method(GET).path(CSV_PATH).query_param("format", "csv");
            then.status(200).body(
                "Creator,Category,Photo,Price\r\n\"Fit, Jo\",Wellness,https://img.example/jo.png,120\r\nNo Cat,,,\r\n",
            );
        })
        .await;

    let session = test_config(&server)
        .orchestrator()
        .unwrap()
        .run("gym.example.com")
        .await;

    gviz_mock.assert_async().await;
    csv_mock.assert_async().await;

    match session.outcome() {
        MatchOutcome::Matched(m) => {
            assert_eq!(m.category, Category::HealthAndFitness);
            assert_eq!(m.confidence, 0.6);
            assert!(m.fallback.is_none());
            assert_eq!(m.creator.name, "Fit, Jo");
            assert_eq!(
                m.creator.photo_url.as_deref(),
                Some("https://img.example/jo.png")
            );
            assert_eq!(m.creator.price, Some(120.0));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(session.roster().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_classifier_category_fails_match() {
    let server = MockServer::start_async().await;
    mock_classifier(&server, serde_json::json!({"category": "Automotive", "confidence": 0.9})).await;
    mock_gviz(&server, &[("Ana Lee", "Games")]).await;

    let session = test_config(&server)
        .orchestrator()
        .unwrap()
        .run("cars.example.com")
        .await;

    match session.outcome() {
        MatchOutcome::Failed(failure) => {
            assert_eq!(failure.kind, ErrorKind::ClassificationFailed);
            assert_eq!(failure.message, "Classifier returned an unknown category");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    // roster still loaded, so a manual pick works
    assert!(matches!(
        session.refine("Games").unwrap(),
        MatchOutcome::Matched(_)
    ));
}

#[tokio::test]
async fn test_config_file_drives_orchestrator() {
    let server = MockServer::start_async().await;
    mock_classifier(&server, serde_json::json!({"category": "Games", "confidence": 0.9})).await;
    let csv_mock = server
        .mock_async(|when, then| {
            when.method(GET).path(CSV_PATH);
            then.status(200).body("Creator,Category\nAna Lee,Games\n");
        })
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("match-config.toml");
    let content = format!(
        r#"
[roster]
spreadsheet_id = "{}"
base_url = "{}"
sources = ["csv"]

[classifier]
endpoint = "{}"

[matching]
min_display_ms = 20
finding_stage_ms = 5
finalizing_stage_ms = 10
"#,
        SHEET_ID,
        server.base_url(),
        server.url("/api/classify")
    );
    tokio::fs::write(&config_path, content).await.unwrap();

    let config = MatchConfig::from_file(&config_path).unwrap();
    let session = config.orchestrator().unwrap().run("example.com").await;

    csv_mock.assert_async().await;
    assert!(matches!(session.outcome(), MatchOutcome::Matched(_)));
}
