//! Integration tests for configuration loading and harness assembly
//!
//! Tests the end-to-end path from a config file to a running harness.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tether_core::policies::AlwaysRetry;
use tether_domain::{NotifierPlatform, TetherError};
use tether_infra::{build_harness, config};
use tempfile::NamedTempFile;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Write `contents` to a temp file with the given extension.
fn write_config(contents: &str, extension: &str) -> PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let path = write_config(
        r#"{
            "retry": { "max_attempts": 4, "initial_delay_ms": 200, "backoff_multiplier": 3.0 },
            "rate_limit": { "max_calls": 30, "period_ms": 60000 },
            "notifier": {
                "platform": "teams",
                "webhook_url": "https://example.webhook.office.com/webhookb2/abc",
                "timeout_ms": 5000
            }
        }"#,
        "json",
    );

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(path).ok();

    let config = result.expect("Failed to load config from JSON file");
    assert_eq!(config.retry.max_attempts, 4);
    assert_eq!(config.retry.initial_delay, Duration::from_millis(200));
    assert_eq!(config.retry.backoff_multiplier, 3.0);

    let rate_limit = config.rate_limit.expect("rate limit section");
    assert_eq!(rate_limit.max_calls, 30);
    assert_eq!(rate_limit.period, Duration::from_secs(60));

    let notifier = config.notifier.expect("notifier section");
    assert_eq!(notifier.platform, NotifierPlatform::Teams);
    assert_eq!(notifier.timeout, Some(Duration::from_secs(5)));
}

#[test]
fn test_load_config_with_minimal_fields() {
    let path = write_config("[retry]\nmax_attempts = 1\n", "toml");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(path).ok();

    let config = result.expect("Failed to load config with minimal fields");
    assert_eq!(config.retry.max_attempts, 1);
    assert!(config.rate_limit.is_none());
    assert!(config.notifier.is_none());
}

#[test]
fn test_load_config_from_nonexistent_file() {
    let result = config::load_from_file(Some("/nonexistent/path/config.json".into()));

    match result {
        Err(TetherError::Config(msg)) => {
            assert!(msg.contains("not found"), "Error message should mention 'not found'");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_invalid_values_fail_at_assembly() {
    let path = write_config("[retry]\nbackoff_multiplier = 0.5\n", "toml");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(path).ok();

    // values parse fine; range checks happen when the harness is built
    let config = result.expect("config parses");
    let err = build_harness(&config, AlwaysRetry).expect_err("multiplier below 1.0");
    assert!(matches!(err, TetherError::Config(ref msg) if msg.contains("backoff_multiplier")));
}

/// Config file to running harness against a mock Teams webhook.
///
/// Assertions:
/// - The operation is retried until it succeeds.
/// - Exactly one Adaptive Card is posted, carrying the success text.
#[tokio::test]
async fn test_configured_harness_runs_and_notifies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhookb2/abc"))
        .and(body_partial_json(serde_json::json!({ "type": "message" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let path = write_config(
        &format!(
            r#"
[retry]
max_attempts = 3
initial_delay_ms = 10

[rate_limit]
max_calls = 5
period_ms = 1000

[notifier]
platform = "teams"
webhook_url = "{}/webhookb2/abc"
"#,
            server.uri()
        ),
        "toml",
    );
    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(path).ok();

    let harness = build_harness(&result.expect("config loads"), AlwaysRetry).expect("harness");
    let calls = AtomicU32::new(0);

    let outcome: Result<&str, String> = harness
        .run("import_invoices", || async {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err("upstream timeout".to_string())
            } else {
                Ok("imported")
            }
        })
        .await;

    assert_eq!(outcome, Ok("imported"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let requests = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = requests[0].body_json().expect("json body");
    let text = body["attachments"][0]["content"]["body"][0]["text"].as_str().expect("card text");
    assert!(text.starts_with("✅ Execution completed successfully\nFunction: import_invoices\n"));
}
