// URL scan endpoint integration tests
// Drives the full router with a scripted browser driver

mod common;

use axum::http::StatusCode;
use common::{test_config, DriverBehavior, FakeDriver, TestApp};
use serde_json::{json, Value};

#[tokio::test]
async fn test_scan_url_returns_merged_verdict() {
    let app = TestApp::new();

    let response = app
        .post("/v1/scan/url")
        .json(&json!({ "url": "https://example.com" }))
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await;
    assert_eq!(body["url"], "https://example.com");
    assert_eq!(body["title"], "Example Domain");
    assert_eq!(body["score"], 99);
    assert_eq!(body["status"], "LIKELY SAFE");
    assert_eq!(body["flags"], json!([]));
    assert_eq!(body["heatmap"], false);
    assert_eq!(body["is_ai"], false);
    assert!(body["screenshot"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,iVBORw0KGgo"));
}

#[tokio::test]
async fn test_legacy_scrape_route_matches_v1() {
    let app = TestApp::new();

    let legacy: Value = app
        .post("/api/scrape")
        .json(&json!({ "url": "http://free-casino-bonus.xyz" }))
        .send()
        .await
        .json()
        .await;

    assert_eq!(legacy["score"], 10);
    assert_eq!(legacy["status"], "HIGH RISK");
    assert_eq!(
        legacy["flags"],
        json!(["Insecure Protocol (HTTP)", "High-Risk TLD Detected"])
    );
    assert_eq!(legacy["heatmap"], true);
    assert_eq!(legacy["is_ai"], true);
}

#[tokio::test]
async fn test_trusted_and_blacklisted_overrides() {
    let app = TestApp::new();

    let trusted: Value = app
        .post("/v1/scan/url")
        .json(&json!({ "url": "https://github.com/anything" }))
        .send()
        .await
        .json()
        .await;
    assert_eq!(trusted["score"], 95);
    assert_eq!(trusted["status"], "VERIFIED");
    assert_eq!(trusted["flags"], json!(["Trusted Domain"]));

    let blacklisted: Value = app
        .post("/v1/scan/url")
        .json(&json!({ "url": "https://totally-leaked-content.com" }))
        .send()
        .await
        .json()
        .await;
    assert_eq!(blacklisted["score"], 10);
    assert_eq!(blacklisted["status"], "DANGEROUS");
    assert_eq!(
        blacklisted["flags"],
        json!(["Suspicious Keywords", "High Risk Content"])
    );
}

#[tokio::test]
async fn test_missing_url_is_rejected() {
    let app = TestApp::new();

    for body in [json!({}), json!({ "url": null }), json!({ "url": "" })] {
        let response = app.post("/v1/scan/url").json(&body).send().await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);

        let error: Value = response.json().await;
        assert_eq!(error["error"], "URL is required");
        assert_eq!(error["code"], "MISSING_PAYLOAD");
    }

    assert_eq!(app.driver.calls(), 0);
}

#[tokio::test]
async fn test_non_string_url_flows_to_invalid_verdict() {
    let app = TestApp::new();

    for (url, echoed) in [
        (json!(123), "123"),
        (json!(true), "true"),
        (json!({ "href": "x" }), r#"{"href":"x"}"#),
    ] {
        let response = app.post("/api/scrape").json(&json!({ "url": url })).send().await;
        assert_eq!(response.status(), StatusCode::OK, "{}", url);

        let body: Value = response.json().await;
        assert_eq!(body["url"], echoed);
        assert_eq!(body["score"], 0);
        assert_eq!(body["status"], "INVALID");
        assert_eq!(body["flags"], json!(["Invalid URL Format"]));
    }

    for url in [json!(false), json!(0)] {
        let response = app.post("/api/scrape").json(&json!({ "url": url })).send().await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", url);
    }

    assert_eq!(app.driver.calls(), 0);
}

#[tokio::test]
async fn test_unparseable_body_is_rejected() {
    let app = TestApp::new();

    let response = app
        .post("/v1/scan/url")
        .raw("application/json", "{not json")
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = response.json().await;
    assert_eq!(error["code"], "MALFORMED_BODY");
}

#[tokio::test]
async fn test_malformed_url_flows_to_invalid_verdict() {
    let app = TestApp::new();

    let response = app
        .post("/v1/scan/url")
        .json(&json!({ "url": "not a url at all" }))
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await;
    assert_eq!(body["score"], 0);
    assert_eq!(body["status"], "INVALID");
    assert_eq!(body["flags"], json!(["Invalid URL Format"]));
    assert_eq!(body["title"], "Analyzed: not a url at all");
    assert_eq!(
        body["screenshot"],
        "https://placehold.co/800x600/1a1a1a/white?text=Preview+Unavailable"
    );
    // Invalid URLs never launch a browser
    assert_eq!(app.driver.calls(), 0);
}

#[tokio::test]
async fn test_demo_marker_uses_fixed_placeholder() {
    let app = TestApp::with_driver(FakeDriver::new(DriverBehavior::Fail));

    let body: Value = app
        .post("/v1/scan/url")
        .json(&json!({ "url": "http://insecure-site.com/login" }))
        .send()
        .await
        .json()
        .await;

    assert_eq!(body["title"], "Insecure Site (Demo)");
    assert_eq!(
        body["screenshot"],
        "https://placehold.co/800x600/333333/white?text=Insecure+Site+Preview"
    );
    assert_eq!(body["status"], "SUSPICIOUS");
    assert_eq!(app.driver.calls(), 0);
}

#[tokio::test]
async fn test_capture_timeout_still_returns_verdict() {
    let app = TestApp::with_driver(FakeDriver::new(DriverBehavior::Hang));

    let response = app
        .post("/v1/scan/url")
        .json(&json!({ "url": "https://slow.example.com" }))
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await;
    assert_ne!(body["status"], "ERROR");
    assert_eq!(body["title"], "Analyzed: https://slow.example.com");
    assert!(!body["screenshot"].as_str().unwrap().is_empty());
    assert_eq!(app.driver.calls(), 1);
}

#[tokio::test]
async fn test_empty_page_title_becomes_unknown_site() {
    let app = TestApp::with_driver(FakeDriver::succeeding(""));

    let body: Value = app
        .post("/v1/scan/url")
        .json(&json!({ "url": "https://example.com" }))
        .send()
        .await
        .json()
        .await;

    assert_eq!(body["title"], "Unknown Site");
}

#[tokio::test]
async fn test_capture_panic_yields_degraded_200() {
    let app = TestApp::with_driver(FakeDriver::new(DriverBehavior::Panic));

    let response = app
        .post("/v1/scan/url")
        .as_user("user-7")
        .json(&json!({ "url": "https://example.com" }))
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await;
    assert_eq!(body["score"], 0);
    assert_eq!(body["status"], "ERROR");
    assert_eq!(body["flags"], json!(["System Error"]));
    assert_eq!(body["title"], "Scan Error (Fallback)");
    assert_eq!(body["screenshot"], "https://placehold.co/800x600/red/white?text=Error");
    assert_eq!(body["is_ai"], true);

    // Degraded scans are not recorded
    assert!(app.records.records().is_empty());
}

#[tokio::test]
async fn test_identity_controls_record_emission() {
    let app = TestApp::new();

    app.post("/v1/scan/url")
        .json(&json!({ "url": "https://example.com" }))
        .send()
        .await;
    assert!(app.records.records().is_empty());

    app.post("/v1/scan/url")
        .as_user("user-42")
        .json(&json!({ "url": "http://store12.com" }))
        .send()
        .await;

    let records = app.records.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_id, "user-42");
    assert_eq!(records[0].target, "http://store12.com");
    assert_eq!(records[0].score, 40);
    assert_eq!(records[0].status, "HIGH RISK");
    assert_eq!(
        records[0].flags,
        vec![
            "Insecure Protocol (HTTP)".to_string(),
            "Newly Registered Domain (<30 Days)".to_string()
        ]
    );
}

#[tokio::test]
async fn test_live_capture_can_be_disabled() {
    let mut config = test_config();
    config.features.enable_live_capture = false;
    let app = TestApp::build(config, FakeDriver::succeeding("Example Domain"), None);

    let body: Value = app
        .post("/v1/scan/url")
        .json(&json!({ "url": "https://example.com" }))
        .send()
        .await
        .json()
        .await;

    assert_eq!(body["score"], 99);
    assert_eq!(body["title"], "Analyzed: https://example.com");
    assert_eq!(app.driver.calls(), 0);
}
