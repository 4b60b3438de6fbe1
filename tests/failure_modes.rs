//! Behaviour when the store is down, plus the ambient HTTP surface.

use reqwest::StatusCode;
use serde_json::{json, Value};

use report_portal::config::PortalConfig;

mod common;

#[tokio::test]
async fn test_store_failures_map_to_generic_messages() {
    let (addr, client, _shutdown) = common::spawn_broken_app().await;
    let url = |path: &str| format!("http://{addr}{path}");

    let posts = [
        ("/api/register", json!({"username": "a", "password": "b", "role": "c"}), "Registration failed"),
        ("/api/login", json!({"username": "a", "password": "b"}), "Login failed"),
        ("/api/report", json!({"lecturer_name": "Smith"}), "Report failed"),
        ("/api/rating", json!({"score": 1}), "Rating failed"),
        ("/api/assign-course", json!({"course": "CS101"}), "Assignment failed"),
    ];
    for (path, body, message) in posts {
        let res = client.post(url(path)).json(&body).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR, "{path}");
        let json: Value = res.json().await.unwrap();
        assert_eq!(json, json!({"message": message}), "{path}");
    }

    let gets = [
        ("/api/reports", "Fetch failed"),
        ("/api/search-report?lecturer_name=mit", "Search failed"),
    ];
    for (path, message) in gets {
        let res = client.get(url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR, "{path}");
        let json: Value = res.json().await.unwrap();
        assert_eq!(json["message"], message);
    }

    let res = client.get(url("/api/download-report")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text().await.unwrap(), "Error generating Excel");
}

#[tokio::test]
async fn test_validation_precedes_store_access() {
    let (addr, client, _shutdown) = common::spawn_broken_app().await;
    let res = client
        .post(format!("http://{addr}/api/register"))
        .json(&json!({"username": "a"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_reflects_store() {
    let app = common::spawn_app().await;
    let res = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json: Value = res.json().await.unwrap();
    assert_eq!(json["status"], "ok");

    let (addr, client, _shutdown) = common::spawn_broken_app().await;
    let res = client.get(format!("http://{addr}/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = res.json().await.unwrap();
    assert_eq!(json["status"], "degraded");
}

#[tokio::test]
async fn test_request_id_is_generated_and_echoed() {
    let app = common::spawn_app().await;

    let res = app.client.get(app.url("/api/reports")).send().await.unwrap();
    let generated = res.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(generated.len(), 36);

    let res = app
        .client
        .get(app.url("/api/reports"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-me");
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let mut config = PortalConfig::default();
    config.http.max_body_size = 64;
    let app = common::spawn_app_with(config).await;

    let res = app
        .client
        .post(app.url("/api/report"))
        .json(&json!({"notes": "x".repeat(512)}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_cors_preflight_allowed() {
    let app = common::spawn_app().await;
    let res = app
        .client
        .request(reqwest::Method::OPTIONS, app.url("/api/login"))
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}
