//! Integration tests for status updates and the public read endpoints.

mod common;

use axum::http::StatusCode;
use chrono::{Local, Timelike};
use common::{assert_envelope, TestDevice, TestEnv};
use serde_json::json;
use shared::time::parse_timestamp;

// ============================================================================
// Set status
// ============================================================================

#[tokio::test]
async fn test_set_status_then_read() {
    let env = TestEnv::with_secret().await;
    let started = Local::now().naive_local().with_nanosecond(0).unwrap();

    let (status, body) = env.get_authed("/api/set?status=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "code": "OK", "set_to": 3 }));

    let (status, overview) = env.get("/api/query/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["status"], 3);

    let stamped = parse_timestamp(overview["last_updated"].as_str().unwrap())
        .expect("last_updated should use the local timestamp format");
    assert!(stamped >= started, "{stamped} < {started}");
}

#[tokio::test]
async fn test_set_status_accepts_negative_and_large_codes() {
    let env = TestEnv::with_secret().await;
    for code in ["-1", "0", "9223372036854775807"] {
        let (status, body) = env.get_authed(&format!("/api/set?status={code}")).await;
        assert_eq!(status, StatusCode::OK, "{code}");
        assert_eq!(body["set_to"].to_string(), code);
    }
}

#[tokio::test]
async fn test_set_status_not_a_number() {
    let env = TestEnv::with_secret().await;
    let before = env.read_status_document();

    for raw in ["abc", "12abc", "1.5", "9223372036854775808"] {
        let (status, body) = env.get_authed(&format!("/api/set?status={raw}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{raw}");
        assert_envelope(&body, 400, "Argument 'status' must be a number");
    }
    assert_eq!(env.read_status_document(), before);
}

#[tokio::test]
async fn test_set_status_missing() {
    let env = TestEnv::with_secret().await;
    for uri in ["/api/set", "/api/set?status="] {
        let (status, body) = env.get_authed(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_envelope(&body, 400, "Missing required parameter 'status'");
        assert_eq!(body["details"], "Bad Request");
    }
}

#[tokio::test]
async fn test_set_status_repeated_key_is_envelope() {
    let env = TestEnv::with_secret().await;
    let before = env.read_status_document();

    let (status, body) = env.get_authed("/api/set?status=1&status=2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 400);
    assert_eq!(body["details"], "Bad Request");
    assert!(
        body["message"].as_str().unwrap().contains("duplicate field `status`"),
        "{body}"
    );
    assert_eq!(env.read_status_document(), before);
}

#[tokio::test]
async fn test_unsupported_method_is_405_envelope() {
    let env = TestEnv::with_secret().await;
    for uri in ["/api/set?status=1", "/api/device/list", "/api/query/status"] {
        let request = axum::http::Request::builder()
            .method(axum::http::Method::PUT)
            .uri(uri)
            .header("sleepy-secret", common::TEST_SECRET)
            .body(axum::body::Body::empty())
            .unwrap();
        let (status, body) = env.send(request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{uri}");
        assert_eq!(body["success"], false, "{uri}");
        assert_eq!(body["code"], 405, "{uri}");
        assert_eq!(body["details"], "Method Not Allowed", "{uri}");
    }
}

#[tokio::test]
async fn test_set_status_keeps_extra_fields() {
    let env = TestEnv::with_secret().await;
    std::fs::write(
        env.paths.status_path(),
        r#"{ "status": 0, "last_updated": "2024-01-01 00:00:00", "note": "custom" }"#,
    )
    .unwrap();

    let (status, _) = env.get_authed("/api/set?status=1").await;
    assert_eq!(status, StatusCode::OK);

    let stored = env.read_status_document();
    assert_eq!(stored["status"], 1);
    assert_eq!(stored["note"], "custom");
    assert_ne!(stored["last_updated"], "2024-01-01 00:00:00");
}

#[tokio::test]
async fn test_set_status_missing_document() {
    let env = TestEnv::with_secret().await;
    std::fs::remove_file(env.paths.status_path()).unwrap();

    let (status, body) = env.get_authed("/api/set?status=1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_envelope(&body, 500, "Failed to read data file");
}

// ============================================================================
// Queries
// ============================================================================

#[tokio::test]
async fn test_status_overview_includes_devices() {
    let env = TestEnv::with_secret().await;
    let id = env.add_device(&TestDevice::new()).await;

    let (status, body) = env.get("/api/query/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], 0);
    assert!(body["last_updated"].is_string());
    assert_eq!(body["device_status"][0]["id"], id.as_str());
}

#[tokio::test]
async fn test_status_overview_ignores_stored_reserved_keys() {
    let env = TestEnv::with_secret().await;
    std::fs::write(
        env.paths.status_path(),
        r#"{ "status": 4, "last_updated": "2024-01-01 00:00:00", "success": false, "device_status": 7, "note": "hi" }"#,
    )
    .unwrap();

    let response = tower::ServiceExt::oneshot(env.app.clone(), common::get_request("/api/query/status"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(text.matches("\"success\"").count(), 1, "{text}");
    assert_eq!(text.matches("\"device_status\"").count(), 1, "{text}");

    let body: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["device_status"], json!([]));
    assert_eq!(body["note"], "hi");
    assert_eq!(body["status"], 4);
}

#[tokio::test]
async fn test_status_alias_matches() {
    let env = TestEnv::with_secret().await;
    let (_, primary) = env.get("/api/query/status").await;
    let (status, alias) = env.get("/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(primary, alias);
}

#[tokio::test]
async fn test_status_overview_storage_error() {
    let env = TestEnv::with_secret().await;
    std::fs::write(env.paths.status_path(), "not json").unwrap();

    let (status, body) = env.get("/api/query/status").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 500);
}

#[tokio::test]
async fn test_status_list_passthrough() {
    let env = TestEnv::with_secret().await;

    let (status, body) = env.get("/api/query/status/list").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["statusList"][0]["id"], 0);
    assert_eq!(body["statusList"][1]["id"], 1);

    let custom = json!({ "anything": ["goes", 1, null] });
    std::fs::write(env.paths.status_list_path(), custom.to_string()).unwrap();
    let (_, body) = env.get("/api/query/status/list").await;
    assert_eq!(body["statusList"], custom);
}

// ============================================================================
// Meta, errors, health
// ============================================================================

#[tokio::test]
async fn test_root_banner() {
    let env = TestEnv::with_secret().await;
    let (status, body) = env.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_site_meta() {
    let env = TestEnv::with_secret().await;
    let (status, body) = env.get("/api/meta").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["page"]["name"], "Sleepy");
    assert_eq!(body["page"]["desc"], "Test deployment");
    assert_eq!(body["version"].as_array().unwrap().len(), 3);
    assert_eq!(body["metrics"], true);
}

#[tokio::test]
async fn test_errors_preview_known_code() {
    let env = TestEnv::with_secret().await;
    let (status, body) = env.get("/errors?code=403").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body,
        json!({
            "success": false,
            "code": 403,
            "details": "Forbidden",
            "message": "Forbidden"
        })
    );
}

#[tokio::test]
async fn test_errors_preview_unknown_code() {
    let env = TestEnv::with_secret().await;
    for uri in ["/errors?code=299", "/errors?code=abc", "/errors"] {
        let (status, body) = env.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_envelope(&body, 400, "Unknown error code");
    }
}

#[tokio::test]
async fn test_unmatched_route_is_404_envelope() {
    let env = TestEnv::with_secret().await;
    let (status, body) = env.get("/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 404);
    assert_eq!(body["details"], "Not Found");
}

#[tokio::test]
async fn test_health_probes() {
    let env = TestEnv::with_secret().await;
    let (status, body) = env.get("/api/health/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");

    let (status, body) = env.get("/api/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");

    std::fs::remove_file(env.paths.devices_path()).unwrap();
    let (status, body) = env.get("/api/health/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["devices_document"], false);
    assert_eq!(body["status_document"], true);
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let env = TestEnv::with_secret().await;
    let request = axum::http::Request::builder()
        .uri("/api/health/live")
        .header("x-request-id", "req-42")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(env.app.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}
