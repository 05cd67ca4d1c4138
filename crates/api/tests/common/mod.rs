//! Common test utilities for integration tests.
//!
//! Each test gets its own application over JSON documents in a fresh
//! temporary directory, seeded exactly as a first deployment would be.

// Allow dead code in this module - not every integration test uses every helper.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use fake::{faker::lorem::en::Word, Fake};
use persistence::{DocumentPaths, Documents};
use serde_json::Value;
use sleepy_api::{app::create_app, config::Config};
use tempfile::TempDir;
use tower::ServiceExt;

/// Secret configured for test applications.
pub const TEST_SECRET: &str = "test-secret-0b7f";

/// Test configuration with a shared secret.
pub fn test_config() -> Config {
    Config::load_for_test(&[("auth.secret", TEST_SECRET)]).expect("Failed to load test config")
}

/// Test configuration without a shared secret.
pub fn unconfigured_secret_config() -> Config {
    Config::load_for_test(&[]).expect("Failed to load test config")
}

/// A running application plus the directory holding its documents.
pub struct TestEnv {
    pub app: Router,
    pub paths: DocumentPaths,
    _dir: TempDir,
}

impl TestEnv {
    /// Application over freshly seeded JSON documents.
    pub async fn new(config: Config) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut config = config;
        config.storage.data_dir = dir.path().join("_data");

        let paths = config.storage.document_paths();
        let documents = Documents::json_files(&paths);
        documents
            .seed_missing()
            .await
            .expect("Failed to seed documents");

        Self {
            app: create_app(config, documents),
            paths,
            _dir: dir,
        }
    }

    pub async fn with_secret() -> Self {
        Self::new(test_config()).await
    }

    /// Sends a request and returns status and parsed JSON body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, parse_response_body(response).await)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(get_request(uri)).await
    }

    /// GET with the test secret in the `sleepy-secret` header.
    pub async fn get_authed(&self, uri: &str) -> (StatusCode, Value) {
        self.send(get_request_with_secret(uri, TEST_SECRET)).await
    }

    /// Adds a device through the API and returns its ID.
    pub async fn add_device(&self, device: &TestDevice) -> String {
        let (status, body) = self.get_authed(&device.add_uri()).await;
        assert_eq!(status, StatusCode::OK, "add failed: {body}");
        body["device_id"].as_str().unwrap().to_string()
    }

    pub fn read_status_document(&self) -> Value {
        read_json(&self.paths.status_path())
    }

    pub fn read_devices_document(&self) -> Value {
        read_json(&self.paths.devices_path())
    }

    pub fn write_devices_document(&self, value: &Value) {
        std::fs::write(
            self.paths.devices_path(),
            serde_json::to_string_pretty(value).unwrap(),
        )
        .unwrap();
    }
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

/// Test device data.
#[derive(Debug, Clone)]
pub struct TestDevice {
    pub show_name: String,
    pub using: &'static str,
    pub app_name: String,
}

impl TestDevice {
    pub fn new() -> Self {
        let word: String = Word().fake();
        Self {
            show_name: format!("{word}-laptop"),
            using: "true",
            app_name: "Chrome".to_string(),
        }
    }

    pub fn with_using(mut self, using: &'static str) -> Self {
        self.using = using;
        self
    }

    pub fn add_uri(&self) -> String {
        format!(
            "/api/device/add?show_name={}&using={}&app_name={}",
            self.show_name, self.using, self.app_name
        )
    }
}

impl Default for TestDevice {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a GET request.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Build a GET request carrying the secret in the `sleepy-secret` header.
pub fn get_request_with_secret(uri: &str, secret: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("sleepy-secret", secret)
        .body(Body::empty())
        .unwrap()
}

/// Build a GET request with a bearer token.
pub fn get_request_with_bearer(uri: &str, secret: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", secret))
        .body(Body::empty())
        .unwrap()
}

/// Build a POST request with a JSON body.
pub fn json_post_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

/// Asserts the standard error envelope.
pub fn assert_envelope(body: &Value, code: u16, message: &str) {
    assert_eq!(body["success"], false, "body: {body}");
    assert_eq!(body["code"], code, "body: {body}");
    assert_eq!(body["message"], message, "body: {body}");
    assert!(body["details"].is_string(), "body: {body}");
}
