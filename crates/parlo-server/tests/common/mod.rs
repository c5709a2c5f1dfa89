//! Common test utilities for integration tests.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use parlo_core::{ParloError, TextGenerationClient};
use parlo_server::{config::Config, routes, state::AppState};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Scripted text-generation client.
///
/// Dispatches on the kind of system prompt it receives. An unset `query`
/// echoes the user prompt back, so batch tests can check that results
/// stay paired with their originating expression.
#[derive(Default)]
pub struct FakeTextGen {
    pub fail: bool,
    pub query: Option<String>,
    pub dialogue: Option<String>,
    pub grade: Option<String>,
}

#[async_trait]
impl TextGenerationClient for FakeTextGen {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        _temperature: f32,
    ) -> parlo_core::Result<String> {
        if self.fail {
            return Err(ParloError::ExternalService("scripted failure".to_string()));
        }
        if system_prompt.contains("search query") {
            Ok(self
                .query
                .clone()
                .unwrap_or_else(|| user_prompt.to_string()))
        } else if system_prompt.contains("practice dialogues") {
            Ok(self.dialogue.clone().unwrap_or_default())
        } else {
            Ok(self.grade.clone().unwrap_or_default())
        }
    }
}

/// Create a test app backed by a temp database and the given fake client.
pub fn create_test_app_with_client(client: FakeTextGen) -> (Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        db_path: temp_dir.path().join("test.db"),
        ..Config::default()
    };

    let state = Arc::new(
        AppState::with_client(config, Arc::new(client)).expect("Failed to create AppState"),
    );

    let app = Router::new()
        .nest("/api", routes::router())
        .with_state(state);

    (app, temp_dir)
}

/// Create a test app with a default (never-failing, echoing) fake client.
pub fn create_test_app() -> (Router, TempDir) {
    create_test_app_with_client(FakeTextGen::default())
}

/// Send a request with an optional JSON body; return status and parsed body.
pub async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
