//! HTTP route handlers.

pub mod categories;
pub mod chat;
pub mod expressions;
pub mod stats;

use crate::state::AppState;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use parlo_core::ParloError;
use serde::Serialize;
use std::sync::Arc;

/// JSON envelope wrapping every API response.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

impl ApiResponse<()> {
    /// Success with no payload, for deletes.
    pub fn empty() -> Json<Self> {
        Json(Self {
            success: true,
            data: None,
            error: None,
        })
    }
}

/// Error half of the envelope, carrying its status code.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<ParloError> for ApiError {
    fn from(err: ParloError) -> Self {
        let status = match &err {
            ParloError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ParloError::ExpressionNotFound(_) | ParloError::CategoryNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(self.message),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Build the `/api` route tree.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/expressions",
            get(expressions::list).post(expressions::create),
        )
        .route("/expressions/search", get(expressions::search))
        .route(
            "/expressions/{id}",
            get(expressions::get).delete(expressions::remove),
        )
        .route("/expressions/{id}/attempt", post(expressions::attempt))
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route("/categories/{id}", delete(categories::remove))
        .route("/chat/search-query", post(chat::search_query))
        .route("/chat/practice-round", post(chat::practice_round))
        .route("/chat/prepare", post(chat::prepare))
        .route("/chat/evaluate", post(chat::evaluate))
        .route("/stats", get(stats::summary))
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
