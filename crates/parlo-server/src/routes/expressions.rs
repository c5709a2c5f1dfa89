//! Expression routes.

use super::{ApiError, ApiResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use parlo_core::{top_k, ParloError};
use parlo_types::{Expression, SearchResult};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

/// GET /api/expressions - List expressions, newest first.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Expression>>>, ApiError> {
    let expressions = state.store.list_expressions(query.category_id)?;
    Ok(ApiResponse::ok(expressions))
}

#[derive(Deserialize)]
pub struct CreateExpressionRequest {
    pub text: String,
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

/// POST /api/expressions - Save a new expression.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateExpressionRequest>,
) -> Result<Json<ApiResponse<Expression>>, ApiError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(ParloError::InvalidArgument("text must not be empty".to_string()).into());
    }
    if let Some(category_id) = req.category_id {
        state
            .store
            .get_category(category_id)?
            .ok_or(ParloError::CategoryNotFound(category_id))?;
    }

    let expression = Expression::new(text.to_string(), req.category_id);
    state.store.insert_expression(&expression)?;
    info!(target: "parlo::api", "Saved expression {}", expression.id);

    Ok(ApiResponse::ok(expression))
}

/// GET /api/expressions/{id} - Get a single expression.
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Expression>>, ApiError> {
    let expression = state
        .store
        .get_expression(id)?
        .ok_or(ParloError::ExpressionNotFound(id))?;
    Ok(ApiResponse::ok(expression))
}

/// DELETE /api/expressions/{id} - Delete an expression.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.store.delete_expression(id)?;
    Ok(ApiResponse::empty())
}

#[derive(Deserialize)]
pub struct AttemptRequest {
    pub correct: bool,
}

/// POST /api/expressions/{id}/attempt - Record one practice attempt.
pub async fn attempt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<AttemptRequest>,
) -> Result<Json<ApiResponse<Expression>>, ApiError> {
    let expression = state.store.record_attempt(id, req.correct)?;
    Ok(ApiResponse::ok(expression))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

fn default_limit() -> usize {
    5
}

/// GET /api/expressions/search - Rank stored expressions against a query.
///
/// Purely local token-overlap scoring; no external calls.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<SearchResult>>>, ApiError> {
    if query.q.trim().is_empty() {
        return Err(ParloError::InvalidArgument("q must not be empty".to_string()).into());
    }

    let expressions = state.store.list_expressions(query.category_id)?;
    let texts: Vec<&str> = expressions.iter().map(|e| e.text.as_str()).collect();
    let results = top_k(&query.q, &texts, query.limit);

    Ok(ApiResponse::ok(results))
}
