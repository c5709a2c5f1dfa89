//! Practice chat routes.
//!
//! These handlers delegate to the practice generator, whose external
//! failures collapse to fallbacks; they answer 200 even when the
//! text-generation service is down. A disconnected client drops the
//! handler future, which abandons the in-flight completion call.

use super::{ApiError, ApiResponse};
use crate::state::AppState;
use axum::{extract::State, Json};
use parlo_core::ParloError;
use parlo_types::{Expression, PracticeRound, PreparedRound};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct SearchQueryRequest {
    pub user_input: String,
}

#[derive(Serialize)]
pub struct SearchQueryResponse {
    pub search_query: String,
}

/// POST /api/chat/search-query - Turn learner input into a search query.
pub async fn search_query(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchQueryRequest>,
) -> Result<Json<ApiResponse<SearchQueryResponse>>, ApiError> {
    let search_query = state.practice.search_query(&req.user_input).await?;
    Ok(ApiResponse::ok(SearchQueryResponse { search_query }))
}

#[derive(Deserialize)]
pub struct PracticeRoundRequest {
    #[serde(default)]
    pub expression_id: Option<Uuid>,
    #[serde(default)]
    pub target_sentence: Option<String>,
}

/// POST /api/chat/practice-round - Generate a round for a target sentence.
pub async fn practice_round(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PracticeRoundRequest>,
) -> Result<Json<ApiResponse<PracticeRound>>, ApiError> {
    let target = resolve_target(&state, req.expression_id, req.target_sentence)?;
    let round = state.practice.practice_round(&target).await?;
    Ok(ApiResponse::ok(round))
}

#[derive(Deserialize)]
pub struct PrepareRequest {
    pub expression_ids: Vec<Uuid>,
}

/// POST /api/chat/prepare - Pre-compute search queries for a batch.
///
/// Queries run concurrently; each result carries its expression id so the
/// client pairs them explicitly rather than by arrival order.
pub async fn prepare(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PrepareRequest>,
) -> Result<Json<ApiResponse<Vec<PreparedRound>>>, ApiError> {
    if req.expression_ids.is_empty() {
        return Err(
            ParloError::InvalidArgument("expression_ids must not be empty".to_string()).into(),
        );
    }

    let mut expressions = Vec::with_capacity(req.expression_ids.len());
    for id in &req.expression_ids {
        expressions.push(
            state
                .store
                .get_expression(*id)?
                .ok_or(ParloError::ExpressionNotFound(*id))?,
        );
    }

    let prepared = state.practice.prepare_rounds(&expressions).await;
    Ok(ApiResponse::ok(prepared))
}

#[derive(Deserialize)]
pub struct EvaluateRequest {
    pub user_response: String,
    #[serde(default)]
    pub expression_id: Option<Uuid>,
    #[serde(default)]
    pub target_sentence: Option<String>,
}

#[derive(Serialize)]
pub struct EvaluateResponse {
    pub is_correct: bool,
    pub feedback: String,
    /// Updated counters, present when grading a stored expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<Expression>,
}

/// POST /api/chat/evaluate - Grade an attempt; records it when the target
/// is a stored expression.
pub async fn evaluate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<ApiResponse<EvaluateResponse>>, ApiError> {
    let target = resolve_target(&state, req.expression_id, req.target_sentence)?;
    let evaluation = state.practice.evaluate(&req.user_response, &target).await?;

    let expression = match req.expression_id {
        Some(id) => Some(state.store.record_attempt(id, evaluation.is_correct)?),
        None => None,
    };

    Ok(ApiResponse::ok(EvaluateResponse {
        is_correct: evaluation.is_correct,
        feedback: evaluation.feedback,
        expression,
    }))
}

/// Resolve the target sentence from exactly one of the two request forms.
fn resolve_target(
    state: &AppState,
    expression_id: Option<Uuid>,
    target_sentence: Option<String>,
) -> Result<String, ApiError> {
    match (expression_id, target_sentence) {
        (Some(id), None) => {
            let expression = state
                .store
                .get_expression(id)?
                .ok_or(ParloError::ExpressionNotFound(id))?;
            Ok(expression.text)
        }
        (None, Some(target)) if !target.trim().is_empty() => Ok(target),
        _ => Err(ParloError::InvalidArgument(
            "provide exactly one of expression_id or target_sentence".to_string(),
        )
        .into()),
    }
}
