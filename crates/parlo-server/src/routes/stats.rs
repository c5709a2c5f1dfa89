//! Progress statistics route.

use super::{ApiError, ApiResponse};
use crate::state::AppState;
use axum::{extract::State, Json};
use parlo_types::StatsSummary;
use std::sync::Arc;

/// GET /api/stats - Aggregate counters, accuracy and badges.
pub async fn summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<StatsSummary>>, ApiError> {
    let counts = state.store.counts()?;
    Ok(ApiResponse::ok(StatsSummary::from_counts(
        counts.expressions,
        counts.categories,
        counts.total_attempts,
        counts.correct_attempts,
    )))
}
