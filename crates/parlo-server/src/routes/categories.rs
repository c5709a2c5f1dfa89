//! Category routes.

use super::{ApiError, ApiResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use parlo_core::ParloError;
use parlo_types::Category;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// GET /api/categories - List categories sorted by name.
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Category>>>, ApiError> {
    let categories = state.store.list_categories()?;
    Ok(ApiResponse::ok(categories))
}

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// POST /api/categories - Create a category.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ParloError::InvalidArgument("name must not be empty".to_string()).into());
    }

    let category = Category::new(name.to_string(), req.icon, req.color);
    state.store.insert_category(&category)?;
    info!(target: "parlo::api", "Created category {} ({})", category.id, category.name);

    Ok(ApiResponse::ok(category))
}

/// DELETE /api/categories/{id} - Delete a category.
///
/// Its expressions are reassigned to uncategorized, never deleted.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.store.delete_category(id)?;
    Ok(ApiResponse::empty())
}
