//! Error types for Parlo.

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ParloError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Expression not found: {0}")]
    ExpressionNotFound(Uuid),

    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// The external text-generation call failed or returned unparseable
    /// content. Recovered with a documented fallback at the component
    /// boundary; callers of the public practice API never see it.
    #[error("Text generation failed: {0}")]
    ExternalService(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
