//! Core matching, practice-round generation and persistence for Parlo.

mod error;
mod llm;
mod practice;
mod similarity;
mod store;

pub use error::ParloError;
pub use llm::{ChatApiClient, ChatApiConfig, TextGenerationClient};
pub use practice::{PracticeConfig, PracticeGenerator, CORRECT_SENTINEL, FINAL_PROMPT};
pub use similarity::{rank, similarity, top_k};
pub use store::{ExpressionStore, StoreCounts};

/// Result type for Parlo operations.
pub type Result<T> = std::result::Result<T, ParloError>;
