//! Shared application state.

use crate::config::Config;
use parlo_core::{
    ChatApiClient, ChatApiConfig, ExpressionStore, PracticeConfig, PracticeGenerator,
    TextGenerationClient,
};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub store: Arc<ExpressionStore>,
    pub practice: Arc<PracticeGenerator>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> parlo_core::Result<Self> {
        let api_key = std::env::var(&config.llm_api_key_env).ok();
        let client = Arc::new(ChatApiClient::new(ChatApiConfig {
            base_url: config.llm_base_url.clone(),
            model: config.llm_model.clone(),
            api_key,
            timeout_secs: config.llm_timeout_secs,
        })?);
        Self::with_client(config, client)
    }

    /// Build state with an explicit text-generation client.
    ///
    /// Integration tests inject a fake here.
    pub fn with_client(
        config: Config,
        client: Arc<dyn TextGenerationClient>,
    ) -> parlo_core::Result<Self> {
        let store = Arc::new(ExpressionStore::open(&config.db_path)?);
        let practice = Arc::new(PracticeGenerator::new(
            client,
            PracticeConfig {
                dialogue_temperature: config.dialogue_temperature,
                grading_temperature: config.grading_temperature,
            },
        ));

        Ok(Self {
            store,
            practice,
            config,
        })
    }
}
