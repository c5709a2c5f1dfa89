//! Text-generation client.
//!
//! The external service is reached through the [`TextGenerationClient`]
//! trait so tests can substitute a fake. The production implementation
//! speaks an OpenAI-compatible chat-completions API.

use crate::{ParloError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A client for an external text-generation service.
///
/// One call per prompt-requiring operation: a system/user message pair and
/// a temperature, returning the raw completion text.
#[async_trait]
pub trait TextGenerationClient: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String>;
}

/// Configuration for [`ChatApiClient`].
#[derive(Debug, Clone)]
pub struct ChatApiConfig {
    /// Base URL of the chat-completions API.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Bearer token, if the service requires one.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for ChatApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// OpenAI-compatible chat-completions client.
pub struct ChatApiClient {
    config: ChatApiConfig,
    client: reqwest::Client,
}

impl ChatApiClient {
    pub fn new(config: ChatApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ParloError::ExternalService(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint_url(base_url: &str) -> String {
        format!("{}/v1/chat/completions", base_url.trim_end_matches('/'))
    }

    async fn send(
        &self,
        request: &ChatRequest<'_>,
    ) -> std::result::Result<reqwest::Response, reqwest::Error> {
        let url = Self::endpoint_url(&self.config.base_url);
        let mut builder = self.client.post(&url).json(request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }
        builder.send().await
    }
}

#[async_trait]
impl TextGenerationClient for ChatApiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature,
            stream: false,
        };

        // One retry on transport failure. HTTP error statuses are not
        // retried; the service already received the request once.
        let response = match self.send(&request).await {
            Ok(response) => response,
            Err(first) => {
                tracing::warn!(target: "parlo::llm", "Completion request failed, retrying once: {}", first);
                self.send(&request).await.map_err(|e| {
                    ParloError::ExternalService(format!("request failed after retry: {}", e))
                })?
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ParloError::ExternalService(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ParloError::ExternalService(format!("invalid response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ParloError::ExternalService("response contained no choices".to_string()))
    }
}
