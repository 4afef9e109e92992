//! Text-completion collaborator.
//!
//! The pipeline only knows the [`CompletionService`] trait: a structured
//! prompt and a response schema go in, parsed JSON comes out.
//! [`ChatCompletionClient`] implements it for OpenAI-compatible chat APIs.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::provider::{Provider, ProviderError};

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid API response: {reason}")]
    InvalidResponse { reason: String },
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    /// JSON Schema describing the expected reply.
    pub response_schema: Value,
    pub temperature: f32,
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Short label for logs and cache keys.
    fn name(&self) -> String;

    async fn complete(&self, request: &CompletionRequest) -> Result<Value, CompletionError>;
}

pub struct ChatCompletionClient {
    http: reqwest::Client,
    provider: Provider,
    api_key: String,
    model: String,
}

impl ChatCompletionClient {
    /// Fails early when the provider's API key is not configured.
    pub fn new(provider: Provider, model: Option<String>) -> Result<Self, CompletionError> {
        let api_key = provider.validate_api_key()?;
        let model = model.unwrap_or_else(|| provider.config().model.to_string());

        Ok(Self {
            http: reqwest::Client::new(),
            provider,
            api_key,
            model,
        })
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionService for ChatCompletionClient {
    fn name(&self) -> String {
        format!("{}/{}", self.provider.id(), self.model)
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Value, CompletionError> {
        let config = self.provider.config();
        let system_prompt = format!(
            "{}\n\nThe reply MUST be valid JSON matching this JSON Schema:\n{}",
            request.system,
            serde_json::to_string_pretty(&request.response_schema)
                .unwrap_or_else(|_| request.response_schema.to_string())
        );

        let response = self
            .http
            .post(config.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "system",
                        "content": system_prompt,
                    },
                    {
                        "role": "user",
                        "content": request.user,
                    },
                ],
                "temperature": request.temperature,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status, body });
        }

        let response = response.json::<Value>().await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| CompletionError::InvalidResponse {
                reason: format!("missing message content in {}", response),
            })?;
        debug!(provider = self.provider.id(), "raw completion: {}", content);

        parse_json_content(content)
    }
}

/// Parse a model reply as JSON, tolerating a surrounding Markdown code fence.
pub fn parse_json_content(content: &str) -> Result<Value, CompletionError> {
    let json_text = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    serde_json::from_str(json_text).map_err(|e| CompletionError::InvalidResponse {
        reason: format!("reply is not JSON: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_code_fences() {
        let value = parse_json_content("```json\n[{\"a\": 1}]\n```").unwrap();
        assert_eq!(value, serde_json::json!([{"a": 1}]));

        let value = parse_json_content("  {\"beats\": []}  ").unwrap();
        assert_eq!(value, serde_json::json!({"beats": []}));
    }

    #[test]
    fn prose_is_invalid() {
        let err = parse_json_content("Sure! Here are your scenes.").unwrap_err();
        assert!(matches!(err, CompletionError::InvalidResponse { .. }));
    }
}
