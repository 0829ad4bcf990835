//! AnthropicProvider -- [`LlmProvider`] for the Anthropic Messages API.
//!
//! The API key is held as a [`SecretString`] and only exposed while building
//! request headers.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use jabrium_core::llm::provider::LlmProvider;
use jabrium_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderType, StopReason, Usage,
};

use super::types::{AnthropicErrorBody, AnthropicMessage, AnthropicRequest, AnthropicResponse};

/// Output cap used when the request carries none.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic Claude provider.
///
/// Does not derive Debug so the client state never ends up in logs.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl AnthropicProvider {
    /// The Anthropic API version header value.
    const API_VERSION: &'static str = "2023-06-01";

    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            base_url: "https://api.anthropic.com".to_string(),
            model,
        }
    }

    /// Override the base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn to_anthropic_request(&self, request: &CompletionRequest) -> AnthropicRequest {
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        AnthropicRequest {
            model,
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
            system: request.system.clone(),
        }
    }
}

impl LlmProvider for AnthropicProvider {
    fn kind(&self) -> ProviderType {
        ProviderType::Anthropic
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_anthropic_request(request);

        let response = self
            .client
            .post(self.url("/v1/messages"))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", Self::API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicErrorBody>(&error_body)
                .map(|b| b.error.message)
                .unwrap_or(error_body);
            return Err(match status.as_u16() {
                400 => LlmError::InvalidRequest(message),
                401 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited,
                529 => LlmError::Overloaded(message),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {message}"),
                },
            });
        }

        let resp: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let content = resp.first_text().unwrap_or_default().to_string();

        let stop_reason = match resp.stop_reason.as_deref() {
            Some("tool_use") => StopReason::ToolUse,
            Some("max_tokens") => StopReason::MaxTokens,
            Some("stop_sequence") => StopReason::StopSequence,
            _ => StopReason::EndTurn,
        };

        Ok(CompletionResponse {
            content,
            stop_reason,
            usage: Usage {
                input_tokens: resp.usage.input_tokens,
                output_tokens: resp.usage.output_tokens,
            },
        })
    }
}
