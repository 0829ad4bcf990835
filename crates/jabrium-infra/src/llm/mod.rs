//! LLM backend implementations.
//!
//! Concrete [`LlmProvider`]s for Anthropic and OpenAI, plus [`LlmBackend`],
//! the closed set the connector selects from at startup.

pub mod anthropic;
pub mod openai;

use secrecy::{ExposeSecret, SecretString};

use jabrium_core::llm::provider::LlmProvider;
use jabrium_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderType};

use self::anthropic::AnthropicProvider;
use self::openai::OpenAiProvider;

/// One of the supported backends, chosen once from configuration.
pub enum LlmBackend {
    Anthropic(AnthropicProvider),
    OpenAi(OpenAiProvider),
}

/// Build the backend for `kind`, using the provider's default model unless
/// `model` overrides it.
pub fn create_backend(kind: ProviderType, api_key: &SecretString, model: Option<&str>) -> LlmBackend {
    let model = model.unwrap_or(kind.default_model()).to_string();
    match kind {
        ProviderType::Anthropic => {
            let key = SecretString::from(api_key.expose_secret().to_string());
            LlmBackend::Anthropic(AnthropicProvider::new(key, model))
        }
        ProviderType::OpenAi => LlmBackend::OpenAi(OpenAiProvider::new(api_key, model)),
    }
}

impl LlmProvider for LlmBackend {
    fn kind(&self) -> ProviderType {
        match self {
            LlmBackend::Anthropic(p) => p.kind(),
            LlmBackend::OpenAi(p) => p.kind(),
        }
    }

    fn model(&self) -> &str {
        match self {
            LlmBackend::Anthropic(p) => p.model(),
            LlmBackend::OpenAi(p) => p.model(),
        }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        match self {
            LlmBackend::Anthropic(p) => p.complete(request).await,
            LlmBackend::OpenAi(p) => p.complete(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_models() {
        let key = SecretString::from("k");
        let anthropic = create_backend(ProviderType::Anthropic, &key, None);
        assert_eq!(anthropic.kind(), ProviderType::Anthropic);
        assert_eq!(anthropic.model(), "claude-sonnet-4-20250514");

        let openai = create_backend(ProviderType::OpenAi, &key, None);
        assert_eq!(openai.kind(), ProviderType::OpenAi);
        assert_eq!(openai.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_model_override() {
        let key = SecretString::from("k");
        let backend = create_backend(ProviderType::OpenAi, &key, Some("gpt-4o"));
        assert_eq!(backend.model(), "gpt-4o");
    }
}
