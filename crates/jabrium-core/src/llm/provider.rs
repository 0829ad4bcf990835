//! LlmProvider trait definition.
//!
//! The abstraction every text-generation backend implements. Uses RPITIT for
//! `complete`; backends are selected through a closed enum in jabrium-infra,
//! so the trait never needs to be object-safe.

use jabrium_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderType};

/// Trait for LLM provider backends (Anthropic, OpenAI).
///
/// Implementations live in jabrium-infra.
pub trait LlmProvider: Send + Sync {
    /// Which backend this is. Drives the prompt shape.
    fn kind(&self) -> ProviderType;

    /// Model identifier requests are sent with.
    fn model(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
