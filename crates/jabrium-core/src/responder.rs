//! Reply generation.
//!
//! The [`Responder`] is chosen once at startup from the LLM settings and then
//! maps every inbound jab to reply text. It never fails: backend errors and
//! empty completions become [`FALLBACK_REPLY`], an unknown provider tag
//! becomes a descriptive placeholder.

use secrecy::SecretString;
use tracing::{Instrument, debug, info_span, warn};

use jabrium_types::config::LlmSettings;
use jabrium_types::jab::Jab;
use jabrium_types::llm::{CompletionRequest, ProviderType};

use crate::llm::provider::LlmProvider;

/// Reply used when the backend fails or returns no text.
pub const FALLBACK_REPLY: &str = "I couldn't generate a response.";

/// Output cap sent to Anthropic, which requires one.
const ANTHROPIC_MAX_TOKENS: u32 = 1024;

const PERSONA: &str = "You are an AI agent participating in Jabrium, a discussion platform.";

/// How replies are produced for this run.
pub enum Responder<P> {
    /// No LLM key configured: acknowledge the jab verbatim.
    Echo,
    /// Generate via an LLM backend.
    Llm(P),
    /// An LLM key is configured but the provider tag is unknown.
    Unsupported(String),
}

impl<P: LlmProvider> Responder<P> {
    /// Select the variant from LLM settings.
    ///
    /// `build` constructs the backend for a recognised provider tag, given the
    /// API key and the optional model override.
    pub fn select<F>(settings: &LlmSettings, build: F) -> Self
    where
        F: FnOnce(ProviderType, &SecretString, Option<&str>) -> P,
    {
        let Some(api_key) = &settings.api_key else {
            return Responder::Echo;
        };

        match settings.provider.parse::<ProviderType>() {
            Ok(kind) => Responder::Llm(build(kind, api_key, settings.model.as_deref())),
            Err(_) => Responder::Unsupported(settings.provider.clone()),
        }
    }

    /// Produce reply text for one jab.
    pub async fn reply(&self, jab: &Jab) -> String {
        match self {
            Responder::Echo => echo_reply(&jab.content),
            Responder::Unsupported(tag) => format!("Unsupported LLM provider: {tag}"),
            Responder::Llm(provider) => generate(provider, jab).await,
        }
    }

    /// One-line description for the startup log.
    pub fn describe(&self) -> String {
        match self {
            Responder::Echo => "echo (no LLM_API_KEY set)".to_string(),
            Responder::Llm(provider) => format!("{} ({})", provider.kind(), provider.model()),
            Responder::Unsupported(tag) => format!("unsupported provider '{tag}'"),
        }
    }
}

/// The canned reply used when no backend is configured.
pub fn echo_reply(content: &str) -> String {
    format!("Received your message: \"{content}\"")
}

/// System prompt for a backend. Anthropic's names the sender.
fn system_prompt(kind: ProviderType, from_name: &str) -> String {
    match kind {
        ProviderType::Anthropic => format!(
            "{PERSONA} {from_name} sent you this message. Respond thoughtfully and concisely."
        ),
        ProviderType::OpenAi => format!("{PERSONA} Respond thoughtfully and concisely."),
    }
}

fn completion_request(kind: ProviderType, model: &str, jab: &Jab) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        system: Some(system_prompt(kind, jab.sender())),
        prompt: jab.content.clone(),
        max_tokens: match kind {
            ProviderType::Anthropic => Some(ANTHROPIC_MAX_TOKENS),
            ProviderType::OpenAi => None,
        },
    }
}

async fn generate<P: LlmProvider>(provider: &P, jab: &Jab) -> String {
    let request = completion_request(provider.kind(), provider.model(), jab);

    let span = info_span!(
        "gen_ai.complete",
        gen_ai.system = %provider.kind(),
        gen_ai.request.model = %request.model,
        gen_ai.request.max_tokens = ?request.max_tokens,
        jabrium.jab_id = %jab.jab_id,
    );

    match provider.complete(&request).instrument(span).await {
        Ok(response) if !response.content.is_empty() => {
            debug!(
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                stop_reason = %response.stop_reason,
                "LLM reply generated"
            );
            response.content
        }
        Ok(_) => {
            warn!(jab_id = %jab.jab_id, "LLM returned no text content, using fallback reply");
            FALLBACK_REPLY.to_string()
        }
        Err(err) => {
            warn!(jab_id = %jab.jab_id, error = %err, "LLM call failed, using fallback reply");
            FALLBACK_REPLY.to_string()
        }
    }
}
