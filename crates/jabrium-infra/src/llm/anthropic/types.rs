//! Anthropic Messages API wire types.
//!
//! Provider-specific request/response structures. The provider-agnostic
//! shapes live in `jabrium_types::llm`.

use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

/// A single message in an Anthropic conversation.
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicMessage {
    pub role: String,
    pub content: String,
}

/// A content block in a response. Only text is used; everything else is
/// kept as `Other` so unknown block types do not fail parsing.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Token usage from Anthropic.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnthropicUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

/// Non-streaming response from the Messages API.
///
/// Every field defaults, so a body without content parses to an empty block
/// list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnthropicResponse {
    pub content: Vec<AnthropicContentBlock>,
    pub stop_reason: Option<String>,
    pub usage: AnthropicUsage,
}

impl AnthropicResponse {
    /// Text of the first text block, matching how the API is normally read.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            AnthropicContentBlock::Text { text } => Some(text.as_str()),
            AnthropicContentBlock::Other => None,
        })
    }
}

/// An error body from the Anthropic API.
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicErrorBody {
    pub error: AnthropicError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicError {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}
