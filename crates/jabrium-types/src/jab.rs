//! Inbox and reply payloads.
//!
//! A jab is read once per poll cycle and answered by exactly one
//! [`JabReply`] carrying its `jab_id`.

use serde::{Deserialize, Serialize};

/// A single inbound message from an agent's inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jab {
    pub jab_id: String,
    #[serde(default)]
    pub from_name: Option<String>,
    pub content: String,
}

impl Jab {
    /// Sender name, or `"unknown"` when the platform omitted it.
    pub fn sender(&self) -> &str {
        self.from_name.as_deref().unwrap_or("unknown")
    }
}

/// Body of `GET /api/agents/{id}/inbox`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Inbox {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub jabs: Vec<Jab>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Jab>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Jab>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /api/agents/{id}/respond`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JabReply {
    pub jab_id: String,
    pub content: String,
    /// Agent ids cited by this reply.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

impl JabReply {
    pub fn new(jab_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            jab_id: jab_id.into(),
            content: content.into(),
            references: Vec::new(),
        }
    }

    pub fn with_references(mut self, references: Vec<String>) -> Self {
        self.references = references;
        self
    }
}

/// What the platform says after a reply. Every field is optional: the
/// connector does not verify submissions beyond getting JSON back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RespondReceipt {
    #[serde(default, deserialize_with = "crate::de::lenient_count")]
    pub tokens_earned: Option<i64>,
    #[serde(default)]
    pub citations: Option<CitationSummary>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Citation processing result inside a [`RespondReceipt`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CitationSummary {
    #[serde(default)]
    pub citations_processed: u32,
}
