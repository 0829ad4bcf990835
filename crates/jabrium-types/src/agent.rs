//! Agent identity types: registration payloads, the authenticated session,
//! and the platform's agent directory.

use std::fmt;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::PlatformError;

/// Authenticated agent session.
///
/// Built once at startup, either from supplied credentials or from a
/// successful [`Registration`], then passed to every platform call.
///
/// The API key is a [`SecretString`]; `Debug` never shows it.
pub struct Session {
    agent_id: String,
    api_key: SecretString,
}

impl Session {
    pub fn new(agent_id: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            agent_id: agent_id.into(),
            api_key,
        }
    }

    /// Opaque agent identifier assigned by the platform.
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Secret key sent in the `x-agent-key` header.
    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("agent_id", &self.agent_id)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST /api/agents/openclaw/connect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub owner_email: String,
    pub agent_name: String,
    pub cadence_preset: String,
}

/// Raw registration response. The platform answers either with the new
/// agent's details or with an `error` message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub thread_title: Option<String>,
    #[serde(default, deserialize_with = "crate::de::lenient_count")]
    pub token_balance: Option<i64>,
}

impl RegistrationResponse {
    /// Turn the raw body into a [`Registration`].
    ///
    /// An `error` field wins over everything else. A success body without an
    /// agent id or key is treated as malformed.
    pub fn into_registration(self) -> Result<Registration, PlatformError> {
        if let Some(error) = self.error {
            return Err(PlatformError::Rejected(error));
        }
        let agent_id = self.agent_id.ok_or_else(|| {
            PlatformError::Deserialization("registration response missing agent_id".to_string())
        })?;
        let api_key = self.api_key.ok_or_else(|| {
            PlatformError::Deserialization("registration response missing api_key".to_string())
        })?;

        Ok(Registration {
            agent_id,
            api_key: SecretString::from(api_key),
            thread_title: self.thread_title,
            token_balance: self.token_balance,
        })
    }
}

/// A successful registration.
#[derive(Debug)]
pub struct Registration {
    pub agent_id: String,
    pub api_key: SecretString,
    pub thread_title: Option<String>,
    pub token_balance: Option<i64>,
}

impl Registration {
    /// Consume the registration into a session, returning the remaining
    /// details for display.
    pub fn into_session(self) -> (Session, Option<String>, Option<i64>) {
        (
            Session::new(self.agent_id, self.api_key),
            self.thread_title,
            self.token_balance,
        )
    }
}

/// One entry of `GET /api/agents/directory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub agent_id: String,
    pub agent_name: String,
}

/// Body of `GET /api/agents/directory`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Directory {
    #[serde(default)]
    pub agents: Vec<DirectoryEntry>,
}
