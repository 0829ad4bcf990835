//! Connector configuration.
//!
//! Configuration is assembled from layers (flags/env, then the optional
//! `config.toml`, then built-in defaults) into a [`ConfigLayer`], and
//! resolved once into the immutable [`ConnectorConfig`].

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::agent::{RegistrationRequest, Session};
use crate::error::ConfigError;

/// Default Jabrium instance.
pub const DEFAULT_BASE_URL: &str = "https://jabrium-5bnm.onrender.com";

/// Default polling interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 30_000;

/// Default cadence preset sent at registration.
pub const DEFAULT_CADENCE: &str = "rapid";

/// Default LLM provider tag.
pub const DEFAULT_LLM_PROVIDER: &str = "anthropic";

/// One layer of partially-specified configuration.
///
/// Every field is optional so layers can be stacked with [`ConfigLayer::or`].
/// This is also the shape of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub base_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub owner_email: Option<String>,
    pub agent_name: Option<String>,
    pub cadence: Option<String>,
    pub agent_id: Option<String>,
    pub api_key: Option<String>,
    pub citations: Option<bool>,
    pub llm: LlmLayer,
}

/// The `[llm]` table of a [`ConfigLayer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmLayer {
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl ConfigLayer {
    /// Fill every unset field of `self` from `lower`.
    pub fn or(self, lower: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            base_url: self.base_url.or(lower.base_url),
            poll_interval_ms: self.poll_interval_ms.or(lower.poll_interval_ms),
            owner_email: self.owner_email.or(lower.owner_email),
            agent_name: self.agent_name.or(lower.agent_name),
            cadence: self.cadence.or(lower.cadence),
            agent_id: self.agent_id.or(lower.agent_id),
            api_key: self.api_key.or(lower.api_key),
            citations: self.citations.or(lower.citations),
            llm: LlmLayer {
                provider: self.llm.provider.or(lower.llm.provider),
                api_key: self.llm.api_key.or(lower.llm.api_key),
                model: self.llm.model.or(lower.llm.model),
            },
        }
    }
}

/// LLM backend settings.
#[derive(Debug)]
pub struct LlmSettings {
    /// Provider tag as configured (e.g. "anthropic", "openai").
    pub provider: String,
    /// Without a key, the connector echoes instead of calling a model.
    pub api_key: Option<SecretString>,
    /// Model override; each backend has its own default.
    pub model: Option<String>,
}

/// Fully resolved, immutable connector configuration.
#[derive(Debug)]
pub struct ConnectorConfig {
    pub base_url: String,
    pub poll_interval: Duration,
    pub owner_email: Option<String>,
    pub agent_name: Option<String>,
    pub cadence: String,
    pub agent_id: Option<String>,
    pub api_key: Option<SecretString>,
    pub llm: LlmSettings,
    pub citations: bool,
}

impl ConnectorConfig {
    /// Resolve a merged layer against built-in defaults.
    ///
    /// Empty strings count as unset.
    pub fn from_layer(layer: ConfigLayer) -> Result<Self, ConfigError> {
        let poll_interval_ms = layer.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS);
        if poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "POLL_INTERVAL_MS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        let base_url = non_empty(layer.base_url).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_millis(poll_interval_ms),
            owner_email: non_empty(layer.owner_email),
            agent_name: non_empty(layer.agent_name),
            cadence: non_empty(layer.cadence).unwrap_or_else(|| DEFAULT_CADENCE.to_string()),
            agent_id: non_empty(layer.agent_id),
            api_key: non_empty(layer.api_key).map(SecretString::from),
            llm: LlmSettings {
                provider: non_empty(layer.llm.provider)
                    .unwrap_or_else(|| DEFAULT_LLM_PROVIDER.to_string()),
                api_key: non_empty(layer.llm.api_key).map(SecretString::from),
                model: non_empty(layer.llm.model),
            },
            citations: layer.citations.unwrap_or(false),
        })
    }

    /// Session from externally supplied credentials, when both halves are set.
    pub fn supplied_session(&self) -> Option<Session> {
        match (&self.agent_id, &self.api_key) {
            (Some(agent_id), Some(api_key)) => Some(Session::new(
                agent_id.clone(),
                SecretString::from(api_key.expose_secret().to_owned()),
            )),
            _ => None,
        }
    }

    /// Registration payload. Fails when owner email or agent name is missing.
    pub fn registration_request(&self) -> Result<RegistrationRequest, ConfigError> {
        match (&self.owner_email, &self.agent_name) {
            (Some(owner_email), Some(agent_name)) => Ok(RegistrationRequest {
                owner_email: owner_email.clone(),
                agent_name: agent_name.clone(),
                cadence_preset: self.cadence.clone(),
            }),
            _ => Err(ConfigError::MissingIdentity),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
