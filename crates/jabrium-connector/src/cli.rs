//! Command-line and environment options for the `jabrium-connector` binary.
//!
//! Every option can be given as a flag or through its environment variable.
//! Unset options fall through to the config file, then to built-in defaults.

use std::path::PathBuf;

use clap::Parser;
use clap::builder::BoolishValueParser;

use jabrium_observe::tracing_setup::LogFormat;
use jabrium_types::config::{ConfigLayer, LlmLayer};

/// Connect an AI agent to Jabrium and answer its jabs.
#[derive(Parser)]
#[command(name = "jabrium-connector", version, about, long_about = None)]
pub struct Cli {
    /// Jabrium instance to connect to.
    #[arg(long, env = "JABRIUM_BASE_URL")]
    pub base_url: Option<String>,

    /// Milliseconds between inbox polls.
    #[arg(long, env = "POLL_INTERVAL_MS")]
    pub poll_interval_ms: Option<u64>,

    /// Owner email, used only when registering.
    #[arg(long, env = "JABRIUM_OWNER_EMAIL")]
    pub owner_email: Option<String>,

    /// Agent display name, used only when registering.
    #[arg(long, env = "JABRIUM_AGENT_NAME")]
    pub agent_name: Option<String>,

    /// Cadence preset sent at registration.
    #[arg(long, env = "JABRIUM_CADENCE")]
    pub cadence: Option<String>,

    /// Existing agent id. Skips registration together with --api-key.
    #[arg(long, env = "JABRIUM_AGENT_ID")]
    pub agent_id: Option<String>,

    /// Existing agent API key.
    #[arg(long, env = "JABRIUM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// LLM backend: anthropic or openai.
    #[arg(long, env = "LLM_PROVIDER")]
    pub llm_provider: Option<String>,

    /// LLM API key. Without one, jabs are answered with an echo.
    #[arg(long, env = "LLM_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// Model override for the LLM backend.
    #[arg(long, env = "LLM_MODEL")]
    pub llm_model: Option<String>,

    /// Cite relevant agents in replies.
    #[arg(
        long,
        env = "JABRIUM_CITATIONS",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub citations: Option<bool>,

    /// Config file (default: ~/.jabrium/config.toml if present).
    #[arg(long, env = "JABRIUM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format: pretty or json.
    #[arg(long, env = "JABRIUM_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, env = "JABRIUM_OTEL")]
    pub otel: bool,

    /// Detailed output (-v for debug, -vv for trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default log filter for the chosen verbosity.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "info,jabrium_core=debug,jabrium_infra=debug,jabrium_connector=debug",
            _ => "trace",
        }
    }

    /// The flag/env configuration layer.
    pub fn to_layer(&self) -> ConfigLayer {
        ConfigLayer {
            base_url: self.base_url.clone(),
            poll_interval_ms: self.poll_interval_ms,
            owner_email: self.owner_email.clone(),
            agent_name: self.agent_name.clone(),
            cadence: self.cadence.clone(),
            agent_id: self.agent_id.clone(),
            api_key: self.api_key.clone(),
            citations: self.citations,
            llm: LlmLayer {
                provider: self.llm_provider.clone(),
                api_key: self.llm_api_key.clone(),
                model: self.llm_model.clone(),
            },
        }
    }
}
