//! Infrastructure layer for the Jabrium connector.
//!
//! Implementations of the ports defined in `jabrium-core`: the reqwest
//! platform client and the Anthropic/OpenAI backends. Also loads the
//! optional TOML config file.

pub mod config;
pub mod llm;
pub mod platform;
