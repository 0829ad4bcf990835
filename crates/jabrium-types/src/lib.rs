//! Shared domain types for the Jabrium connector.
//!
//! Agent credentials, jabs and replies, connector configuration, LLM request
//! shapes, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, secrecy, thiserror.

pub mod agent;
pub mod config;
mod de;
pub mod error;
pub mod jab;
pub mod llm;
