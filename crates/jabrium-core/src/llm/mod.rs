//! LLM provider abstraction.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations

pub mod provider;
