//! Connector logic and port traits for the Jabrium connector.
//!
//! This crate defines the "ports" (platform client and LLM provider traits)
//! that the infrastructure layer implements, plus the registration, reply
//! generation, and polling logic built on top of them. It depends only on
//! `jabrium-types` -- never on `jabrium-infra` or any HTTP crate.

pub mod citation;
pub mod connect;
pub mod llm;
pub mod platform;
pub mod poller;
pub mod responder;

#[cfg(test)]
pub(crate) mod testing;
