//! Observability setup for the Jabrium connector.

pub mod tracing_setup;
