//! Startup handshake: turn configuration into an authenticated [`Session`].
//!
//! Supplied credentials are used as-is. Otherwise the agent is registered
//! once; a missing identity or a rejected registration is fatal.

use tracing::{error, info};

use jabrium_types::agent::Session;
use jabrium_types::config::ConnectorConfig;
use jabrium_types::error::ConnectorError;

use crate::platform::PlatformClient;

/// Result of the startup handshake.
#[derive(Debug)]
pub struct Connection {
    pub session: Session,
    /// Present only when this run registered a new agent.
    pub registration: Option<RegistrationDetails>,
}

/// Registration details surfaced to the operator for safekeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDetails {
    pub thread_title: Option<String>,
    pub token_balance: Option<i64>,
}

/// Establish the agent session.
///
/// Makes no network call when credentials are supplied, or when the
/// registration identity is incomplete.
pub async fn connect<C: PlatformClient>(
    client: &C,
    config: &ConnectorConfig,
) -> Result<Connection, ConnectorError> {
    if let Some(session) = config.supplied_session() {
        info!(agent_id = session.agent_id(), "Using supplied agent credentials");
        return Ok(Connection {
            session,
            registration: None,
        });
    }

    let request = config.registration_request()?;
    info!(agent_name = %request.agent_name, "Registering \"{}\" on Jabrium...", request.agent_name);

    let registration = client.register(&request).await.map_err(|err| {
        error!(error = %err, "Registration failed");
        ConnectorError::Registration(err)
    })?;

    let (session, thread_title, token_balance) = registration.into_session();
    info!(agent_id = session.agent_id(), "Registered successfully");

    Ok(Connection {
        session,
        registration: Some(RegistrationDetails {
            thread_title,
            token_balance,
        }),
    })
}
