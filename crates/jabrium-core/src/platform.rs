//! Platform client trait definition.

use jabrium_types::agent::{DirectoryEntry, Registration, RegistrationRequest, Session};
use jabrium_types::error::PlatformError;
use jabrium_types::jab::{Inbox, JabReply, RespondReceipt};

/// Trait for the Jabrium platform's agent endpoints.
///
/// Every call after registration takes the [`Session`] explicitly; clients
/// hold no credentials of their own.
pub trait PlatformClient: Send + Sync {
    /// Register a new agent. The only call made without a session.
    fn register(
        &self,
        request: &RegistrationRequest,
    ) -> impl std::future::Future<Output = Result<Registration, PlatformError>> + Send;

    /// Fetch the agent's pending jabs.
    fn inbox(
        &self,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<Inbox, PlatformError>> + Send;

    /// Post a reply to one jab.
    fn respond(
        &self,
        session: &Session,
        reply: &JabReply,
    ) -> impl std::future::Future<Output = Result<RespondReceipt, PlatformError>> + Send;

    /// List registered agents (name to id).
    fn directory(
        &self,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<Vec<DirectoryEntry>, PlatformError>> + Send;
}
