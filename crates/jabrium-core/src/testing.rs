//! In-memory test doubles for the platform and LLM ports.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use secrecy::SecretString;
use tokio_util::sync::CancellationToken;

use jabrium_types::agent::{DirectoryEntry, Registration, RegistrationRequest, Session};
use jabrium_types::error::PlatformError;
use jabrium_types::jab::{Inbox, Jab, JabReply, RespondReceipt};
use jabrium_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderType, StopReason, Usage,
};

use crate::llm::provider::LlmProvider;
use crate::platform::PlatformClient;

pub fn session() -> Session {
    Session::new("agent-self", SecretString::from("agent-key".to_string()))
}

pub fn jab(id: &str, from: &str, content: &str) -> Jab {
    Jab {
        jab_id: id.to_string(),
        from_name: Some(from.to_string()),
        content: content.to_string(),
    }
}

/// Scripted platform. Inbox results are served in order, then empty inboxes.
#[derive(Default)]
pub struct MockPlatform {
    pub registration: Mutex<Option<Result<Registration, PlatformError>>>,
    pub inboxes: Mutex<VecDeque<Result<Inbox, PlatformError>>>,
    pub directory: Vec<DirectoryEntry>,
    pub fail_respond: bool,
    pub register_calls: AtomicUsize,
    pub inbox_calls: AtomicUsize,
    pub replies: Mutex<Vec<JabReply>>,
    /// Cancelled once `inbox_calls` reaches the paired count.
    pub cancel_after: Option<(usize, CancellationToken)>,
}

impl MockPlatform {
    pub fn with_inboxes(inboxes: Vec<Result<Inbox, PlatformError>>) -> Self {
        Self {
            inboxes: Mutex::new(inboxes.into()),
            ..Default::default()
        }
    }

    pub fn replies(&self) -> Vec<JabReply> {
        self.replies.lock().unwrap().clone()
    }
}

impl PlatformClient for MockPlatform {
    async fn register(&self, _request: &RegistrationRequest) -> Result<Registration, PlatformError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        self.registration
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(PlatformError::Http("no registration scripted".to_string())))
    }

    async fn inbox(&self, _session: &Session) -> Result<Inbox, PlatformError> {
        let calls = self.inbox_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((after, token)) = &self.cancel_after {
            if calls >= *after {
                token.cancel();
            }
        }
        self.inboxes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Inbox::default()))
    }

    async fn respond(
        &self,
        _session: &Session,
        reply: &JabReply,
    ) -> Result<RespondReceipt, PlatformError> {
        if self.fail_respond {
            return Err(PlatformError::Http("connection reset".to_string()));
        }
        self.replies.lock().unwrap().push(reply.clone());
        Ok(RespondReceipt {
            tokens_earned: Some(100),
            ..Default::default()
        })
    }

    async fn directory(&self, _session: &Session) -> Result<Vec<DirectoryEntry>, PlatformError> {
        Ok(self.directory.clone())
    }
}

/// Scripted LLM provider. Returns `content` for every call.
pub struct MockProvider {
    pub kind: ProviderType,
    pub content: Option<String>,
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    pub fn answering(kind: ProviderType, content: &str) -> Self {
        Self {
            kind,
            content: Some(content.to_string()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose every call fails.
    pub fn failing(kind: ProviderType) -> Self {
        Self {
            kind,
            content: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl LlmProvider for MockProvider {
    fn kind(&self) -> ProviderType {
        self.kind
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        match &self.content {
            Some(content) => Ok(CompletionResponse {
                content: content.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            }),
            None => Err(LlmError::Provider {
                message: "boom".to_string(),
            }),
        }
    }
}
