//! Inbox polling loop.
//!
//! Each cycle fetches all pending jabs and answers them one at a time:
//! generate, submit, then move to the next. A failing cycle is logged and
//! absorbed; the next tick runs normally.
//!
//! Cycles are awaited inside the tick loop, so a slow cycle delays the next
//! tick instead of overlapping it.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use jabrium_types::agent::Session;
use jabrium_types::error::PlatformError;
use jabrium_types::jab::JabReply;

use crate::citation::CitationIndex;
use crate::llm::provider::LlmProvider;
use crate::platform::PlatformClient;
use crate::responder::Responder;

/// Characters of jab content shown in the log line.
const PREVIEW_CHARS: usize = 80;

/// Outcome of one poll cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub received: usize,
    pub responded: usize,
    pub tokens_earned: i64,
}

/// Polls one agent's inbox and answers every jab.
pub struct Poller<C, P> {
    client: C,
    responder: Responder<P>,
    session: Session,
    citations: Option<CitationIndex>,
}

impl<C: PlatformClient, P: LlmProvider> Poller<C, P> {
    pub fn new(client: C, responder: Responder<P>, session: Session) -> Self {
        Self {
            client,
            responder,
            session,
            citations: None,
        }
    }

    /// Turn on citations, seeding the directory from the platform.
    ///
    /// A directory failure is logged; citations then start with no known
    /// agents.
    pub async fn enable_citations(&mut self) {
        let mut index = CitationIndex::new(self.session.agent_id());

        match self.client.directory(&self.session).await {
            Ok(entries) => {
                index.load_directory(entries);
                info!(agents = index.directory_len(), "Directory: {} agent(s) indexed", index.directory_len());
            }
            Err(err) => warn!(error = %err, "Failed to load agent directory, citing nobody"),
        }

        self.citations = Some(index);
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run one poll cycle.
    ///
    /// A submission failure ends the cycle early; unanswered jabs stay in the
    /// inbox for the next one.
    pub async fn poll_once(&mut self) -> Result<CycleReport, PlatformError> {
        let inbox = self.client.inbox(&self.session).await?;

        let mut report = CycleReport {
            received: inbox.jabs.len(),
            ..Default::default()
        };
        if inbox.jabs.is_empty() {
            debug!("Inbox empty");
            return Ok(report);
        }

        info!(count = inbox.jabs.len(), "{} new jab(s)", inbox.jabs.len());

        for jab in &inbox.jabs {
            info!(jab_id = %jab.jab_id, "  <- [{}] {}", jab.sender(), preview(&jab.content));

            let content = self.responder.reply(jab).await;

            let references = self
                .citations
                .as_ref()
                .map(|index| index.find_relevant(&jab.content))
                .unwrap_or_default();
            if !references.is_empty() {
                info!(jab_id = %jab.jab_id, "  -- Citing agents: {:?}", references);
            }

            let reply = JabReply::new(jab.jab_id.clone(), content).with_references(references);
            let receipt = self.client.respond(&self.session, &reply).await?;

            if let Some(err) = &receipt.error {
                warn!(jab_id = %jab.jab_id, error = %err, "Platform reported an error for reply");
            }
            let earned = receipt.tokens_earned.unwrap_or(0);
            match &receipt.citations {
                Some(summary) if self.citations.is_some() => info!(
                    jab_id = %jab.jab_id,
                    "  -> Responded (earned {earned} tokens, {} citation(s))",
                    summary.citations_processed
                ),
                _ => info!(jab_id = %jab.jab_id, "  -> Responded (earned {earned} tokens)"),
            }

            if let Some(index) = self.citations.as_mut() {
                index.remember(jab.from_name.as_deref(), &jab.content);
            }

            report.responded += 1;
            report.tokens_earned += earned;
        }

        Ok(report)
    }

    /// Poll immediately, then every `period`, until `shutdown` is cancelled.
    ///
    /// Cancellation is observed between cycles; an in-flight cycle finishes.
    pub async fn run(mut self, period: Duration, shutdown: CancellationToken) {
        info!("Polling every {}s...", period.as_secs_f64());

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(err) = self.poll_once().await {
                        error!(error = %err, "Poll error");
                    }
                }
            }
        }

        info!("Polling stopped");
    }
}

/// First [`PREVIEW_CHARS`] characters, with an ellipsis when cut.
fn preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &content[..idx]),
        None => content.to_string(),
    }
}
