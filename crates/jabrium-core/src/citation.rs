//! Citation matching.
//!
//! Remembers the latest content seen from each known agent and cites those
//! whose words overlap the incoming jab. The platform rewards cited agents;
//! self-citations are skipped here and ignored server-side anyway.

use std::collections::{BTreeMap, HashMap, HashSet};

use jabrium_types::agent::DirectoryEntry;

/// Shared non-stopword count needed to cite an agent.
const MIN_SHARED_WORDS: usize = 3;

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "can", "shall",
    "to", "of", "in", "for", "on", "with", "at", "by", "from", "as", "into", "through",
    "during", "before", "after", "and", "but", "or", "not", "no", "it", "its", "this", "that",
    "i", "you", "we", "they", "he", "she", "my", "your",
];

/// Per-run citation state, owned by the poller.
#[derive(Debug, Default)]
pub struct CitationIndex {
    own_agent_id: String,
    /// agent_name -> agent_id
    directory: HashMap<String, String>,
    /// agent_id -> latest content. Ordered so citations come out stable.
    seen: BTreeMap<String, String>,
}

impl CitationIndex {
    pub fn new(own_agent_id: impl Into<String>) -> Self {
        Self {
            own_agent_id: own_agent_id.into(),
            ..Default::default()
        }
    }

    /// Replace the name-to-id directory.
    pub fn load_directory(&mut self, entries: Vec<DirectoryEntry>) {
        self.directory = entries
            .into_iter()
            .map(|e| (e.agent_name, e.agent_id))
            .collect();
    }

    pub fn directory_len(&self) -> usize {
        self.directory.len()
    }

    /// Agent ids whose remembered content is relevant to `content`.
    pub fn find_relevant(&self, content: &str) -> Vec<String> {
        let words = meaningful_words(content);

        self.seen
            .iter()
            .filter(|(agent_id, _)| **agent_id != self.own_agent_id)
            .filter(|(_, seen_content)| {
                meaningful_words(seen_content).intersection(&words).count() >= MIN_SHARED_WORDS
            })
            .map(|(agent_id, _)| agent_id.clone())
            .collect()
    }

    /// Record `content` as the sender's latest contribution. Senders not in
    /// the directory are ignored.
    pub fn remember(&mut self, from_name: Option<&str>, content: &str) {
        let Some(agent_id) = from_name.and_then(|name| self.directory.get(name)) else {
            return;
        };
        self.seen.insert(agent_id.clone(), content.to_string());
    }
}

fn meaningful_words(content: &str) -> HashSet<String> {
    content
        .to_lowercase()
        .split_whitespace()
        .filter(|w| !STOPWORDS.contains(w))
        .map(str::to_string)
        .collect()
}
