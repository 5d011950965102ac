use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Recommendation, SessionContext};

/// Conversations idle longer than this are evicted
const CONVERSATION_TTL_SECS: i64 = 3600;

/// Upper bound on remembered recommendation names per conversation
const MAX_RECOMMENDED_HISTORY: usize = 20;

/// Everything retained for one conversation between turns.
///
/// Exclusively owned by the store; handlers clone it out, work on the
/// clone, and write the whole entry back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub session: SessionContext,
    /// Fully replaced each successful turn, never merged
    pub last_recommendations: Vec<Recommendation>,
    /// Normalized names surfaced in all prior turns, oldest dropped first
    pub recommended_history: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationEntry {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            session: SessionContext::new(),
            last_recommendations: Vec::new(),
            recommended_history: Vec::new(),
            updated_at: now,
        }
    }

    /// Union of last-turn and historical names, for follow-up exclusion.
    pub fn excluded_names(&self) -> std::collections::HashSet<String> {
        self.last_recommendations
            .iter()
            .map(|r| r.normalized_name())
            .chain(self.recommended_history.iter().cloned())
            .collect()
    }

    /// Replaces the last turn's output and folds its names into history.
    pub fn record_turn(&mut self, recommendations: Vec<Recommendation>, now: DateTime<Utc>) {
        for rec in &recommendations {
            let name = rec.normalized_name();
            if !self.recommended_history.contains(&name) {
                if self.recommended_history.len() >= MAX_RECOMMENDED_HISTORY {
                    self.recommended_history.remove(0);
                }
                self.recommended_history.push(name);
            }
        }
        self.last_recommendations = recommendations;
        self.updated_at = now;
    }
}

/// TTL-evicting key-value store of per-conversation state.
///
/// Eviction is lazy: it runs inline on every write, never on a timer, so
/// an idle store can hold stale entries indefinitely. Callers that need a
/// strict memory bound must schedule their own sweeps.
#[derive(Debug, Default)]
pub struct ConversationStore {
    entries: HashMap<String, ConversationEntry>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, conversation_id: &str) -> Option<&ConversationEntry> {
        self.entries.get(conversation_id)
    }

    /// Full overwrite of the entry, with an eviction sweep first.
    pub fn upsert(&mut self, conversation_id: String, entry: ConversationEntry) {
        self.evict_older_than(Utc::now());
        self.entries.insert(conversation_id, entry);
    }

    /// Drops every entry idle past the TTL.
    pub fn evict_older_than(&mut self, now: DateTime<Utc>) {
        let ttl = Duration::seconds(CONVERSATION_TTL_SECS);
        let before = self.entries.len();
        self.entries.retain(|_, entry| now - entry.updated_at <= ttl);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = self.entries.len(), "Evicted stale conversations");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
