//! Per-user conversation transcripts
//!
//! Append-only history of user/assistant exchanges, kept by the advisor
//! and rendered into the context block of each completion prompt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::models::ChatRole;

/// A single exchange entry in a transcript
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptEntry {
    pub timestamp: DateTime<Utc>,
    pub role: ChatRole,
    pub content: String,
}

impl TranscriptEntry {
    pub fn new(role: ChatRole, content: String) -> Self {
        Self {
            timestamp: Utc::now(),
            role,
            content,
        }
    }
}

/// Ordered conversation history for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    entries: VecDeque<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            entries: VecDeque::new(),
        }
    }

    /// Append an entry to the end of the history
    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push_back(entry);
        self.updated_at = Utc::now();
    }

    /// Iterate over all entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the history as `Role: content` lines for prompt embedding
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format!("{}: {}\n", entry.role, entry.content));
        }
        out
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_appends_in_order() {
        let mut transcript = Transcript::new();
        transcript.push(TranscriptEntry::new(ChatRole::User, "What is RSI?".to_string()));
        transcript.push(TranscriptEntry::new(
            ChatRole::Assistant,
            "RSI is a momentum indicator...".to_string(),
        ));
        transcript.push(TranscriptEntry::new(ChatRole::User, "Thanks".to_string()));

        assert_eq!(transcript.len(), 3);
        let roles: Vec<ChatRole> = transcript.entries().map(|e| e.role).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant, ChatRole::User]);
    }

    #[test]
    fn test_render_includes_roles_and_content() {
        let mut transcript = Transcript::new();
        transcript.push(TranscriptEntry::new(ChatRole::User, "How do I budget?".to_string()));
        transcript.push(TranscriptEntry::new(
            ChatRole::Assistant,
            "Track your spending first.".to_string(),
        ));

        let rendered = transcript.render();
        assert_eq!(
            rendered,
            "User: How do I budget?\nAssistant: Track your spending first.\n"
        );
    }

    #[test]
    fn test_empty_transcript_renders_nothing() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert_eq!(transcript.render(), "");
    }
}
