//! Financial assistant conversation adapter
//!
//! Produces assistant text for a user message by combining the fixed
//! instructional prompt, the user's financial profile, the investment
//! catalog and the per-user conversation transcript, then delegating to
//! a completion provider. Provider failures never propagate: the caller
//! always receives displayable text.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::ChatRole;
use crate::prompt::{build_prompt, UserProfile};
use crate::provider::CompletionProvider;
use crate::store::Storage;
use crate::transcript::{Transcript, TranscriptEntry};

/// Fixed reply when the provider credential is missing
pub const FALLBACK_UNAVAILABLE: &str =
    "I'm having trouble connecting to my knowledge base. Please try again later.";

/// Fixed reply when the provider answered in an unrecognized shape
pub const FALLBACK_UNEXPECTED_FORMAT: &str =
    "I received a response in an unexpected format. Please try again later.";

/// Fixed reply for any other completion failure
pub const FALLBACK_ERROR: &str =
    "I encountered an error while processing your request. Please try again later.";

/// Conversation adapter over a record store and a completion provider
///
/// Transcripts live on the advisor instance itself; there is no global
/// conversation state.
pub struct Advisor {
    storage: Arc<dyn Storage>,
    provider: Arc<dyn CompletionProvider>,
    transcripts: RwLock<HashMap<i64, Transcript>>,
}

impl Advisor {
    pub fn new(storage: Arc<dyn Storage>, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            storage,
            provider,
            transcripts: RwLock::new(HashMap::new()),
        }
    }

    /// Produce assistant text for `message` on behalf of `user_id`.
    ///
    /// Never fails: provider errors collapse to fixed fallback strings.
    /// The user message is appended to the transcript unconditionally,
    /// the assistant reply only on success. Concurrent calls for the
    /// same user may interleave their appends; there is no per-user
    /// serialization.
    pub async fn respond(&self, message: &str, user_id: i64) -> String {
        let profile = self.resolve_profile(user_id).await;
        let history = self.render_history(user_id).await;
        let prompt = build_prompt(&profile, &history, message);

        self.append(user_id, TranscriptEntry::new(ChatRole::User, message.to_string()))
            .await;

        match self.provider.complete(&prompt).await {
            Ok(completion) => {
                info!(user_id, chars = completion.text.len(), "Assistant reply generated");
                self.append(
                    user_id,
                    TranscriptEntry::new(ChatRole::Assistant, completion.text.clone()),
                )
                .await;
                completion.text
            }
            Err(AppError::MissingApiKey) => {
                warn!(user_id, "Gemini API key not configured");
                FALLBACK_UNAVAILABLE.to_string()
            }
            Err(AppError::UnexpectedResponseShape(shape)) => {
                warn!(user_id, shape = %shape, "Completion response had an unrecognized shape");
                FALLBACK_UNEXPECTED_FORMAT.to_string()
            }
            Err(err) => {
                warn!(user_id, error = %err, "Completion request failed");
                FALLBACK_ERROR.to_string()
            }
        }
    }

    /// Snapshot of the in-memory transcript for a user, if one exists
    pub async fn transcript(&self, user_id: i64) -> Option<Transcript> {
        let transcripts = self.transcripts.read().await;
        transcripts.get(&user_id).cloned()
    }

    /// Resolve the user's financial profile, falling back to the fixed
    /// defaults when the record lacks values or does not exist.
    async fn resolve_profile(&self, user_id: i64) -> UserProfile {
        let defaults = UserProfile::default();

        match self.storage.get_user(user_id).await {
            Ok(Some(user)) => UserProfile {
                monthly_income: user.monthly_income.unwrap_or(defaults.monthly_income),
                risk_tolerance: user.risk_tolerance.unwrap_or(defaults.risk_tolerance),
            },
            Ok(None) => defaults,
            Err(err) => {
                warn!(user_id, error = %err, "Profile lookup failed, using defaults");
                defaults
            }
        }
    }

    async fn render_history(&self, user_id: i64) -> String {
        let transcripts = self.transcripts.read().await;
        transcripts
            .get(&user_id)
            .map(|t| t.render())
            .unwrap_or_default()
    }

    async fn append(&self, user_id: i64, entry: TranscriptEntry) {
        let mut transcripts = self.transcripts.write().await;
        transcripts.entry(user_id).or_default().push(entry);
    }
}
