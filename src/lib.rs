//! FinAssist backend
//!
//! A personal-finance dashboard backend that:
//! - Keeps users, accounts, savings goals and chat history in an
//!   in-memory record store
//! - Answers financial questions through a Gemini-backed assistant with
//!   per-user conversation transcripts
//! - Serves the REST endpoints the dashboard front end consumes
//!
//! CHAT TURN:
//! STORE USER MESSAGE → BUILD PROMPT → COMPLETE → STORE REPLY → RETURN HISTORY

pub mod advisor;
pub mod api;
pub mod error;
pub mod models;
pub mod prompt;
pub mod provider;
pub mod store;
pub mod transcript;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use store::{MemStorage, Storage};
