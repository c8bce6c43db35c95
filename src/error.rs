//! Error types for the FinAssist backend

use thiserror::Error;

/// Result type alias for backend operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {

    // =============================
    // Request / Domain Errors
    // =============================

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // =============================
    // Completion Provider Errors
    // =============================

    #[error("GEMINI_API_KEY not configured")]
    MissingApiKey,

    #[error("Completion provider error: {0}")]
    Provider(String),

    #[error("Unexpected completion response shape: {0}")]
    UnexpectedResponseShape(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
