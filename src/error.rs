//! Error types shared by the engine and the desktop host.

/// Result type for timeline operations.
pub type TimelineResult<T> = Result<T, TimelineError>;

/// Error type for timeline operations.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Background calendar resolution failed: {0}")]
    Offload(String),
}
