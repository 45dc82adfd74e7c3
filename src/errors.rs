//! Error types for the overlay.
//!
//! Poll-time variants (`Http`, `Status`, `Decode`, `Timeout`) are recoverable:
//! the backend logs them and keeps polling. Configuration variants are fatal
//! and surface from `main` before the window opens.

#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("Chat request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chat endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error("Chat history could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Chat request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid chat endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Overlay container id is empty; there is nothing to render messages into")]
    MissingContainer,

    #[error("Settings file error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to create Tokio runtime: {reason}")]
    Runtime { reason: String },
}

impl OverlayError {
    /// Whether the polling loop should log this and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            OverlayError::Http(_)
                | OverlayError::Status { .. }
                | OverlayError::Decode(_)
                | OverlayError::Timeout { .. }
        )
    }
}
