use thiserror::Error;

/// Error taxonomy shared by every list generator.
///
/// Retry policy lives with the callers: `RateLimited` and connection-level
/// `Network` failures are retried with backoff, everything else is fatal.
#[derive(Error, Debug)]
pub enum ListsError {
    #[error("Authentication failed: {reason}")]
    Authentication { reason: String },

    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected upstream response: {details}")]
    Upstream { details: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ListsError {
    /// True for errors that no amount of retrying will fix.
    pub fn is_fatal(&self) -> bool {
        match self {
            ListsError::RateLimited { .. } => false,
            ListsError::Network(e) => !(e.is_timeout() || e.is_connect()),
            _ => true,
        }
    }
}
