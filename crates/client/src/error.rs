//! Client error types.

use std::time::Duration;

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while fetching a snapshot.
///
/// Every variant means the same thing to a viewer: the data failed to load.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Request exceeded the configured timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Transport-level failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("server returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Body is not JSON
    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// JSON does not match the dashboard contract
    #[error("invalid dashboard data: {0}")]
    Validation(String),
}

impl ClientError {
    /// True for failures of the transport rather than the payload.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Timeout(_) | ClientError::Network(_) | ClientError::Status { .. }
        )
    }
}
