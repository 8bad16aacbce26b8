use thiserror::Error;

/// Primary delivery failures. Every variant sends the record to fallback.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("No webhook configured for channel: {0}")]
    NoDestination(String),

    #[error("Webhook returned status {0}")]
    Status(u16),

    #[error("Webhook request timed out")]
    Timeout,

    #[error("Webhook transport error: {0}")]
    Transport(String),

    #[error("Failed to encode webhook body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DeliveryError::Timeout
        } else {
            DeliveryError::Transport(err.to_string())
        }
    }
}

/// Fallback publish failures. Reported, never retried.
#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Fallback publish timed out after {0} ms")]
    Timeout(u128),

    #[error("Failed to encode fallback envelope: {0}")]
    Encode(#[from] serde_json::Error),
}
