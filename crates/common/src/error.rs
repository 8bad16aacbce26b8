use thiserror::Error;

/// Reasons an inbound record is skipped before any delivery is attempted.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Malformed payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    Validation(&'static str),
}
