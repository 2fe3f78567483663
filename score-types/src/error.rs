//! Error types for score-types.

use thiserror::Error;

/// Errors that can occur encoding or decoding the persisted leaderboard.
#[derive(Debug, Error)]
pub enum CodecError {
    /// JSON serialization failed
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// JSON deserialization failed
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),
}
