//! Error types for score-store.

use score_types::CodecError;
use thiserror::Error;

/// Errors from the underlying key-value blob store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected or failed the operation.
    #[error("store backend error: {0}")]
    Backend(String),

    /// The backend is out of space.
    #[error("store full")]
    Full,
}

/// Fatal storage failures surfaced by the ledger.
///
/// Corruption of the persisted blob is deliberately not represented here:
/// an unreadable board is recovered as an empty one, never an error.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key-value store could not complete the operation.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The board could not be serialized.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::Backend("device unplugged".into());
        assert_eq!(err.to_string(), "store backend error: device unplugged");

        let wrapped = StorageError::from(StoreError::Full);
        assert_eq!(wrapped.to_string(), "store error: store full");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StoreError>();
        assert_send_sync::<StorageError>();
    }
}
