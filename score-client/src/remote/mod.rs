//! Remote score store abstraction.
//!
//! This module provides a pluggable adapter for the remote score store
//! (a hosted document database, a mock for testing).
//!
//! # Design
//!
//! The adapter is async and document-oriented:
//! - `push()` writes one entry into the player's score collection
//! - `fetch_all()` returns the raw documents in the collection
//! - `delete_all()` deletes the collection, one result per document
//!
//! Every operation is best-effort from the engine's point of view: no
//! retry loop lives behind this trait, and implementations arrive already
//! bounded (timeouts, cancellation) by their callers.
//!
//! # Example
//!
//! ```ignore
//! let remote = MockRemote::new();
//! let ack = remote.push(&player, &entry).await?;
//! let docs = remote.fetch_all(&player).await?;
//! ```

mod mock;

pub use mock::MockRemote;

use async_trait::async_trait;
use thiserror::Error;

use score_types::{EntryId, PlayerId, ScoreEntry};

/// Remote store errors.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The remote store could not be reached.
    #[error("remote unavailable: {0}")]
    Unavailable(String),

    /// The remote operation timed out.
    #[error("remote operation timed out")]
    Timeout,

    /// The remote store refused the operation.
    #[error("remote rejected operation: {0}")]
    Rejected(String),
}

/// Acknowledgment returned by the remote store for an accepted write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAck {
    /// Identifier the remote store assigned to the new document.
    pub id: EntryId,
    /// Remote timestamp at which the write was accepted (ms since epoch).
    pub recorded_at: i64,
}

/// A raw document-shaped record fetched from the remote store.
///
/// The id lives outside the field payload, the way document stores key
/// their records. Fields are loosely typed; the reconciler parses each
/// document individually and skips malformed ones.
#[derive(Debug, Clone)]
pub struct RemoteDoc {
    /// The remote store's document identifier.
    pub id: EntryId,
    /// The document fields.
    pub fields: serde_json::Value,
}

/// Trait for the remote score store adapter.
///
/// Implementations wrap whatever backend holds the per-player score
/// collection, scoped under the opaque player identity.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Push one entry into the player's score collection.
    ///
    /// The remote store assigns its own document id and acknowledgment
    /// timestamp, returned in the [`RemoteAck`].
    async fn push(&self, player: &PlayerId, entry: &ScoreEntry) -> Result<RemoteAck, RemoteError>;

    /// Fetch every score document in the player's collection.
    async fn fetch_all(&self, player: &PlayerId) -> Result<Vec<RemoteDoc>, RemoteError>;

    /// Delete every score document in the player's collection.
    ///
    /// Each delete is independent; the returned vec carries one outcome
    /// per document, all accounted for before the call returns. The outer
    /// error is reserved for total unreachability.
    async fn delete_all(
        &self,
        player: &PlayerId,
    ) -> Result<Vec<(EntryId, Result<(), RemoteError>)>, RemoteError>;
}
