//! ScoreReconciler - the main interface for scorekeep.
//!
//! This module provides [`ScoreReconciler`], the API applications use to
//! record scores and read the merged leaderboard.
//!
//! # Architecture
//!
//! ```text
//! Application → ScoreReconciler → RemoteStore → network
//!                     ↓
//!               LocalLedger → KvStore (durability guarantee)
//! ```
//!
//! Local persistence is the durability guarantee; the remote store is
//! best-effort. Within one `submit` the local record completes and is
//! durable before any remote attempt begins. Across concurrent submits no
//! remote ordering is guaranteed - the ledger's idempotent merge is what
//! makes eventual consistency correct despite out-of-order remote writes.

use thiserror::Error;

use score_store::{KvStore, LocalLedger, StorageError};
use score_types::{EntryId, PlayerId, ScoreEntry};

use crate::remote::{RemoteDoc, RemoteError, RemoteStore};

/// Reconciler errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Local storage failed. Fatal: nothing was recorded.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The remote store failed outright.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// The operation requires a player identity and none was supplied.
    #[error("player identity required")]
    IdentityRequired,
}

/// What happened on the remote side of a submission.
#[derive(Debug)]
pub enum RemoteSync {
    /// The remote store acknowledged the entry.
    Synced,
    /// The push failed; the score is safe locally.
    Failed(RemoteError),
    /// No identity was supplied, so no push was attempted.
    Skipped,
}

/// Result of a submission.
///
/// The entry always reflects what was durably recorded locally; after a
/// successful sync it additionally carries the remote acknowledgment
/// timestamp.
#[derive(Debug)]
pub struct SubmitOutcome {
    /// The recorded entry.
    pub entry: ScoreEntry,
    /// What happened on the remote side.
    pub sync: RemoteSync,
}

/// One document whose delete failed during a remote wipe.
#[derive(Debug)]
pub struct WipeFailure {
    /// The document that survived.
    pub id: EntryId,
    /// Why its delete failed.
    pub error: RemoteError,
}

/// Outcome of clearing the remote score collection.
#[derive(Debug)]
pub enum RemoteWipe {
    /// Every document was deleted.
    Complete {
        /// Number of documents deleted.
        deleted: usize,
    },
    /// Some documents were deleted, some were not.
    ///
    /// Reported distinctly from total success and total failure so callers
    /// can retry just the remainder.
    Partial {
        /// Number of documents deleted.
        deleted: usize,
        /// The documents that survived, with the error for each.
        failed: Vec<WipeFailure>,
    },
}

/// The score reconciliation engine.
///
/// Coordinates the durable [`LocalLedger`] with an injected [`RemoteStore`]
/// adapter. Both collaborators are constructor parameters - there is no
/// ambient state - so the engine tests against any backend. The player
/// identity is an explicit optional value on every call; authentication
/// completing late never races leaderboard access.
pub struct ScoreReconciler<S: KvStore, R: RemoteStore> {
    ledger: LocalLedger<S>,
    remote: R,
}

impl<S: KvStore, R: RemoteStore> ScoreReconciler<S, R> {
    /// Create a reconciler over the given ledger and remote adapter.
    pub fn new(ledger: LocalLedger<S>, remote: R) -> Self {
        Self { ledger, remote }
    }

    /// Record a score locally and sync it to the remote store best-effort.
    ///
    /// The local record must succeed or the whole operation fails with the
    /// storage error. The remote push is attempted only when a player
    /// identity is present; its failure is logged and reported in the
    /// outcome, never propagated.
    pub async fn submit(
        &self,
        value: u32,
        player: Option<&PlayerId>,
    ) -> Result<SubmitOutcome, ClientError> {
        // Local durability first.
        let entry = self.ledger.record(value).await?;

        let Some(player) = player else {
            tracing::debug!("No player identity, score recorded locally only");
            return Ok(SubmitOutcome {
                entry,
                sync: RemoteSync::Skipped,
            });
        };

        match self.remote.push(player, &entry).await {
            Ok(ack) => {
                tracing::debug!("Score synced to remote store as {}", ack.id);
                Ok(SubmitOutcome {
                    entry: entry.with_remote_ack(ack.recorded_at),
                    sync: RemoteSync::Synced,
                })
            }
            Err(e) => {
                tracing::warn!("Failed to sync score to remote store: {}", e);
                Ok(SubmitOutcome {
                    entry,
                    sync: RemoteSync::Failed(e),
                })
            }
        }
    }

    /// The merged leaderboard.
    ///
    /// Always starts from the local board. When a player identity is
    /// present, fetches the remote collection, parses each document
    /// (skipping malformed ones), reconciles into the ledger, and returns
    /// the merged, persisted board. Any remote failure falls back to the
    /// local-only board without failing the call.
    pub async fn fetch_leaderboard(
        &self,
        player: Option<&PlayerId>,
    ) -> Result<Vec<ScoreEntry>, ClientError> {
        let local = self.ledger.all().await;

        let Some(player) = player else {
            return Ok(local);
        };

        let docs = match self.remote.fetch_all(player).await {
            Ok(docs) => docs,
            Err(e) => {
                tracing::warn!("Failed to fetch remote scores: {}", e);
                return Ok(local);
            }
        };

        let remote = parse_documents(docs);
        let merged = self.ledger.reconcile(remote).await?;
        Ok(merged)
    }

    /// Remove the local leaderboard.
    pub async fn clear_local(&self) -> Result<(), ClientError> {
        self.ledger.clear().await?;
        Ok(())
    }

    /// Delete every remote score belonging to the player.
    ///
    /// Requires a player identity. Per-document deletes are independent;
    /// when some succeed and some fail the result is
    /// [`RemoteWipe::Partial`], enumerating each failure so the caller can
    /// retry just the remainder.
    pub async fn clear_remote(
        &self,
        player: Option<&PlayerId>,
    ) -> Result<RemoteWipe, ClientError> {
        let player = player.ok_or(ClientError::IdentityRequired)?;

        let results = self.remote.delete_all(player).await?;

        let mut deleted = 0;
        let mut failed = Vec::new();
        for (id, result) in results {
            match result {
                Ok(()) => deleted += 1,
                Err(error) => failed.push(WipeFailure { id, error }),
            }
        }

        if failed.is_empty() {
            tracing::debug!("Remote scores cleared ({} deleted)", deleted);
            Ok(RemoteWipe::Complete { deleted })
        } else {
            tracing::warn!(
                "Remote wipe incomplete: {} deleted, {} failed",
                deleted,
                failed.len()
            );
            Ok(RemoteWipe::Partial { deleted, failed })
        }
    }
}

/// Parse raw remote documents, skipping malformed ones individually.
fn parse_documents(docs: Vec<RemoteDoc>) -> Vec<ScoreEntry> {
    docs.into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            match ScoreEntry::from_document(doc.id, &doc.fields) {
                Some(entry) => Some(entry),
                None => {
                    tracing::warn!("Skipping malformed remote score document {}", id);
                    None
                }
            }
        })
        .collect()
}
