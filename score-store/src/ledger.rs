//! The durable local leaderboard.
//!
//! [`LocalLedger`] owns one persisted leaderboard blob in a [`KvStore`].
//! Every mutating operation is a single atomic critical section - the full
//! blob is read, modified, and written back under one lock - so concurrent
//! submissions cannot interleave and break the sort/dedup/capacity
//! invariants. The lock is internal and never held across remote I/O;
//! remote sync happens entirely outside this type.

use score_core::{Leaderboard, DEFAULT_CAPACITY};
use score_types::{decode_board, encode_board, ScoreEntry};
use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::store::KvStore;

/// Storage key the leaderboard blob is persisted under by default.
pub const DEFAULT_BOARD_KEY: &str = "high_scores";

/// Durable, process-local bounded leaderboard.
///
/// The persisted representation is always a valid leaderboard: sorted,
/// deduplicated, and capacity-bounded. The invariant is restored on every
/// write, not just on read.
pub struct LocalLedger<S: KvStore> {
    store: S,
    key: String,
    capacity: usize,
    /// Serializes every read-modify-write cycle of the persisted blob.
    write_guard: Mutex<()>,
}

impl<S: KvStore> LocalLedger<S> {
    /// Create a ledger over the given store with the default key and
    /// capacity.
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: DEFAULT_BOARD_KEY.to_string(),
            capacity: DEFAULT_CAPACITY,
            write_guard: Mutex::new(()),
        }
    }

    /// Set the storage key the board is persisted under.
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    /// Set the maximum number of entries the board retains.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Record a new score.
    ///
    /// Constructs an entry with a fresh id and the current timestamp,
    /// inserts it, restores the invariants, persists the result, and
    /// returns the created entry. A write failure is fatal and propagates.
    pub async fn record(&self, value: u32) -> Result<ScoreEntry, StorageError> {
        let _guard = self.write_guard.lock().await;

        let mut board = self.load().await;
        let entry = ScoreEntry::new_local(value);
        board.insert(entry.clone());
        self.persist(&board).await?;

        Ok(entry)
    }

    /// The persisted leaderboard, in rank order.
    ///
    /// A missing, corrupt, or unreadable blob yields an empty board -
    /// corruption must never crash the caller.
    pub async fn all(&self) -> Vec<ScoreEntry> {
        let _guard = self.write_guard.lock().await;
        self.load().await.into_entries()
    }

    /// Remove the persisted leaderboard entirely.
    ///
    /// Subsequent [`all`](Self::all) calls return empty until the next
    /// [`record`](Self::record).
    pub async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.write_guard.lock().await;
        self.store.delete(&self.key).await?;
        Ok(())
    }

    /// Merge remote entries into the persisted board.
    ///
    /// Uses the same deterministic merge as [`record`](Self::record):
    /// dedup by id, sort, truncate. The merged board is persisted and
    /// returned. Reconciling the same remote set twice yields the same
    /// board as reconciling it once.
    pub async fn reconcile(
        &self,
        remote: Vec<ScoreEntry>,
    ) -> Result<Vec<ScoreEntry>, StorageError> {
        let _guard = self.write_guard.lock().await;

        let mut board = self.load().await;
        board.merge(remote);
        self.persist(&board).await?;

        Ok(board.into_entries())
    }

    /// Load the persisted board, degrading to an empty one on missing,
    /// corrupt, or unreadable data.
    async fn load(&self) -> Leaderboard {
        let blob = match self.store.get(&self.key).await {
            Ok(Some(blob)) => blob,
            Ok(None) => return Leaderboard::new(self.capacity),
            Err(e) => {
                tracing::warn!("Failed to read leaderboard blob: {}", e);
                return Leaderboard::new(self.capacity);
            }
        };

        match decode_board(&blob) {
            Ok(entries) => Leaderboard::from_entries(self.capacity, entries),
            Err(e) => {
                tracing::warn!("Discarding corrupt leaderboard blob: {}", e);
                Leaderboard::new(self.capacity)
            }
        }
    }

    async fn persist(&self, board: &Leaderboard) -> Result<(), StorageError> {
        let blob = encode_board(board.entries())?;
        self.store.put(&self.key, &blob).await?;
        Ok(())
    }
}
