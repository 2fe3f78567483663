//! # score-store
//!
//! Durable local leaderboard storage for scorekeep.
//!
//! This crate owns the persistence side of the engine:
//! - [`KvStore`] - the injected durable key-value blob store contract
//! - [`MemoryStore`] - a thread-safe in-memory implementation
//! - [`LocalLedger`] - the bounded, ordered leaderboard persisted through
//!   a [`KvStore`] handle
//!
//! The ledger's persisted state is always a valid leaderboard (sorted,
//! deduplicated, capacity-bounded); the invariant is restored on every
//! write, not just on read. A missing or corrupt blob is recovered as an
//! empty board and never surfaces as an error.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ledger;
mod store;

pub use error::{StorageError, StoreError};
pub use ledger::{LocalLedger, DEFAULT_BOARD_KEY};
pub use store::{KvStore, MemoryStore};
