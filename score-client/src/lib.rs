//! # score-client
//!
//! Score reconciliation engine for scorekeep.
//!
//! This is the crate applications embed. [`ScoreReconciler`] coordinates
//! the durable local ledger with an injected remote store adapter: scores
//! are persisted locally first (the durability guarantee), then synced to
//! the remote store best-effort. Remote unavailability degrades the engine
//! to local-only data; it never breaks the caller-visible flow.
//!
//! ## Example
//!
//! ```ignore
//! use score_client::{MockRemote, ScoreReconciler};
//! use score_store::{LocalLedger, MemoryStore};
//! use score_types::PlayerId;
//!
//! let ledger = LocalLedger::new(MemoryStore::new());
//! let reconciler = ScoreReconciler::new(ledger, MockRemote::new());
//!
//! let player = PlayerId::new("user-42");
//! let outcome = reconciler.submit(120, Some(&player)).await?;
//! let board = reconciler.fetch_leaderboard(Some(&player)).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod reconciler;
pub mod remote;

pub use reconciler::{
    ClientError, RemoteSync, RemoteWipe, ScoreReconciler, SubmitOutcome, WipeFailure,
};
pub use remote::{MockRemote, RemoteAck, RemoteDoc, RemoteError, RemoteStore};
