//! # score-types
//!
//! Foundational types for the scorekeep leaderboard engine.
//!
//! This crate provides the types shared across all scorekeep crates:
//! - [`EntryId`], [`PlayerId`] - Identity types
//! - [`ScoreEntry`] - A single recorded score
//! - [`encode_board`], [`decode_board`] - The persisted leaderboard codec
//! - [`CodecError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod entry;
mod error;
mod ids;

pub use entry::{decode_board, encode_board, ScoreEntry};
pub use error::CodecError;
pub use ids::{EntryId, PlayerId};
