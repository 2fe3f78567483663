//! Score records and the persisted leaderboard codec.
//!
//! A leaderboard is persisted as a JSON array of entry objects. The wire
//! field for the score is `score` (the historical name), with `value`
//! accepted as an alias on input. `recordedAtRemote` is omitted entirely
//! for local-only entries so the blob round-trips exactly.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{CodecError, EntryId};

/// A single recorded quiz result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Unique identifier within any materialized leaderboard.
    pub id: EntryId,
    /// The score. Non-negative by construction.
    #[serde(rename = "score", alias = "value")]
    pub value: u32,
    /// Milliseconds since epoch at creation time. The ordering tiebreaker,
    /// and a stable surrogate when no remote timestamp exists.
    #[serde(rename = "recordedAtLocal")]
    pub recorded_at_local: i64,
    /// Populated once the remote store acknowledges the write; absent for
    /// local-only entries.
    #[serde(
        rename = "recordedAtRemote",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub recorded_at_remote: Option<i64>,
}

impl ScoreEntry {
    /// Create a new locally recorded entry with a fresh id and the current
    /// local timestamp.
    pub fn new_local(value: u32) -> Self {
        Self {
            id: EntryId::generate(),
            value,
            recorded_at_local: now_millis(),
            recorded_at_remote: None,
        }
    }

    /// Attach the remote acknowledgment timestamp.
    ///
    /// The only mutation an entry sees after creation.
    pub fn with_remote_ack(mut self, recorded_at: i64) -> Self {
        self.recorded_at_remote = Some(recorded_at);
        self
    }

    /// Whether the remote store has acknowledged this entry.
    pub fn is_remote_acked(&self) -> bool {
        self.recorded_at_remote.is_some()
    }

    /// Parse a document-shaped remote record.
    ///
    /// The remote store keeps the id outside the field payload, so it is
    /// supplied separately. Returns `None` when a required field is missing
    /// or malformed - a single bad document must never abort a whole fetch.
    pub fn from_document(id: EntryId, fields: &serde_json::Value) -> Option<Self> {
        let value = fields
            .get("score")
            .or_else(|| fields.get("value"))?
            .as_u64()?;
        let value = u32::try_from(value).ok()?;
        let recorded_at_local = fields.get("recordedAtLocal")?.as_i64()?;
        let recorded_at_remote = fields.get("recordedAtRemote").and_then(|v| v.as_i64());
        Some(Self {
            id,
            value,
            recorded_at_local,
            recorded_at_remote,
        })
    }
}

/// Serialize a leaderboard to its persisted JSON blob.
pub fn encode_board(entries: &[ScoreEntry]) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(entries).map_err(CodecError::Serialization)
}

/// Deserialize a leaderboard from its persisted JSON blob.
pub fn decode_board(bytes: &[u8]) -> Result<Vec<ScoreEntry>, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Deserialization)
}

/// Current wall-clock time in milliseconds since the Unix epoch.
fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_millis() as i64
}
