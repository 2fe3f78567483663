//! Bounded ordered leaderboard with deterministic merge.
//!
//! This module provides the in-memory leaderboard with:
//! - Ordering by score descending, ties broken by most recent first
//! - Deduplication by entry id
//! - A capacity bound to prevent unbounded growth
//!
//! The merge is used both when a single score is recorded locally and when
//! a set of remote entries is reconciled against the local board. It is
//! idempotent: merging the same set twice yields the same board as merging
//! it once, which is what makes eventual consistency correct when remote
//! writes arrive out of order.

use std::cmp::Ordering;
use std::collections::HashMap;

use score_types::{EntryId, ScoreEntry};

/// Default maximum number of entries a leaderboard retains.
pub const DEFAULT_CAPACITY: usize = 20;

/// A bounded, ordered collection of score entries.
///
/// Invariants, restored after every mutation:
/// 1. Entries are unique by id.
/// 2. Entries are sorted by value descending, ties broken by
///    `recorded_at_local` descending (most recent wins).
/// 3. The board never exceeds its capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    /// Maximum number of entries retained after any mutation.
    capacity: usize,
    /// The ordered entries. Always satisfies the invariants above.
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    /// Create a new empty leaderboard with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    /// Build a leaderboard from an arbitrary sequence of entries.
    ///
    /// The input does not need to be sorted, deduplicated, or bounded -
    /// the invariants are restored before the board is returned.
    pub fn from_entries(capacity: usize, entries: Vec<ScoreEntry>) -> Self {
        let mut board = Self::new(capacity);
        board.merge(entries);
        board
    }

    /// Insert a single entry, restoring the invariants.
    ///
    /// If the board is full and the entry ranks below every member, it is
    /// evicted immediately.
    pub fn insert(&mut self, entry: ScoreEntry) {
        self.merge(std::iter::once(entry));
    }

    /// Merge a sequence of entries into the board.
    ///
    /// 1. Concatenate existing ∪ incoming, in that order.
    /// 2. Deduplicate by id: the copy carrying a remote acknowledgment wins
    ///    over a copy without one; between equally complete copies the one
    ///    observed last wins, so repeated merges are idempotent.
    /// 3. Sort by value descending, then `recorded_at_local` descending.
    /// 4. Truncate to capacity.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = ScoreEntry>) {
        let mut slots: HashMap<EntryId, usize> = HashMap::new();
        let mut merged: Vec<ScoreEntry> = Vec::new();

        for entry in self.entries.drain(..).chain(incoming) {
            match slots.get(&entry.id) {
                Some(&slot) => {
                    if entry.is_remote_acked() || !merged[slot].is_remote_acked() {
                        merged[slot] = entry;
                    }
                }
                None => {
                    slots.insert(entry.id.clone(), merged.len());
                    merged.push(entry);
                }
            }
        }

        // Stable sort: entries tied on both keys keep observation order,
        // so the result is deterministic.
        merged.sort_by(rank);
        merged.truncate(self.capacity);
        self.entries = merged;
    }

    /// The entries in rank order.
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Consume the board, returning the entries in rank order.
    pub fn into_entries(self) -> Vec<ScoreEntry> {
        self.entries
    }

    /// The configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries on the board.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the board is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Rank order: value descending, then most recent first.
fn rank(a: &ScoreEntry, b: &ScoreEntry) -> Ordering {
    b.value
        .cmp(&a.value)
        .then(b.recorded_at_local.cmp(&a.recorded_at_local))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, value: u32, at: i64) -> ScoreEntry {
        ScoreEntry {
            id: EntryId::from_remote(id),
            value,
            recorded_at_local: at,
            recorded_at_remote: None,
        }
    }

    fn values(board: &Leaderboard) -> Vec<u32> {
        board.entries().iter().map(|e| e.value).collect()
    }

    #[test]
    fn starts_empty() {
        let board = Leaderboard::default();
        assert!(board.is_empty());
        assert_eq!(board.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn insert_keeps_value_descending_order() {
        let mut board = Leaderboard::default();

        board.insert(entry("a", 90, 1));
        board.insert(entry("b", 100, 2));
        board.insert(entry("c", 95, 3));

        assert_eq!(values(&board), vec![100, 95, 90]);
    }

    #[test]
    fn ties_broken_by_most_recent_first() {
        let mut board = Leaderboard::default();

        board.insert(entry("old", 100, 1000));
        board.insert(entry("new", 100, 2000));

        assert_eq!(board.entries()[0].id.as_str(), "new");
        assert_eq!(board.entries()[1].id.as_str(), "old");
    }

    #[test]
    fn capacity_evicts_lowest_ranked() {
        let mut board = Leaderboard::new(3);
        for i in 1..=4 {
            board.insert(entry(&format!("e{}", i), i * 10, i as i64));
        }

        assert_eq!(board.len(), 3);
        assert_eq!(values(&board), vec![40, 30, 20]);
    }

    #[test]
    fn merge_dedups_by_id() {
        let mut board = Leaderboard::default();
        board.insert(entry("1", 100, 1000));

        board.merge(vec![entry("1", 100, 1000), entry("2", 90, 2000)]);

        assert_eq!(board.len(), 2);
        assert_eq!(values(&board), vec![100, 90]);
    }

    #[test]
    fn duplicate_id_never_yields_two_rows() {
        let mut board = Leaderboard::default();
        board.insert(entry("1", 100, 1000));

        // Same id, different value - still one row.
        board.merge(vec![entry("1", 55, 1000)]);

        assert_eq!(board.len(), 1);
    }

    #[test]
    fn merge_is_idempotent() {
        let remote = vec![
            entry("r1", 80, 100),
            entry("r2", 70, 200),
            entry("r3", 90, 300),
        ];

        let mut board = Leaderboard::default();
        board.insert(entry("local", 85, 50));

        board.merge(remote.clone());
        let once = board.clone();
        board.merge(remote);

        assert_eq!(board, once);
    }

    #[test]
    fn merging_25_distinct_keeps_top_20() {
        let incoming: Vec<_> = (1..=25)
            .map(|i| entry(&format!("s{}", i), i, i as i64))
            .collect();

        let board = Leaderboard::from_entries(DEFAULT_CAPACITY, incoming);

        assert_eq!(board.len(), 20);
        assert_eq!(board.entries()[0].value, 25);
        assert_eq!(board.entries()[19].value, 6);
        // The entry ranked 21st by value is gone.
        assert!(!board.entries().iter().any(|e| e.value == 5));
    }

    #[test]
    fn remote_acked_copy_wins_dedup() {
        let local = entry("1", 100, 1000);
        let acked = entry("1", 100, 1000).with_remote_ack(5000);

        // Acked copy arrives second.
        let mut board = Leaderboard::default();
        board.insert(local.clone());
        board.merge(vec![acked.clone()]);
        assert!(board.entries()[0].is_remote_acked());

        // Acked copy arrives first - still wins.
        let mut board = Leaderboard::default();
        board.insert(acked);
        board.merge(vec![local]);
        assert!(board.entries()[0].is_remote_acked());
    }

    #[test]
    fn equally_complete_duplicates_last_seen_wins() {
        let mut board = Leaderboard::default();
        board.insert(entry("1", 100, 1000));

        // Neither copy is acked; the incoming one wins.
        board.merge(vec![entry("1", 60, 1000)]);

        assert_eq!(board.entries()[0].value, 60);
    }

    #[test]
    fn from_entries_normalizes_input() {
        let board = Leaderboard::from_entries(
            2,
            vec![
                entry("a", 10, 1),
                entry("b", 30, 2),
                entry("a", 10, 1),
                entry("c", 20, 3),
            ],
        );

        assert_eq!(board.len(), 2);
        assert_eq!(values(&board), vec![30, 20]);
    }

    #[test]
    fn clear_removes_all() {
        let mut board = Leaderboard::default();
        board.insert(entry("a", 10, 1));
        board.insert(entry("b", 20, 2));

        board.clear();

        assert!(board.is_empty());
        assert_eq!(board.len(), 0);
    }

    #[test]
    fn into_entries_preserves_order() {
        let mut board = Leaderboard::default();
        board.insert(entry("a", 10, 1));
        board.insert(entry("b", 20, 2));

        let entries = board.into_entries();
        assert_eq!(entries[0].value, 20);
        assert_eq!(entries[1].value, 10);
    }
}
