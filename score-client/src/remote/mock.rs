//! Mock remote store for testing.
//!
//! Allows seeding documents, capturing pushes, and forcing failures for
//! verification.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use score_types::{EntryId, PlayerId, ScoreEntry};

use super::{RemoteAck, RemoteDoc, RemoteError, RemoteStore};

/// Timestamp the mock stamps on the first acknowledged push.
const MOCK_CLOCK_BASE: i64 = 1_700_000_000_000;

/// Mock remote store for testing.
///
/// Keeps one document collection per player, assigns deterministic ids
/// (`remote-1`, `remote-2`, ...), and supports forced failures per
/// operation plus per-document delete failures.
#[derive(Debug, Default)]
pub struct MockRemote {
    inner: Arc<Mutex<MockRemoteInner>>,
}

#[derive(Debug, Default)]
struct MockRemoteInner {
    collections: HashMap<PlayerId, Vec<RemoteDoc>>,
    pushed: Vec<(PlayerId, ScoreEntry)>,
    next_id: u64,
    fail_next_push: Option<RemoteError>,
    fail_next_fetch: Option<RemoteError>,
    fail_next_delete_all: Option<RemoteError>,
    fail_delete_ids: HashSet<EntryId>,
}

impl MockRemote {
    /// Create a new mock remote store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document into the player's collection.
    pub fn seed_doc(&self, player: &PlayerId, doc: RemoteDoc) {
        let mut inner = self.inner.lock().unwrap();
        inner.collections.entry(player.clone()).or_default().push(doc);
    }

    /// The documents currently in the player's collection.
    pub fn docs(&self, player: &PlayerId) -> Vec<RemoteDoc> {
        let inner = self.inner.lock().unwrap();
        inner.collections.get(player).cloned().unwrap_or_default()
    }

    /// All entries that were pushed, with the player they were pushed for.
    pub fn pushed(&self) -> Vec<(PlayerId, ScoreEntry)> {
        let inner = self.inner.lock().unwrap();
        inner.pushed.clone()
    }

    /// Cause the next `push()` to fail with the given error.
    pub fn fail_next_push(&self, error: RemoteError) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_push = Some(error);
    }

    /// Cause the next `fetch_all()` to fail with the given error.
    pub fn fail_next_fetch(&self, error: RemoteError) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_fetch = Some(error);
    }

    /// Cause the next `delete_all()` to fail outright with the given error.
    pub fn fail_next_delete_all(&self, error: RemoteError) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_delete_all = Some(error);
    }

    /// Cause every delete of the given document to fail.
    ///
    /// The document stays in the collection, so a retried wipe sees it
    /// again.
    pub fn fail_delete(&self, id: EntryId) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_delete_ids.insert(id);
    }
}

impl Clone for MockRemote {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl RemoteStore for MockRemote {
    async fn push(&self, player: &PlayerId, entry: &ScoreEntry) -> Result<RemoteAck, RemoteError> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(error) = inner.fail_next_push.take() {
            return Err(error);
        }

        inner.next_id += 1;
        let id = EntryId::from_remote(format!("remote-{}", inner.next_id));
        let recorded_at = MOCK_CLOCK_BASE + inner.next_id as i64;

        let doc = RemoteDoc {
            id: id.clone(),
            fields: serde_json::json!({
                "score": entry.value,
                "recordedAtLocal": entry.recorded_at_local,
                "recordedAtRemote": recorded_at,
            }),
        };
        inner.collections.entry(player.clone()).or_default().push(doc);
        inner.pushed.push((player.clone(), entry.clone()));

        Ok(RemoteAck { id, recorded_at })
    }

    async fn fetch_all(&self, player: &PlayerId) -> Result<Vec<RemoteDoc>, RemoteError> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(error) = inner.fail_next_fetch.take() {
            return Err(error);
        }

        Ok(inner.collections.get(player).cloned().unwrap_or_default())
    }

    async fn delete_all(
        &self,
        player: &PlayerId,
    ) -> Result<Vec<(EntryId, Result<(), RemoteError>)>, RemoteError> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(error) = inner.fail_next_delete_all.take() {
            return Err(error);
        }

        let docs = inner.collections.remove(player).unwrap_or_default();
        let mut survivors = Vec::new();
        let mut results = Vec::new();

        for doc in docs {
            if inner.fail_delete_ids.contains(&doc.id) {
                results.push((
                    doc.id.clone(),
                    Err(RemoteError::Rejected("delete refused".into())),
                ));
                survivors.push(doc);
            } else {
                results.push((doc.id, Ok(())));
            }
        }

        if !survivors.is_empty() {
            inner.collections.insert(player.clone(), survivors);
        }

        Ok(results)
    }
}
