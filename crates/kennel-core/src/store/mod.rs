// ── Reactive collection store ──
//
// Holds the current collection snapshot and the loading flag. Mutations
// are broadcast to subscribers via `watch` channels. The collection is
// always replaced wholesale in store order — there is no incremental
// reconciliation, because the remote store is the sole source of truth.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::{DogRecord, RecordId};
use crate::stream::SnapshotStream;

/// Reactive store for the dog collection.
///
/// Publishes an ordered snapshot (`Arc<Vec<Arc<DogRecord>>>`) plus a
/// loading flag. Soft-deleted records never appear in the published
/// snapshot: `apply_snapshot` filters them regardless of whether the
/// store already excluded them.
pub struct CollectionStore {
    dogs: watch::Sender<Arc<Vec<Arc<DogRecord>>>>,
    loading: watch::Sender<bool>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl CollectionStore {
    pub fn new() -> Self {
        let (dogs, _) = watch::channel(Arc::new(Vec::new()));
        let (loading, _) = watch::channel(false);
        let (last_refresh, _) = watch::channel(None);

        Self {
            dogs,
            loading,
            last_refresh,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    /// The current snapshot (cheap `Arc` clone), in store order.
    pub fn dogs_snapshot(&self) -> Arc<Vec<Arc<DogRecord>>> {
        self.dogs.borrow().clone()
    }

    /// Look up a record by id in the current snapshot.
    pub fn dog_by_id(&self, id: &RecordId) -> Option<Arc<DogRecord>> {
        self.dogs
            .borrow()
            .iter()
            .find(|d| d.id == *id)
            .map(Arc::clone)
    }

    pub fn dog_count(&self) -> usize {
        self.dogs.borrow().len()
    }

    /// Whether a refresh is currently in flight.
    pub fn loading(&self) -> bool {
        *self.loading.borrow()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_dogs(&self) -> SnapshotStream<DogRecord> {
        SnapshotStream::new(self.dogs.subscribe())
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// How long ago the last refresh landed, or `None` if never refreshed.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }

    // ── Mutation (crate-internal; the Controller is the only writer) ─

    /// Replace the collection with a freshly fetched sequence.
    ///
    /// Store order is preserved; soft-deleted records are dropped here so
    /// the view layer never sees them.
    pub(crate) fn apply_snapshot(&self, dogs: Vec<DogRecord>) {
        let values: Vec<Arc<DogRecord>> = dogs
            .into_iter()
            .filter(|d| !d.deleted)
            .map(Arc::new)
            .collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.dogs.send_modify(|snap| *snap = Arc::new(values));
        self.last_refresh
            .send_modify(|t| *t = Some(Utc::now()));
    }

    pub(crate) fn set_loading(&self, value: bool) {
        self.loading.send_modify(|l| *l = value);
    }
}

impl Default for CollectionStore {
    fn default() -> Self {
        Self::new()
    }
}
