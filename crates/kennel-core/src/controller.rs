// ── Collection state controller ──
//
// Owns the record store client and the reactive collection snapshot.
// Every mutation is a single remote round-trip followed by a wholesale
// refresh; there are no retries and no optimistic local edits. A failed
// operation leaves the previously published snapshot untouched.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use kennel_api::RecordClient;
use kennel_api::types::DogWrite;

use crate::config::StoreConfig;
use crate::convert;
use crate::error::CoreError;
use crate::model::{DogFields, DogRecord, RecordId};
use crate::store::CollectionStore;
use crate::stream::SnapshotStream;

const NOTICE_CHANNEL_SIZE: usize = 16;

// ── Notices ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Out-of-band message for the UI, used where an operation has no caller
/// left to return an error to (background refresh, post-mutation reload).
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

// ── Controller ───────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Holds the store client,
/// the reactive collection snapshot, and a notice channel for
/// out-of-band failures.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: StoreConfig,
    client: RecordClient,
    store: CollectionStore,
    notices: broadcast::Sender<Notice>,
}

/// Raises the loading flag for the duration of a refresh. Dropping the
/// guard clears the flag, so every exit path (success or error) releases
/// it.
struct LoadingGuard<'a> {
    store: &'a CollectionStore,
}

impl<'a> LoadingGuard<'a> {
    fn acquire(store: &'a CollectionStore) -> Self {
        store.set_loading(true);
        Self { store }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.store.set_loading(false);
    }
}

impl Controller {
    /// Create a new Controller from configuration. Builds the HTTP client
    /// but performs no request — call [`refresh()`](Self::refresh) for the
    /// initial load.
    pub fn new(config: StoreConfig) -> Result<Self, CoreError> {
        let client = RecordClient::new(config.url.as_str(), &config.transport())?;
        let (notices, _) = broadcast::channel(NOTICE_CHANNEL_SIZE);

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                client,
                store: CollectionStore::new(),
                notices,
            }),
        })
    }

    /// Access the controller configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Access the underlying CollectionStore.
    pub fn store(&self) -> &CollectionStore {
        &self.inner.store
    }

    /// Subscribe to out-of-band notices.
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notices.subscribe()
    }

    // ── Snapshot / stream accessors (delegate to the store) ──────────

    pub fn dogs_snapshot(&self) -> Arc<Vec<Arc<DogRecord>>> {
        self.inner.store.dogs_snapshot()
    }

    pub fn dogs(&self) -> SnapshotStream<DogRecord> {
        self.inner.store.subscribe_dogs()
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Fetch the collection from the store and publish it wholesale,
    /// preserving store order.
    ///
    /// On failure the previously published snapshot is left untouched.
    /// The loading flag is cleared on every exit path.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let _loading = LoadingGuard::acquire(&self.inner.store);

        let records = self.inner.client.list_dogs().await?;
        let dogs: Vec<DogRecord> = records.into_iter().map(DogRecord::from).collect();

        debug!(count = dogs.len(), "collection refreshed");
        self.inner.store.apply_snapshot(dogs);
        Ok(())
    }

    /// Create a new record from validated fields, then reload the
    /// collection. Returns the record as stored, including its id.
    pub async fn create(&self, fields: &DogFields) -> Result<DogRecord, CoreError> {
        fields.ensure_valid()?;

        let created = self
            .inner
            .client
            .create_dog(&convert::write_from_fields(fields))
            .await?;
        let record = DogRecord::from(created);
        info!(id = %record.id, name = %record.name, "dog created");

        self.refresh_after_mutation().await;
        Ok(record)
    }

    /// Replace the editable fields of an existing record, then reload
    /// the collection.
    pub async fn update(&self, id: &RecordId, fields: &DogFields) -> Result<DogRecord, CoreError> {
        fields.ensure_valid()?;

        let updated = self
            .inner
            .client
            .update_dog(&id.to_string(), &convert::write_from_fields(fields))
            .await?;
        let record = DogRecord::from(updated);
        info!(id = %record.id, "dog updated");

        self.refresh_after_mutation().await;
        Ok(record)
    }

    /// Soft-delete a record (`deleted: true`), then reload the
    /// collection. The record is never physically destroyed.
    pub async fn remove(&self, id: &RecordId) -> Result<(), CoreError> {
        self.inner
            .client
            .update_dog(&id.to_string(), &DogWrite::soft_delete())
            .await?;
        info!(%id, "dog soft-deleted");

        self.refresh_after_mutation().await;
        Ok(())
    }

    /// Flip exactly the favorite flag of `record`, then reload the
    /// collection. No optimistic local mutation: the snapshot changes
    /// only once the refresh lands.
    pub async fn toggle_favorite(&self, record: &DogRecord) -> Result<(), CoreError> {
        self.inner
            .client
            .update_dog(
                &record.id.to_string(),
                &DogWrite::favorite(!record.is_favorite),
            )
            .await?;
        info!(id = %record.id, favorite = !record.is_favorite, "favorite toggled");

        self.refresh_after_mutation().await;
        Ok(())
    }

    /// Reload after a committed mutation.
    ///
    /// The mutation already succeeded, so a refresh failure must not fail
    /// it — it is reported on the notice channel instead, and the stale
    /// snapshot stays published until the next successful refresh.
    async fn refresh_after_mutation(&self) {
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "post-mutation refresh failed");
            let _ = self
                .inner
                .notices
                .send(Notice::error(format!("Failed to reload dogs: {e}")));
        }
    }

    // ── Background refresh ───────────────────────────────────────────

    /// Spawn the periodic refresh task, if the config enables it
    /// (`refresh_interval_secs > 0`). Cancelled through `cancel`.
    pub fn spawn_refresh_task(&self, cancel: CancellationToken) -> Option<JoinHandle<()>> {
        let interval_secs = self.inner.config.refresh_interval_secs;
        if interval_secs == 0 {
            return None;
        }
        let ctrl = self.clone();
        Some(tokio::spawn(refresh_task(ctrl, interval_secs, cancel)))
    }
}

/// Periodic background refresh. Failures are reported as notices and do
/// not stop the task; the next tick tries again.
async fn refresh_task(ctrl: Controller, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first tick completes immediately; the initial load is the data
    // bridge's job, so skip it.
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = ctrl.refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                    let _ = ctrl
                        .inner
                        .notices
                        .send(Notice::error(format!("Failed to reload dogs: {e}")));
                }
            }
        }
    }
    debug!("refresh task stopped");
}
