//! Data bridge — connects [`Controller`] streams to TUI actions.
//!
//! Runs as a background task: performs the initial load, then forwards
//! every snapshot change, loading-flag change, and controller notice as
//! an [`Action`] through the TUI's action channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use kennel_core::{Controller, NoticeLevel};

use crate::action::{Action, Notification};

/// Spawn the data bridge connecting [`Controller`] reactive streams to
/// the TUI. Shuts down cleanly on cancellation.
pub async fn spawn_data_bridge(
    controller: Controller,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    // Initial load — the grid shows its loading state meanwhile.
    if let Err(e) = controller.refresh().await {
        warn!(error = %e, "initial load failed");
        let _ = action_tx.send(Action::Notify(Notification::error(format!(
            "Failed to load dogs: {e}"
        ))));
    }

    let mut dogs = controller.dogs();
    let mut loading = controller.store().subscribe_loading();
    let mut notices = controller.notices();

    // Push the initial snapshot so the grid has data immediately
    let _ = action_tx.send(Action::DogsUpdated(dogs.current().clone()));
    let _ = action_tx.send(Action::LoadingChanged(*loading.borrow_and_update()));

    // Periodic background refresh, if the config enables it.
    let refresh_handle = controller.spawn_refresh_task(cancel.child_token());

    // Stream loop — forward every change until cancelled
    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(snapshot) = dogs.changed() => {
                let _ = action_tx.send(Action::DogsUpdated(snapshot));
            }
            Ok(()) = loading.changed() => {
                let _ = action_tx.send(Action::LoadingChanged(*loading.borrow_and_update()));
            }
            Ok(notice) = notices.recv() => {
                let notification = match notice.level {
                    NoticeLevel::Info => Notification::info(notice.message),
                    NoticeLevel::Warning => Notification::warning(notice.message),
                    NoticeLevel::Error => Notification::error(notice.message),
                };
                let _ = action_tx.send(Action::Notify(notification));
            }
        }
    }

    if let Some(handle) = refresh_handle {
        let _ = handle.await;
    }
    debug!("data bridge shut down");
}
