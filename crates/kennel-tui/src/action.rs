//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;
use std::sync::Arc;

use kennel_core::{DogFields, DogRecord, FormMode, RecordId};

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Pending confirmation action.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    RemoveDog { id: RecordId, name: String },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoveDog { name, .. } => {
                write!(f, "Remove {name} from your collection?")
            }
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Data Events (from kennel-core streams) ────────────────────
    DogsUpdated(Arc<Vec<Arc<DogRecord>>>),
    LoadingChanged(bool),

    // ── Collection intents ────────────────────────────────────────
    OpenCreateForm,
    OpenEditForm(RecordId),
    RequestRemove(RecordId),
    RequestToggleFavorite(RecordId),
    RequestRefresh,

    // ── Form ──────────────────────────────────────────────────────
    /// Validated submission handed off for the remote call.
    SubmitForm { mode: FormMode, fields: DogFields },
    /// Outcome of the remote call: success toast text, or error text for
    /// the inline form error line.
    FormSubmitResult(Result<String, String>),
    CloseForm,

    // ── Confirm Dialog ────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Help ──────────────────────────────────────────────────────
    ToggleHelp,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}
