// ── Record form controller ──
//
// State machine behind the add/edit modal:
//
//   Closed ── open_for_create / open_for_edit ──▶ Editing
//   Editing ── begin_submit (valid) ──▶ Submitting
//   Submitting ── submit_succeeded ──▶ Closed
//   Submitting ── submit_failed ──▶ Editing (values intact)
//   any ── cancel ──▶ Closed
//
// `Submitting` is an explicit state so a second Enter while a create is
// in flight cannot issue a duplicate remote call.

use crate::model::{DogDraft, DogFields, DogRecord, RecordId, ValidationError};

/// What a successful submit should do remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

/// Lifecycle of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Closed,
    Editing,
    Submitting,
}

/// The record form: edit buffer, mode, and lifecycle state.
#[derive(Debug, Clone, Default)]
pub struct FormModel {
    state: FormState,
    mode: Option<FormMode>,
    draft: DogDraft,
    error: Option<ValidationError>,
}

impl FormModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != FormState::Closed
    }

    pub fn is_submitting(&self) -> bool {
        self.state == FormState::Submitting
    }

    /// The active mode while open; `None` when closed.
    pub fn mode(&self) -> Option<&FormMode> {
        self.mode.as_ref()
    }

    pub fn draft(&self) -> &DogDraft {
        &self.draft
    }

    /// Mutable buffer access for the editing UI. Editing clears the
    /// retained validation error — the user is fixing it.
    pub fn draft_mut(&mut self) -> &mut DogDraft {
        self.error = None;
        &mut self.draft
    }

    /// The validation error from the last rejected submit, if any.
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Open with an empty buffer, mode = create.
    pub fn open_for_create(&mut self) {
        self.state = FormState::Editing;
        self.mode = Some(FormMode::Create);
        self.draft = DogDraft::default();
        self.error = None;
    }

    /// Open with all editable fields of `record` copied into the buffer,
    /// mode = edit.
    pub fn open_for_edit(&mut self, record: &DogRecord) {
        self.state = FormState::Editing;
        self.mode = Some(FormMode::Edit(record.id.clone()));
        self.draft = DogDraft::from_record(record);
        self.error = None;
    }

    /// Discard the buffer and close. No side effects: nothing was and
    /// nothing will be written remotely.
    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Validate the buffer and move to `Submitting`.
    ///
    /// Returns the mode and validated fields for the remote call, or
    /// `None` when no submission should start: the form is closed, a
    /// submission is already in flight (the double-submit guard), or
    /// validation failed — in which case the error is retained for
    /// inline display and the state stays `Editing`.
    pub fn begin_submit(&mut self) -> Option<(FormMode, DogFields)> {
        if self.state != FormState::Editing {
            return None;
        }
        let mode = self.mode.clone()?;
        match self.draft.validate() {
            Ok(fields) => {
                self.error = None;
                self.state = FormState::Submitting;
                Some((mode, fields))
            }
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }

    /// The remote call succeeded: close and clear the buffer.
    pub fn submit_succeeded(&mut self) {
        if self.state == FormState::Submitting {
            *self = Self::default();
        }
    }

    /// The remote call failed: back to editing with entered values intact.
    pub fn submit_failed(&mut self) {
        if self.state == FormState::Submitting {
            self.state = FormState::Editing;
        }
    }
}
