// kennel-core: domain model, collection state, and form logic.
//
// The two controllers the UI talks to live here:
//   - `Controller` owns the collection snapshot and every remote mutation
//     (refresh, create, update, soft-delete, favorite toggle).
//   - `FormModel` owns the record form's edit buffer and state machine.
//
// Consumers subscribe to snapshot changes through `SnapshotStream` and
// render whatever the store last published; the remote record store is
// the sole source of truth.

pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod model;
pub mod store;
pub mod stream;

mod convert;

pub use config::{StoreConfig, TlsVerification};
pub use controller::{Controller, Notice, NoticeLevel};
pub use error::CoreError;
pub use form::{FormMode, FormModel, FormState};
pub use model::{DogDraft, DogFields, DogRecord, Field, RecordId, ValidationError};
pub use store::CollectionStore;
pub use stream::SnapshotStream;
