// ── Domain model ──

mod dog;
mod draft;
mod record_id;

pub use dog::DogRecord;
pub use draft::{DogDraft, DogFields, Field, MAX_AGE_YEARS, ValidationError};
pub use record_id::RecordId;
