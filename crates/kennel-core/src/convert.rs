// ── Wire ↔ domain conversion ──
//
// The api crate speaks the store's JSON shapes; everything above it
// speaks domain types. All translation lives here.

use kennel_api::types::{DogResource, DogWrite};

use crate::model::{DogFields, DogRecord, RecordId};

impl From<DogResource> for DogRecord {
    fn from(res: DogResource) -> Self {
        Self {
            id: RecordId::from(res.id),
            name: res.name,
            breed: res.breed,
            age: res.age,
            color: res.color,
            image_url: res.image_url,
            description: res.description,
            is_favorite: res.is_favorite,
            deleted: res.deleted,
        }
    }
}

/// Build the write body for a full-field create or update.
///
/// `deleted` is intentionally absent: the form never touches the
/// soft-delete marker.
pub(crate) fn write_from_fields(fields: &DogFields) -> DogWrite {
    DogWrite {
        name: Some(fields.name.clone()),
        breed: Some(fields.breed.clone()),
        age: fields.age,
        color: fields.color.clone(),
        image_url: fields.image_url.clone(),
        description: fields.description.clone(),
        is_favorite: Some(fields.is_favorite),
        deleted: None,
    }
}
