// ── Dog record domain type ──

use serde::{Deserialize, Serialize};

use super::record_id::RecordId;

/// The canonical dog record.
///
/// `deleted` records exist in the store (soft delete) but are filtered
/// out of every snapshot the collection publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DogRecord {
    pub id: RecordId,
    pub name: String,
    pub breed: String,
    /// Age in years, 0–30.
    pub age: Option<u8>,
    pub color: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub is_favorite: bool,
    pub deleted: bool,
}
