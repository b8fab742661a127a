// Wire types for the record store API.
//
// The store speaks camelCase JSON. List responses are wrapped in a
// `{success, data}` envelope; create/update return the record directly.

use serde::{Deserialize, Serialize};

/// Envelope returned by collection (list) endpoints.
///
/// The store can flag a failed operation inside an HTTP 200, so `success`
/// must be checked before `data` is trusted.
#[derive(Debug, Deserialize)]
pub struct ListEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// A dog record as the store returns it.
///
/// Older store deployments emit Mongo-style `_id`; the alias accepts both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DogResource {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub breed: String,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub deleted: bool,
}

/// Partial write body for create and update.
///
/// Only populated fields are serialized, so a single-field update (e.g.
/// the soft-delete marker) sends exactly that field and nothing else.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DogWrite {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

impl DogWrite {
    /// A write that marks the record soft-deleted and touches nothing else.
    pub fn soft_delete() -> Self {
        Self {
            deleted: Some(true),
            ..Self::default()
        }
    }

    /// A write that sets the favorite flag and touches nothing else.
    pub fn favorite(value: bool) -> Self {
        Self {
            is_favorite: Some(value),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn soft_delete_serializes_single_field() {
        let body = serde_json::to_value(DogWrite::soft_delete()).unwrap();
        assert_eq!(body, serde_json::json!({ "deleted": true }));
    }

    #[test]
    fn favorite_serializes_single_field() {
        let body = serde_json::to_value(DogWrite::favorite(false)).unwrap();
        assert_eq!(body, serde_json::json!({ "isFavorite": false }));
    }

    #[test]
    fn resource_accepts_mongo_style_id() {
        let dog: DogResource = serde_json::from_value(serde_json::json!({
            "_id": "68a1f2c3d4e5f60718293a4b",
            "name": "Buddy",
            "breed": "Golden Retriever",
        }))
        .unwrap();
        assert_eq!(dog.id, "68a1f2c3d4e5f60718293a4b");
        assert!(!dog.is_favorite);
        assert!(!dog.deleted);
    }

    #[test]
    fn resource_reads_camel_case_fields() {
        let dog: DogResource = serde_json::from_value(serde_json::json!({
            "id": "1",
            "name": "Luna",
            "breed": "Husky",
            "imageUrl": "https://example.com/luna.jpg",
            "isFavorite": true,
        }))
        .unwrap();
        assert_eq!(dog.image_url.as_deref(), Some("https://example.com/luna.jpg"));
        assert!(dog.is_favorite);
    }
}
