// Hand-crafted async HTTP client for the kennel record store.
//
// Base path: /api/
// Endpoints: v1/dogs (list/create), v1/dogs/{id} (update)

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::types::{DogResource, DogWrite, ListEnvelope};

// ── Error response shape from the record store ───────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the kennel record store API.
///
/// Communicates via JSON REST endpoints under `/api/`.
pub struct RecordClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RecordClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    pub fn new(base_url: &str, transport: &crate::TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages transport).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Build the base URL with a trailing `/api/` segment.
    ///
    /// Accepts `https://host`, `https://host/`, and `https://host/api`
    /// uniformly.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;

        // Strip trailing slash for uniform handling
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"v1/dogs"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        // base_url always ends with `/api/`, so joining `v1/…` works.
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PATCH {url}");

        let resp = self.http.patch(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
            Error::Api {
                status: status.as_u16(),
                message: err.message.unwrap_or_else(|| status.to_string()),
                code: err.code,
            }
        } else {
            Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            }
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Fetch all dog records, in the order the store returns them.
    ///
    /// The store wraps list responses in a `{success, data}` envelope;
    /// `success: false` is surfaced as [`Error::Rejected`] even when the
    /// HTTP status is 200.
    pub async fn list_dogs(&self) -> Result<Vec<DogResource>, Error> {
        let envelope: ListEnvelope<DogResource> = self.get("v1/dogs").await?;
        if envelope.success {
            Ok(envelope.data)
        } else {
            Err(Error::Rejected {
                message: envelope
                    .message
                    .unwrap_or_else(|| "list rejected by store".into()),
            })
        }
    }

    /// Create a new dog record. Returns the record as stored, including
    /// the assigned id.
    pub async fn create_dog(&self, fields: &DogWrite) -> Result<DogResource, Error> {
        self.post("v1/dogs", fields).await
    }

    /// Apply a partial update to an existing record. Only the fields
    /// populated in `fields` are sent; the store returns the full updated
    /// record.
    pub async fn update_dog(&self, id: &str, fields: &DogWrite) -> Result<DogResource, Error> {
        self.patch(&format!("v1/dogs/{id}"), fields).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalize_appends_api_segment() {
        let url = RecordClient::normalize_base_url("https://dogs.example.com").unwrap();
        assert_eq!(url.as_str(), "https://dogs.example.com/api/");
    }

    #[test]
    fn normalize_keeps_existing_api_segment() {
        let url = RecordClient::normalize_base_url("https://dogs.example.com/api/").unwrap();
        assert_eq!(url.as_str(), "https://dogs.example.com/api/");
    }

    #[test]
    fn normalize_preserves_path_prefix() {
        let url = RecordClient::normalize_base_url("https://example.com/kennel").unwrap();
        assert_eq!(url.as_str(), "https://example.com/kennel/api/");
    }
}
