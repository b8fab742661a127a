// ── Store connection configuration ──

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use kennel_api::{TlsMode, TransportConfig};

/// TLS verification mode (core-level mirror of the api crate's TlsMode).
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (for self-signed stores).
    DangerAcceptInvalid,
}

/// Connection settings for one record store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the record store (e.g. `https://dogs.example.com`).
    pub url: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Periodic background refresh interval; 0 disables it.
    pub refresh_interval_secs: u64,
}

impl StoreConfig {
    /// Minimal config for a given URL: system TLS, 30s timeout, no
    /// periodic refresh.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::System,
            timeout: Duration::from_secs(30),
            refresh_interval_secs: 0,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::System => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
