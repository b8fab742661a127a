//! Shared configuration for the kennel terminal UI.
//!
//! TOML profiles merged with `KENNEL_*` environment variables, and
//! translation to `kennel_core::StoreConfig`. Profiles carry no
//! credentials — the record store is unauthenticated.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use kennel_core::{StoreConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}' in the config file")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named store profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Periodic background refresh in seconds; 0 disables it.
    #[serde(default)]
    pub refresh_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
            refresh_interval: 0,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named record-store profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Store base URL (e.g., "https://dogs.example.com").
    pub server: String,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override periodic refresh interval (seconds).
    pub refresh_interval: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("rs", "kennel", "kennel").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("kennel");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_from(&config_path())
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

fn load_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("KENNEL_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_to(cfg, &config_path())
}

fn save_to(cfg: &Config, path: &std::path::Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to StoreConfig ──────────────────────────────────────

/// Build a `StoreConfig` from a profile plus the global defaults.
pub fn profile_to_store_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<StoreConfig, ConfigError> {
    let url = profile
        .server
        .parse::<url::Url>()
        .map_err(|e| ConfigError::Validation {
            field: "server".into(),
            reason: e.to_string(),
        })?;

    let insecure = profile.insecure.unwrap_or(defaults.insecure);
    let tls = if insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca) = profile.ca_cert {
        TlsVerification::CustomCa(ca.clone())
    } else {
        TlsVerification::System
    };

    Ok(StoreConfig {
        url,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        refresh_interval_secs: profile.refresh_interval.unwrap_or(defaults.refresh_interval),
    })
}

/// Resolve the named (or default) profile from a loaded config and
/// translate it.
pub fn resolve_store_config(
    cfg: &Config,
    profile_name: Option<&str>,
) -> Result<StoreConfig, ConfigError> {
    let name = profile_name
        .or(cfg.default_profile.as_deref())
        .unwrap_or("default");
    let profile = cfg
        .profiles
        .get(name)
        .ok_or_else(|| ConfigError::UnknownProfile {
            profile: name.into(),
        })?;
    profile_to_store_config(profile, &cfg.defaults)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
        assert_eq!(cfg.defaults.timeout, 30);
    }

    #[test]
    fn profile_round_trips_through_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "home".into(),
            Profile {
                server: "https://dogs.example.com".into(),
                ca_cert: None,
                insecure: Some(true),
                timeout: Some(5),
                refresh_interval: Some(60),
            },
        );
        cfg.default_profile = Some("home".into());
        save_to(&cfg, &path).unwrap();

        let loaded = load_from(&path).unwrap();
        let profile = loaded.profiles.get("home").unwrap();
        assert_eq!(profile.server, "https://dogs.example.com");
        assert_eq!(profile.insecure, Some(true));
        assert_eq!(profile.refresh_interval, Some(60));
    }

    #[test]
    fn profile_overrides_win_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            default_profile = "home"

            [defaults]
            timeout = 10

            [profiles.home]
            server = "https://dogs.example.com"
            timeout = 5
            "#,
        );

        let cfg = load_from(&path).unwrap();
        let store = resolve_store_config(&cfg, None).unwrap();
        assert_eq!(store.timeout, Duration::from_secs(5));
        assert_eq!(store.url.as_str(), "https://dogs.example.com/");
    }

    #[test]
    fn invalid_server_url_is_a_validation_error() {
        let profile = Profile {
            server: "not a url".into(),
            ca_cert: None,
            insecure: None,
            timeout: None,
            refresh_interval: None,
        };
        let err = profile_to_store_config(&profile, &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        let err = resolve_store_config(&cfg, Some("nope")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile { .. }));
    }
}
