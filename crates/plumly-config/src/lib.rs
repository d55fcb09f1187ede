//! Configuration for plumly.
//!
//! TOML config file, `PLUMLY_` environment overrides, credential resolution
//! (env + keyring + plaintext) and translation to
//! `plumly_core::PlatformConfig`. The core never reads files; this crate
//! does it on the host's behalf.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use plumly_core::{DEFAULT_CLOUD_URL, DISCOVERY_PORT, PlatformConfig, TlsVerification};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keyring service name; the account is the cloud username.
pub const KEYRING_SERVICE: &str = "plumly";

/// Environment variable consulted for the cloud password.
pub const PASSWORD_ENV: &str = "PLUMLY_PASSWORD";

const ENV_PREFIX: &str = "PLUMLY_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no cloud username configured")]
    NoUsername,

    #[error("no password found for '{username}'")]
    NoPassword { username: String },

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

// ── TOML config ─────────────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Plum cloud account (email).
    pub username: Option<String>,

    /// Cloud password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name holding the cloud password.
    pub password_env: Option<String>,

    #[serde(default = "default_cloud_url")]
    pub cloud_url: String,

    /// Cloud request timeout, seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Lightpad command timeout, seconds.
    #[serde(default = "default_device_timeout")]
    pub device_timeout: u64,

    #[serde(default = "default_discovery_port")]
    pub discovery_port: u16,

    /// Re-broadcast discovery every N seconds; 0 broadcasts once.
    #[serde(default)]
    pub rediscovery_interval: u64,

    /// Skip certificate verification for the cloud.
    #[serde(default)]
    pub insecure_cloud: bool,

    /// Custom CA certificate for the cloud.
    pub ca_cert: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            password_env: None,
            cloud_url: default_cloud_url(),
            timeout: default_timeout(),
            device_timeout: default_device_timeout(),
            discovery_port: default_discovery_port(),
            rediscovery_interval: 0,
            insecure_cloud: false,
            ca_cert: None,
        }
    }
}

impl Config {
    /// Copy with the plaintext password masked, for display.
    pub fn redacted(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| "********".into()),
            ..self.clone()
        }
    }
}

fn default_cloud_url() -> String {
    DEFAULT_CLOUD_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_device_timeout() -> u64 {
    5
}
fn default_discovery_port() -> u16 {
    DISCOVERY_PORT
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "plumly", "plumly").map_or_else(
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
    p.push("plumly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load defaults, then `path` (if it exists), then `PLUMLY_*` variables.
///
/// `PLUMLY_PASSWORD` is left to [`resolve_password`] so that it ranks above
/// the keyring rather than being mistaken for the plaintext entry.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["password"]));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the cloud password: `password_env` variable, then
/// `PLUMLY_PASSWORD`, then the system keyring, then plaintext.
pub fn resolve_password(cfg: &Config, username: &str) -> Result<SecretString, ConfigError> {
    // 1. Configured env var
    if let Some(ref env_name) = cfg.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, username) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = cfg.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoPassword {
        username: username.into(),
    })
}

/// Build a `PlatformConfig`, resolving credentials.
pub fn to_platform_config(cfg: &Config) -> Result<PlatformConfig, ConfigError> {
    let username = cfg.username.clone().ok_or(ConfigError::NoUsername)?;
    let password = resolve_password(cfg, &username)?;

    Ok(PlatformConfig {
        username,
        password,
        ..to_network_config(cfg)?
    })
}

/// Build a `PlatformConfig` without credentials, for discovery-only use.
pub fn to_network_config(cfg: &Config) -> Result<PlatformConfig, ConfigError> {
    let cloud_url: url::Url = cfg.cloud_url.parse().map_err(|_| ConfigError::Validation {
        field: "cloud_url".into(),
        reason: format!("invalid URL: {}", cfg.cloud_url),
    })?;

    let cloud_tls = if cfg.insecure_cloud {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = cfg.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(PlatformConfig {
        cloud_url,
        cloud_tls,
        cloud_timeout: Duration::from_secs(cfg.timeout),
        device_timeout: Duration::from_secs(cfg.device_timeout),
        discovery_port: cfg.discovery_port,
        rediscovery_interval_secs: cfg.rediscovery_interval,
        ..PlatformConfig::default()
    })
}
