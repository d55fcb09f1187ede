// ── Runtime platform configuration ──
//
// Describes *how* to reach the cloud and the lightpads. Carries credential
// data and tuning but never touches disk; plumly-config or the host builds
// a `PlatformConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use plumly_api::{CloudCredentials, DEFAULT_CLOUD_URL, DISCOVERY_PORT, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

/// TLS verification strategy for the cloud. Lightpads are always relaxed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification.
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::System,
            TlsVerification::CustomCa(path) => Self::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}

/// Configuration for one platform instance (one cloud account).
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Cloud base URL.
    pub cloud_url: Url,
    pub username: String,
    pub password: SecretString,
    pub cloud_tls: TlsVerification,
    /// Per-request timeout for cloud calls.
    pub cloud_timeout: Duration,
    /// Per-request timeout for lightpad commands.
    pub device_timeout: Duration,
    /// UDP port lightpads listen on for discovery.
    pub discovery_port: u16,
    /// Re-broadcast the discovery request this often (seconds). 0 = once.
    pub rediscovery_interval_secs: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            cloud_url: Url::parse(DEFAULT_CLOUD_URL).expect("default cloud URL is valid"),
            username: String::new(),
            password: SecretString::from(String::new()),
            cloud_tls: TlsVerification::default(),
            cloud_timeout: Duration::from_secs(30),
            device_timeout: Duration::from_secs(5),
            discovery_port: DISCOVERY_PORT,
            rediscovery_interval_secs: 0,
        }
    }
}

impl PlatformConfig {
    pub(crate) fn credentials(&self) -> CloudCredentials {
        CloudCredentials::new(self.username.clone(), self.password.clone())
    }

    pub(crate) fn cloud_transport(&self) -> TransportConfig {
        TransportConfig::cloud()
            .with_tls(TlsMode::from(&self.cloud_tls))
            .with_timeout(self.cloud_timeout)
    }

    pub(crate) fn lightpad_transport(&self) -> TransportConfig {
        TransportConfig::lightpad().with_timeout(self.device_timeout)
    }
}
