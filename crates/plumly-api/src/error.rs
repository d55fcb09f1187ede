use thiserror::Error;

/// Top-level error type for the `plumly-api` crate.
///
/// Covers the cloud API, the lightpad local API, and the discovery socket.
/// `plumly-core` maps these into `CloudError` / `CommandError`.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Cloud rejected the configured credentials, or a lightpad rejected
    /// the house token.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, TLS, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup error (bad CA file, client builder failure).
    #[error("TLS error: {0}")]
    Tls(String),

    /// UDP socket error during discovery.
    #[error("Socket error: {0}")]
    Io(#[from] std::io::Error),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success HTTP status from the cloud or a lightpad.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the failure happened before any response arrived.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Timeout { .. } | Self::Tls(_) | Self::Io(_)
        )
    }

    /// Returns `true` if this is a timeout, from either reqwest or our own bound.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_reports_status() {
        let err = Error::Api {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_transport());
        assert!(!err.is_timeout());
    }

    #[test]
    fn timeout_is_transport() {
        let err = Error::Timeout { timeout_secs: 5 };
        assert!(err.is_transport());
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Request timed out after 5s");
    }
}
