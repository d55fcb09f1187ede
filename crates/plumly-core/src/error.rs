// ── Core error types ──
//
// Consumers never see raw HTTP statuses or JSON failures. Cloud failures
// become `CloudError`, lightpad failures become `CommandError`, and the
// platform wraps both in `CoreError`.

use strum::Display;
use thiserror::Error;

use crate::model::LightpadId;

/// Any failure in the topology fetch chain. Aborts that fetch only; the
/// previously reconciled registry stays valid.
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("cloud rejected credentials: {message}")]
    Authentication { message: String },

    #[error("cannot reach cloud: {reason}")]
    Connection { reason: String },

    #[error("cloud request timed out")]
    Timeout,

    #[error("cloud API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed cloud response: {message}")]
    MalformedResponse { message: String },
}

impl From<plumly_api::Error> for CloudError {
    fn from(err: plumly_api::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        match err {
            plumly_api::Error::Authentication { message } => Self::Authentication { message },
            plumly_api::Error::Api { status, message } => Self::Api { status, message },
            plumly_api::Error::Deserialization { message, body: _ } => {
                Self::MalformedResponse { message }
            }
            other => Self::Connection {
                reason: other.to_string(),
            },
        }
    }
}

/// Coarse classification of a [`CommandError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CommandErrorKind {
    Unreachable,
    Transport,
    Protocol,
    UnknownDevice,
    InvalidLevel,
}

/// A failed lightpad command. Degrades that one operation; the device stays
/// in the registry.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("lightpad {lpid} has no known address")]
    Unreachable { lpid: LightpadId },

    #[error("cannot reach lightpad {lpid}: {reason}")]
    Transport { lpid: LightpadId, reason: String },

    #[error("unexpected response from lightpad {lpid}: {reason}")]
    Protocol { lpid: LightpadId, reason: String },

    #[error("unknown lightpad {lpid}")]
    UnknownDevice { lpid: LightpadId },

    #[error("level {percent}% is out of range (0-100)")]
    InvalidLevel { percent: u8 },
}

impl CommandError {
    pub fn kind(&self) -> CommandErrorKind {
        match self {
            Self::Unreachable { .. } => CommandErrorKind::Unreachable,
            Self::Transport { .. } => CommandErrorKind::Transport,
            Self::Protocol { .. } => CommandErrorKind::Protocol,
            Self::UnknownDevice { .. } => CommandErrorKind::UnknownDevice,
            Self::InvalidLevel { .. } => CommandErrorKind::InvalidLevel,
        }
    }

    /// Classify an API error from a call to `lpid`.
    pub(crate) fn from_api(lpid: &LightpadId, err: &plumly_api::Error) -> Self {
        if err.is_transport() {
            Self::Transport {
                lpid: lpid.clone(),
                reason: err.to_string(),
            }
        } else {
            Self::Protocol {
                lpid: lpid.clone(),
                reason: err.to_string(),
            }
        }
    }
}

/// Platform-level errors.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("discovery failed: {0}")]
    Discovery(#[source] plumly_api::Error),

    #[error(transparent)]
    Cloud(#[from] CloudError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_classify_into_cloud_errors() {
        let err = CloudError::from(plumly_api::Error::Api {
            status: 500,
            message: "oops".into(),
        });
        assert!(matches!(err, CloudError::Api { status: 500, .. }));

        let err = CloudError::from(plumly_api::Error::Timeout { timeout_secs: 30 });
        assert!(matches!(err, CloudError::Timeout));

        let err = CloudError::from(plumly_api::Error::Deserialization {
            message: "bad".into(),
            body: "{}".into(),
        });
        assert!(matches!(err, CloudError::MalformedResponse { .. }));
    }

    #[test]
    fn command_error_kinds() {
        let lpid = LightpadId::from("p1");
        let transport = CommandError::from_api(&lpid, &plumly_api::Error::Timeout { timeout_secs: 5 });
        assert_eq!(transport.kind(), CommandErrorKind::Transport);

        let protocol = CommandError::from_api(
            &lpid,
            &plumly_api::Error::Api {
                status: 500,
                message: String::new(),
            },
        );
        assert_eq!(protocol.kind(), CommandErrorKind::Protocol);
        assert_eq!(CommandErrorKind::UnknownDevice.to_string(), "unknown_device");
    }
}
