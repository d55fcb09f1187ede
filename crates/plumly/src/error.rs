//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with actionable help
//! text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use plumly_config::ConfigError;
use plumly_core::{CloudError, CommandError, CoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Cloud ────────────────────────────────────────────────────────
    #[error("Could not reach the Plum cloud")]
    #[diagnostic(
        code(plumly::cloud_unreachable),
        help(
            "Check your internet connection and the cloud_url setting.\n\
             Reason: {reason}"
        )
    )]
    CloudUnreachable { reason: String },

    #[error("The Plum cloud rejected your credentials")]
    #[diagnostic(
        code(plumly::auth_failed),
        help(
            "Verify the username in your config and the password source\n\
             (password_env, PLUMLY_PASSWORD, keyring service 'plumly', or password)."
        )
    )]
    AuthFailed,

    #[error("Cloud error: {message}")]
    #[diagnostic(code(plumly::cloud_error))]
    CloudApi { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(plumly::timeout),
        help("Increase the timeout with --timeout or the timeout setting.")
    )]
    Timeout,

    // ── Credentials ──────────────────────────────────────────────────
    #[error("No cloud username configured")]
    #[diagnostic(
        code(plumly::no_username),
        help(
            "Create a config with: plumly config init --username you@example.com\n\
             Expected at: {path}"
        )
    )]
    NoUsername { path: String },

    #[error("No password found for '{username}'")]
    #[diagnostic(
        code(plumly::no_password),
        help(
            "Set PLUMLY_PASSWORD, point password_env at a variable,\n\
             or store it in the system keyring under service 'plumly'."
        )
    )]
    NoPassword { username: String },

    // ── Devices ──────────────────────────────────────────────────────
    #[error("Lightpad '{lpid}' not found")]
    #[diagnostic(
        code(plumly::not_found),
        help("Run: plumly devices to see known lightpads")
    )]
    NotFound { lpid: String },

    #[error("Lightpad '{lpid}' did not answer discovery")]
    #[diagnostic(
        code(plumly::unreachable),
        help(
            "Make sure you are on the same network as the lightpad,\n\
             or wait longer with --wait."
        )
    )]
    Unreachable { lpid: String },

    #[error("Command to lightpad '{lpid}' failed: {reason}")]
    #[diagnostic(code(plumly::device_error))]
    DeviceError { lpid: String, reason: String },

    #[error("Discovery failed: {reason}")]
    #[diagnostic(
        code(plumly::discovery),
        help("UDP broadcast may be blocked on this network or port.")
    )]
    Discovery { reason: String },

    // ── Validation / config ──────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(plumly::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(plumly::config_exists),
        help("Use --force to overwrite.\nPath: {path}")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(plumly::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to render TOML: {0}")]
    #[diagnostic(code(plumly::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CloudUnreachable { .. } | Self::Discovery { .. } => exit_code::CONNECTION,
            Self::AuthFailed | Self::NoUsername { .. } | Self::NoPassword { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } | Self::Unreachable { .. } => exit_code::NOT_FOUND,
            Self::ConfigExists { .. } => exit_code::CONFLICT,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoUsername => Self::NoUsername {
                path: plumly_config::config_path().display().to_string(),
            },
            ConfigError::NoPassword { username } => Self::NoPassword { username },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl From<CloudError> for CliError {
    fn from(err: CloudError) -> Self {
        match err {
            CloudError::Authentication { .. } => Self::AuthFailed,
            CloudError::Connection { reason } => Self::CloudUnreachable { reason },
            CloudError::Timeout => Self::Timeout,
            other @ (CloudError::Api { .. } | CloudError::MalformedResponse { .. }) => {
                Self::CloudApi {
                    message: other.to_string(),
                }
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::UnknownDevice { lpid } => Self::NotFound {
                lpid: lpid.to_string(),
            },
            CommandError::Unreachable { lpid } => Self::Unreachable {
                lpid: lpid.to_string(),
            },
            CommandError::Transport { lpid, reason } | CommandError::Protocol { lpid, reason } => {
                Self::DeviceError {
                    lpid: lpid.to_string(),
                    reason,
                }
            }
            CommandError::InvalidLevel { percent } => Self::Validation {
                field: "percent".into(),
                reason: format!("{percent} is not between 0 and 100"),
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Discovery(source) => Self::Discovery {
                reason: source.to_string(),
            },
            CoreError::Cloud(e) => e.into(),
            CoreError::Command(e) => e.into(),
        }
    }
}
