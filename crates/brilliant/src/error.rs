//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use brilliant_config::ConfigError;
use brilliant_core::{CoreError, ErrorKind};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const LICENSE: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the backend: {reason}")]
    #[diagnostic(
        code(brilliant::connection_failed),
        help(
            "Check that the Brilliant backend is running.\n\
             Override the address with --backend or BRILLIANT_BACKEND_URL."
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Backend refused '{command}'")]
    #[diagnostic(code(brilliant::unauthorized))]
    Unauthorized { command: String },

    // ── License ──────────────────────────────────────────────────────

    #[error("A valid license is required: {reason}")]
    #[diagnostic(
        code(brilliant::license_required),
        help(
            "Activate this machine with: brilliant license activate\n\
             Check the current state with: brilliant license status"
        )
    )]
    LicenseRequired { reason: String },

    // ── Backend ──────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(brilliant::backend))]
    Backend {
        command: String,
        kind: ErrorKind,
        message: String,
    },

    #[error("API error: {message}")]
    #[diagnostic(code(brilliant::api_error))]
    Api { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(brilliant::not_found),
        help("Run: brilliant {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(brilliant::validation))]
    Validation { field: String, reason: String },

    // ── Configuration / local state ──────────────────────────────────

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(brilliant::config),
        help("Inspect the resolved configuration with: brilliant config show")
    )]
    Config { message: String },

    #[error("Local storage error: {message}")]
    #[diagnostic(
        code(brilliant::storage),
        help("The cache can be reset with: brilliant cache clear")
    )]
    Storage { message: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(brilliant::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request timed out{}", after_seconds(.seconds))]
    #[diagnostic(
        code(brilliant::timeout),
        help("Increase timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { seconds: Option<u64> },

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[allow(clippy::ref_option)]
fn after_seconds(seconds: &Option<u64>) -> String {
    seconds.map_or_else(String::new, |s| format!(" after {s}s"))
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::LicenseRequired { .. } | Self::Unauthorized { .. } => exit_code::LICENSE,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Backend { kind, .. } => match kind {
                ErrorKind::NotActivated
                | ErrorKind::Expired
                | ErrorKind::OfflineExpired
                | ErrorKind::InvalidKey => exit_code::LICENSE,
                ErrorKind::NotFound => exit_code::NOT_FOUND,
                ErrorKind::Network => exit_code::CONNECTION,
                ErrorKind::Validation => exit_code::USAGE,
                _ => exit_code::GENERAL,
            },
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyLicenseKey => CliError::Validation {
                field: "license key".into(),
                reason: "must not be empty".into(),
            },

            CoreError::LicenseRequired { reason } => CliError::LicenseRequired { reason },

            CoreError::Backend {
                command,
                kind,
                message,
            } => {
                let message = if message.trim().is_empty() {
                    format!("{command} failed ({kind})")
                } else {
                    message
                };
                CliError::Backend {
                    command,
                    kind,
                    message,
                }
            }

            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Unauthorized { command } => CliError::Unauthorized { command },

            CoreError::Api { message, status } => CliError::Api {
                message: match status {
                    Some(status) => format!("{message} (HTTP {status})"),
                    None => message,
                },
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => {
                let list_command = match entity_type.to_lowercase().as_str() {
                    "section" => "sections list".to_owned(),
                    "item" => "items list --section <NAME>".to_owned(),
                    other => format!("{other}s list"),
                };
                CliError::NotFound {
                    resource_type: entity_type,
                    identifier,
                    list_command,
                }
            }

            CoreError::ValidationFailed { field, message } => CliError::Validation {
                field,
                reason: message,
            },

            CoreError::Storage { message } => CliError::Storage { message },

            CoreError::Internal(message) => CliError::Api { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_backend_message_names_the_command() {
        let err = CliError::from(CoreError::Backend {
            command: "renew_license".into(),
            kind: ErrorKind::Unknown,
            message: " ".into(),
        });
        assert_eq!(err.to_string(), "renew_license failed (unknown)");
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn timeout_without_duration() {
        let err = CliError::from(CoreError::Timeout { timeout_secs: None });
        assert_eq!(err.to_string(), "Request timed out");
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);
    }
}
