// ── Core error types ──
//
// User-facing errors from brilliant-core. Consumers never see HTTP statuses
// or envelope decoding failures directly; the `From<brilliant_bridge::Error>`
// impl translates transport-layer errors into domain variants.

use brilliant_bridge::ErrorKind;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── License ──────────────────────────────────────────────────────
    #[error("License key must not be empty")]
    EmptyLicenseKey,

    #[error("A valid license is required: {reason}")]
    LicenseRequired { reason: String },

    // ── Backend ──────────────────────────────────────────────────────
    /// Structured failure reported by a backend command.
    #[error("{}", backend_text(.command, .kind, .message))]
    Backend {
        command: String,
        kind: ErrorKind,
        message: String,
    },

    #[error("Cannot reach backend: {reason}")]
    ConnectionFailed { reason: String },

    /// `timeout_secs` is `None` when the bridge's client timeout is unknown.
    #[error("Backend request timed out{}", timeout_suffix(.timeout_secs))]
    Timeout { timeout_secs: Option<u64> },

    #[error("Backend refused {command}")]
    Unauthorized { command: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Invalid {field}: {message}")]
    ValidationFailed { field: String, message: String },

    // ── Local state ──────────────────────────────────────────────────
    #[error("Local storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Normalized message for display next to the failed operation.
    ///
    /// A message supplied by the backend is shown as-is; everything else is
    /// prefixed with the operation that failed (e.g. `"Activation failed"`).
    pub fn display_message(&self, prefix: &str) -> String {
        match self {
            Self::Backend { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => format!("{prefix}: {self}"),
        }
    }

    /// The backend error kind, when the backend reported one.
    pub fn backend_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Backend { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// The backend's message, or `"{command} failed ({kind})"` when it sent none.
#[allow(clippy::trivially_copy_pass_by_ref)]
fn backend_text(command: &str, kind: &ErrorKind, message: &str) -> String {
    if message.trim().is_empty() {
        format!("{command} failed ({kind})")
    } else {
        message.to_owned()
    }
}

#[allow(clippy::ref_option)]
fn timeout_suffix(timeout_secs: &Option<u64>) -> String {
    timeout_secs.map_or_else(String::new, |secs| format!(" after {secs}s"))
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<brilliant_bridge::Error> for CoreError {
    fn from(err: brilliant_bridge::Error) -> Self {
        use brilliant_bridge::Error as BridgeError;

        match err {
            BridgeError::Backend {
                command,
                kind,
                message,
            } => CoreError::Backend {
                command,
                kind,
                message,
            },
            BridgeError::Unauthorized { command } => CoreError::Unauthorized { command },
            BridgeError::Http {
                command,
                status: 404,
                ..
            } => CoreError::NotFound {
                entity_type: "command".into(),
                identifier: command,
            },
            BridgeError::Http {
                command,
                status,
                message,
            } => CoreError::Api {
                message: format!("{command}: {message}"),
                status: Some(status),
            },
            BridgeError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: None }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            BridgeError::InvalidUrl(e) => CoreError::ConnectionFailed {
                reason: format!("invalid backend URL: {e}"),
            },
            BridgeError::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            BridgeError::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
