use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable category attached to every backend-reported failure.
///
/// The backend serializes these as snake_case strings. Anything the client
/// does not recognize collapses into [`ErrorKind::Unknown`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// No license is bound to this installation.
    NotActivated,
    /// The bound license has passed its expiry date.
    Expired,
    /// The key was rejected (unknown, malformed or already bound elsewhere).
    InvalidKey,
    /// The backend could not reach the licensing service.
    Network,
    /// The backend failed to read or write its own storage.
    Storage,
    /// The request arguments were rejected.
    Validation,
    /// The offline grace period ran out.
    OfflineExpired,
    /// The requested entity does not exist.
    NotFound,
    #[serde(other)]
    Unknown,
}

/// Top-level error type for the `brilliant-bridge` crate.
///
/// Covers transport failures, envelope decoding and the structured errors
/// the backend reports for individual commands. `brilliant-core` maps these
/// into user-facing state.
#[derive(Debug, Error)]
pub enum Error {
    // ── Backend ─────────────────────────────────────────────────────
    /// Structured error returned by a backend command.
    #[error("{command} failed ({kind}): {message}")]
    Backend {
        command: String,
        kind: ErrorKind,
        message: String,
    },

    /// The backend refused the request (HTTP 401/403).
    #[error("Backend refused {command}: unauthorized")]
    Unauthorized { command: String },

    /// Non-success HTTP status without a decodable error envelope.
    #[error("Backend returned HTTP {status} for {command}: {message}")]
    Http {
        command: String,
        status: u16,
        message: String,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out. The duration is unknown for bridges built around
    /// a caller-supplied client.
    #[error("Request timed out{}", timeout_suffix(.timeout_secs))]
    Timeout { timeout_secs: Option<u64> },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON (de)serialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

#[allow(clippy::ref_option)]
fn timeout_suffix(timeout_secs: &Option<u64>) -> String {
    timeout_secs.map_or_else(String::new, |secs| format!(" after {secs}s"))
}

impl Error {
    /// The backend-supplied error kind, if this error came from the backend.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Backend { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The backend-supplied message, if any.
    ///
    /// Front-ends display this verbatim; every other variant gets an
    /// operation-specific prefix instead.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Backend { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    /// Returns `true` if the backend could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Backend { kind, .. } => *kind == ErrorKind::NotFound,
            Self::Http { status, .. } => *status == 404,
            _ => false,
        }
    }
}
