// HTTP command bridge
//
// Each backend command is exposed as `POST {base}/invoke/{command}` with the
// argument object as JSON body. Responses use a small envelope:
//
//   {"ok": true,  "data": <value>}
//   {"ok": false, "error": {"kind": "invalid_key", "message": "..."}}
//
// Older backends report `error` as a bare string; that is accepted with
// kind `unknown`.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::bridge::CommandBridge;
use crate::error::{Error, ErrorKind};
use crate::transport::TransportConfig;

#[derive(Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<WireError>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireError {
    Structured {
        #[serde(default)]
        kind: Option<ErrorKind>,
        #[serde(default)]
        message: String,
    },
    Plain(String),
}

impl WireError {
    fn into_error(self, command: &str) -> Error {
        let (kind, message) = match self {
            Self::Structured { kind, message } => (kind.unwrap_or(ErrorKind::Unknown), message),
            Self::Plain(message) => (ErrorKind::Unknown, message),
        };
        Error::Backend {
            command: command.to_owned(),
            kind,
            message,
        }
    }
}

/// Command bridge speaking JSON over HTTP to a locally running backend.
pub struct HttpBridge {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: Option<u64>,
}

impl HttpBridge {
    /// Create a bridge from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://127.0.0.1:4756`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url,
            timeout_secs: Some(transport.timeout_secs()),
        })
    }

    /// Create a bridge with a pre-built `reqwest::Client`.
    ///
    /// `timeout` should match the client's own request timeout; it is only
    /// used to report timeouts. `None` reports them without a duration.
    pub fn with_client(http: reqwest::Client, base_url: Url, timeout: Option<Duration>) -> Self {
        Self {
            http,
            base_url,
            timeout_secs: timeout.map(|t| t.as_secs()),
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the endpoint URL for a command: `{base}/invoke/{command}`.
    pub(crate) fn command_url(&self, command: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/invoke/{command}"))?)
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Unwrap the response envelope, returning `data` on success.
    async fn parse_envelope(&self, command: &str, resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Unauthorized {
                command: command.to_owned(),
            });
        }

        let body = resp.text().await.map_err(|e| self.map_transport(e))?;

        match serde_json::from_str::<Envelope>(&body) {
            Ok(envelope) if envelope.ok => Ok(envelope.data),
            Ok(envelope) => Err(envelope.error.map_or_else(
                || Error::Backend {
                    command: command.to_owned(),
                    kind: ErrorKind::Unknown,
                    message: String::new(),
                },
                |e| e.into_error(command),
            )),
            Err(_) if !status.is_success() => Err(Error::Http {
                command: command.to_owned(),
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            }),
            Err(e) => {
                let preview: String = body.chars().take(200).collect();
                Err(Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                })
            }
        }
    }
}

impl CommandBridge for HttpBridge {
    async fn call(&self, command: &str, args: Value) -> Result<Value, Error> {
        let url = self.command_url(command)?;
        debug!(command, "POST {}", url);
        trace!(%args, "bridge arguments");

        let resp = self
            .http
            .post(url)
            .json(&args)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        self.parse_envelope(command, resp).await
    }
}
