// ── Command bridge abstraction ──
//
// The backend exposes named operations taking a JSON object of arguments
// and returning a JSON value or a structured error. Everything above this
// trait is transport-agnostic.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::{Deserialize, DeserializeOwned};
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::Error;

/// Request/response channel to the backend.
///
/// Implementations send `command` with `args` and resolve to the raw JSON
/// result. Typed decoding happens in [`invoke`], so implementations only
/// deal with transport and error envelopes.
pub trait CommandBridge: Send + Sync {
    fn call(&self, command: &str, args: Value) -> impl Future<Output = Result<Value, Error>> + Send;
}

impl<B: CommandBridge> CommandBridge for Arc<B> {
    fn call(&self, command: &str, args: Value) -> impl Future<Output = Result<Value, Error>> + Send {
        (**self).call(command, args)
    }
}

impl<B: CommandBridge> CommandBridge for &B {
    fn call(&self, command: &str, args: Value) -> impl Future<Output = Result<Value, Error>> + Send {
        (**self).call(command, args)
    }
}

/// Empty argument object, for commands that take no parameters.
pub fn no_args() -> Value {
    Value::Object(Map::new())
}

/// Serialize a typed argument struct into the bridge's JSON object form.
pub fn to_args(args: &impl Serialize) -> Result<Value, Error> {
    serde_json::to_value(args).map_err(|e| Error::Deserialization {
        message: format!("failed to encode arguments: {e}"),
        body: String::new(),
    })
}

/// Call `command` and decode its result into `T`.
pub async fn invoke<B, T>(bridge: &B, command: &str, args: Value) -> Result<T, Error>
where
    B: CommandBridge + ?Sized,
    T: DeserializeOwned,
{
    let value = bridge.call(command, args).await?;
    trace!(command, "decoding bridge result");
    <T as Deserialize<'_>>::deserialize(&value).map_err(|e| {
        let body = value.to_string();
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{command}: {e} (body preview: {preview:?})"),
            body,
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    impl CommandBridge for Echo {
        async fn call(&self, _command: &str, args: Value) -> Result<Value, Error> {
            Ok(args)
        }
    }

    #[tokio::test]
    async fn invoke_decodes_typed_result() {
        let n: u32 = invoke(&Echo, "echo", json!(7)).await.unwrap();
        assert_eq!(n, 7);
    }

    #[tokio::test]
    async fn invoke_reports_shape_mismatch() {
        let result: Result<bool, _> = invoke(&Echo, "is_license_activated", json!("yes")).await;
        match result {
            Err(Error::Deserialization { message, body }) => {
                assert!(message.starts_with("is_license_activated:"));
                assert_eq!(body, "\"yes\"");
            }
            other => panic!("expected Deserialization error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn arc_bridge_delegates() {
        let bridge = Arc::new(Echo);
        let s: String = invoke(&bridge, "echo", json!("ok")).await.unwrap();
        assert_eq!(s, "ok");
    }

    #[test]
    fn no_args_is_empty_object() {
        assert_eq!(no_args(), json!({}));
    }
}
