//! The `RpcTransport` trait — the raw request/response channel to a node.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

/// The async trait every JSON-RPC transport implements.
///
/// Implementations must be `Send + Sync` so one transport can back many
/// concurrently running contract operations; the trait is object-safe and
/// is usually stored as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Send a single JSON-RPC request and return the response.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// Send a request the node may hold open until it has something to
    /// report. Transports with a request timeout must not apply it here.
    async fn send_long_poll(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        self.send(req).await
    }

    /// Return the transport's identifier (URL or name).
    fn url(&self) -> &str;
}

/// Call `method` and deserialize the result into `T`.
///
/// Node-side errors become [`TransportError::Rpc`].
pub async fn call_method<T: DeserializeOwned>(
    transport: &dyn RpcTransport,
    id: u64,
    method: &str,
    params: Vec<Value>,
) -> Result<T, TransportError> {
    let req = JsonRpcRequest::new(id, method, params);
    tracing::trace!(id, method, url = transport.url(), "rpc request");
    decode_result(transport.send(req).await?)
}

/// Like [`call_method`], over [`RpcTransport::send_long_poll`].
pub async fn call_long_poll<T: DeserializeOwned>(
    transport: &dyn RpcTransport,
    id: u64,
    method: &str,
    params: Vec<Value>,
) -> Result<T, TransportError> {
    let req = JsonRpcRequest::new(id, method, params);
    tracing::trace!(id, method, url = transport.url(), "rpc long-poll");
    decode_result(transport.send_long_poll(req).await?)
}

fn decode_result<T: DeserializeOwned>(resp: JsonRpcResponse) -> Result<T, TransportError> {
    let result = resp.into_result().map_err(TransportError::Rpc)?;
    serde_json::from_value(result).map_err(TransportError::Deserialization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::JsonRpcError;

    struct Canned(Result<Value, JsonRpcError>);

    #[async_trait]
    impl RpcTransport for Canned {
        async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
            let (result, error) = match &self.0 {
                Ok(v) => (Some(v.clone()), None),
                Err(e) => (None, Some(e.clone())),
            };
            Ok(JsonRpcResponse {
                jsonrpc: None,
                id: req.id,
                result,
                error,
            })
        }

        fn url(&self) -> &str {
            "canned"
        }
    }

    #[tokio::test]
    async fn call_method_deserializes() {
        let t = Canned(Ok(serde_json::json!(42)));
        let n: u64 = call_method(&t, 1, "getblockcount", vec![]).await.unwrap();
        assert_eq!(n, 42);
    }

    #[tokio::test]
    async fn call_method_surfaces_node_error() {
        let t = Canned(Err(JsonRpcError {
            code: -32601,
            message: "Method not found".into(),
            data: None,
        }));
        let err = call_method::<Value>(&t, 1, "nope", vec![]).await.unwrap_err();
        assert_eq!(err.rpc_code(), Some(-32601));
    }

    #[tokio::test]
    async fn long_poll_defaults_to_send() {
        let t = Canned(Ok(serde_json::json!({"entries": []})));
        let v: Value = call_long_poll(&t, 3, "waitforlogs", vec![]).await.unwrap();
        assert_eq!(v["entries"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn call_method_shape_mismatch() {
        let t = Canned(Ok(serde_json::json!("not a number")));
        let err = call_method::<u64>(&t, 1, "getblockcount", vec![]).await.unwrap_err();
        assert!(matches!(err, TransportError::Deserialization(_)));
    }
}
