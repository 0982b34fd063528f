//! HTTP JSON-RPC client backed by `reqwest`.
//!
//! qtumd answers failed RPC calls with an HTTP error status *and* a JSON-RPC
//! error body. The client therefore tries to parse the body before treating
//! a non-2xx status as a transport failure, so node errors surface as
//! [`TransportError::Rpc`].

use async_trait::async_trait;
use std::time::Duration;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};
use crate::transport::RpcTransport;

/// Configuration for `HttpRpcClient`.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Timeout for ordinary requests.
    pub request_timeout: Duration,
    /// Timeout for long-poll requests (`waitforlogs`). qtumd holds these
    /// open until matching logs exist, so `None` (wait forever) is the
    /// default.
    pub long_poll_timeout: Option<Duration>,
    /// TCP connect timeout, applied to every request.
    pub connect_timeout: Duration,
    /// `rpcuser` / `rpcpassword` of the node.
    pub basic_auth: Option<(String, String)>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            long_poll_timeout: None,
            connect_timeout: Duration::from_secs(10),
            basic_auth: None,
        }
    }
}

/// HTTP JSON-RPC client.
pub struct HttpRpcClient {
    url: String,
    http: reqwest::Client,
    basic_auth: Option<(String, String)>,
    request_timeout: Duration,
    long_poll_timeout: Option<Duration>,
}

impl HttpRpcClient {
    /// Create a new client for the given JSON-RPC endpoint URL.
    pub fn new(url: impl Into<String>, config: HttpClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            http,
            basic_auth: config.basic_auth,
            request_timeout: config.request_timeout,
            long_poll_timeout: config.long_poll_timeout,
        })
    }

    /// Create with default configuration.
    pub fn default_for(url: impl Into<String>) -> Result<Self, TransportError> {
        Self::new(url, HttpClientConfig::default())
    }

    fn map_reqwest(e: reqwest::Error, timeout: Option<Duration>) -> TransportError {
        match timeout {
            Some(t) if e.is_timeout() => TransportError::Timeout {
                ms: t.as_millis() as u64,
            },
            _ => TransportError::Http(e.to_string()),
        }
    }

    async fn post(
        &self,
        req: JsonRpcRequest,
        timeout: Option<Duration>,
    ) -> Result<JsonRpcResponse, TransportError> {
        let mut builder = self.http.post(&self.url).json(&req);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        if let Some((user, pass)) = &self.basic_auth {
            builder = builder.basic_auth(user, Some(pass));
        }

        let resp = builder.send().await.map_err(|e| Self::map_reqwest(e, timeout))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| Self::map_reqwest(e, timeout))?;

        match serde_json::from_str::<JsonRpcResponse>(&body) {
            Ok(parsed) => {
                if !status.is_success() && parsed.error.is_none() {
                    return Err(TransportError::Http(format!(
                        "HTTP {}: {body}",
                        status.as_u16()
                    )));
                }
                Ok(parsed)
            }
            Err(e) => {
                if status.is_success() {
                    Err(TransportError::Deserialization(e))
                } else {
                    tracing::debug!(
                        status = status.as_u16(),
                        method = %req.method,
                        url = %self.url,
                        "non-JSON error response"
                    );
                    Err(TransportError::Http(format!(
                        "HTTP {}: {body}",
                        status.as_u16()
                    )))
                }
            }
        }
    }
}

#[async_trait]
impl RpcTransport for HttpRpcClient {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        self.post(req, Some(self.request_timeout)).await
    }

    async fn send_long_poll(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        self.post(req, self.long_poll_timeout).await
    }

    fn url(&self) -> &str {
        &self.url
    }
}
