//! chaincontract-rpc — JSON-RPC plumbing for talking to a qtumd node.
//!
//! # Overview
//!
//! - [`RpcTransport`] — the async trait every transport implements
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`] — wire types
//! - [`TransportError`] — structured error type
//! - [`HttpRpcClient`] — reqwest-backed transport with optional basic auth
//!
//! The node-specific method mapping (`callcontract`, `waitforlogs`, ...)
//! lives in `chaincontract-core`; this crate only moves JSON around.

pub mod error;
pub mod http;
pub mod request;
pub mod transport;

pub use error::TransportError;
pub use http::{HttpClientConfig, HttpRpcClient};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId, RpcParam};
pub use transport::{call_long_poll, call_method, RpcTransport};
