//! The node operations a contract needs, and their qtumd JSON-RPC mapping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chaincontract_rpc::{call_long_poll, call_method, RpcTransport};
use serde_json::{json, Value};

use crate::error::TransportError;
use crate::types::{
    CallContractRequest, CallContractResult, SendToContractRequest, SendToContractResult,
    TransactionInfo, TransactionReceipt, WaitForLogsRequest, WaitForLogsResult,
};

/// Node operations used by the contract engine.
///
/// Implementations must be `Send + Sync`; the trait is object-safe and is
/// stored as `Arc<dyn ContractTransport>`.
#[async_trait]
pub trait ContractTransport: Send + Sync + 'static {
    /// Execute call data without creating a transaction.
    async fn call_contract(&self, req: CallContractRequest) -> Result<CallContractResult, TransportError>;

    /// Create, sign and broadcast a contract transaction via the node wallet.
    async fn send_to_contract(&self, req: SendToContractRequest) -> Result<SendToContractResult, TransportError>;

    async fn get_transaction(&self, txid: &str) -> Result<TransactionInfo, TransportError>;

    /// `None` while the transaction has not been mined.
    async fn get_transaction_receipt(&self, txid: &str) -> Result<Option<TransactionReceipt>, TransportError>;

    /// Long-poll for logs. May block until matching logs exist.
    async fn wait_for_logs(&self, req: WaitForLogsRequest) -> Result<WaitForLogsResult, TransportError>;
}

/// [`ContractTransport`] over a qtumd JSON-RPC endpoint.
pub struct QtumRpc {
    rpc: Arc<dyn RpcTransport>,
    next_id: AtomicU64,
}

impl QtumRpc {
    pub fn new(rpc: Arc<dyn RpcTransport>) -> Self {
        Self {
            rpc,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        self.rpc.url()
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        call_method(self.rpc.as_ref(), id, method, params).await
    }

    async fn long_poll<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        call_long_poll(self.rpc.as_ref(), id, method, params).await
    }
}

/// `gettransactionreceipt` answers with an array: empty until the
/// transaction is mined, otherwise one receipt per contract execution.
fn first_receipt(value: Value) -> Result<Option<TransactionReceipt>, TransportError> {
    let malformed = |reason: String| TransportError::MalformedResponse {
        method: "gettransactionreceipt".into(),
        reason,
    };
    match value {
        Value::Array(items) => match items.into_iter().next() {
            Some(first) => serde_json::from_value(first)
                .map(Some)
                .map_err(|e| malformed(e.to_string())),
            None => Ok(None),
        },
        other => Err(malformed(format!("expected an array, got {other}"))),
    }
}

/// Positional `callcontract` params. Gas limit and amount can only be given
/// after a sender.
fn call_contract_params(req: &CallContractRequest) -> Vec<Value> {
    let mut params = vec![json!(req.address), json!(req.datahex)];
    match &req.sender {
        Some(sender) => {
            params.push(json!(sender));
            if req.gas_limit.is_some() || req.amount.is_some() {
                params.push(req.gas_limit.map_or(Value::Null, |g| json!(g)));
            }
            if let Some(amount) = req.amount {
                params.push(json!(amount));
            }
        }
        None if req.gas_limit.is_some() || req.amount.is_some() => {
            tracing::warn!(
                address = %req.address,
                "callcontract: gas limit/amount ignored without a sender"
            );
        }
        None => {}
    }
    params
}

fn send_to_contract_params(req: &SendToContractRequest) -> Vec<Value> {
    let mut params = vec![
        json!(req.address),
        json!(req.datahex),
        json!(req.amount),
        json!(req.gas_limit),
        json!(req.gas_price),
    ];
    if let Some(sender) = &req.sender {
        params.push(json!(sender));
    }
    params
}

fn wait_for_logs_params(req: &WaitForLogsRequest) -> Vec<Value> {
    let mut params = vec![
        json!(req.from.unwrap_or_default()),
        req.to.map_or(Value::Null, |to| json!(to)),
        req.filter.as_ref().map_or_else(|| json!({}), |f| json!(f)),
    ];
    if let Some(minconf) = req.minconf {
        params.push(json!(minconf));
    }
    params
}

#[async_trait]
impl ContractTransport for QtumRpc {
    async fn call_contract(&self, req: CallContractRequest) -> Result<CallContractResult, TransportError> {
        self.request("callcontract", call_contract_params(&req)).await
    }

    async fn send_to_contract(&self, req: SendToContractRequest) -> Result<SendToContractResult, TransportError> {
        self.request("sendtocontract", send_to_contract_params(&req)).await
    }

    async fn get_transaction(&self, txid: &str) -> Result<TransactionInfo, TransportError> {
        self.request("gettransaction", vec![json!(txid)]).await
    }

    async fn get_transaction_receipt(&self, txid: &str) -> Result<Option<TransactionReceipt>, TransportError> {
        let value: Value = self.request("gettransactionreceipt", vec![json!(txid)]).await?;
        first_receipt(value)
    }

    async fn wait_for_logs(&self, req: WaitForLogsRequest) -> Result<WaitForLogsResult, TransportError> {
        tracing::debug!(
            from = %req.from.unwrap_or_default(),
            url = self.url(),
            "waitforlogs"
        );
        let result: Option<WaitForLogsResult> =
            self.long_poll("waitforlogs", wait_for_logs_params(&req)).await?;
        Ok(result.unwrap_or_default())
    }
}
