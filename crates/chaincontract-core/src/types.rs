//! qtumd request/response shapes for contract calls, transactions, receipts
//! and logs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cursor::BlockPosition;

/// VM status string meaning "no exception".
pub const NO_EXCEPTION: &str = "None";

// ─── callcontract ────────────────────────────────────────────────────────────

/// Read-only execution of call data against a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallContractRequest {
    pub address: String,
    /// Hex call data, no `0x`.
    pub datahex: String,
    pub sender: Option<String>,
    pub gas_limit: Option<u64>,
    /// Value attached to the simulated call, in QTUM.
    pub amount: Option<f64>,
}

/// `executionResult` of `callcontract`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    #[serde(default)]
    pub gas_used: u64,
    /// `"None"` on success, otherwise the VM exception (e.g. `"Revert"`).
    pub excepted: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excepted_message: Option<String>,
    #[serde(default)]
    pub new_address: String,
    /// Hex return data, no `0x`.
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub code_deposit: u64,
    #[serde(default)]
    pub gas_refunded: u64,
    #[serde(default)]
    pub deposit_size: u64,
    #[serde(default)]
    pub gas_for_deposit: u64,
}

impl ExecutionResult {
    /// `true` when the VM reported an exception.
    pub fn is_exception(&self) -> bool {
        self.excepted != NO_EXCEPTION
    }
}

/// `transactionReceipt` of `callcontract`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallReceipt {
    #[serde(default)]
    pub state_root: String,
    #[serde(default)]
    pub gas_used: u64,
    #[serde(default)]
    pub bloom: String,
    #[serde(default)]
    pub log: Vec<RawLog>,
}

/// Result of `callcontract`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallContractResult {
    #[serde(default)]
    pub address: String,
    pub execution_result: ExecutionResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_receipt: Option<CallReceipt>,
}

// ─── sendtocontract ──────────────────────────────────────────────────────────

/// A state-changing call to be signed and broadcast by the node wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendToContractRequest {
    pub address: String,
    pub datahex: String,
    /// QTUM sent along with the call.
    pub amount: f64,
    pub gas_limit: u64,
    /// QTUM per gas unit.
    pub gas_price: f64,
    pub sender: Option<String>,
}

/// Result of `sendtocontract`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendToContractResult {
    pub txid: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub hash160: String,
}

// ─── gettransaction ──────────────────────────────────────────────────────────

/// Wallet view of a transaction (`gettransaction`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub txid: String,
    /// Negative when the transaction conflicts with the best chain.
    #[serde(default)]
    pub confirmations: i64,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockhash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockindex: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocktime: Option<i64>,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub hex: String,
    /// Everything else the node reported (`details`, `timereceived`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TransactionInfo {
    /// Confirmation count clamped at zero.
    pub fn confirmed_depth(&self) -> u64 {
        self.confirmations.max(0) as u64
    }
}

// ─── gettransactionreceipt ───────────────────────────────────────────────────

/// A log record as it appears in a receipt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLog {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub topics: Vec<String>,
    /// Hex data, no `0x`.
    #[serde(default)]
    pub data: String,
}

/// Every receipt field except the log list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptHeader {
    #[serde(default)]
    pub block_hash: String,
    #[serde(default)]
    pub block_number: u64,
    #[serde(default)]
    pub transaction_hash: String,
    #[serde(default)]
    pub transaction_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_index: Option<u32>,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub cumulative_gas_used: u64,
    #[serde(default)]
    pub gas_used: u64,
    #[serde(default)]
    pub contract_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excepted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excepted_message: Option<String>,
}

/// A mined transaction's receipt as the node returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    #[serde(flatten)]
    pub header: ReceiptHeader,
    #[serde(default)]
    pub log: Vec<RawLog>,
}

// ─── waitforlogs ─────────────────────────────────────────────────────────────

/// Address/topic filter for `waitforlogs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogFilter {
    /// `None` means "not specified"; the contract fills in its own address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<String>>,
    /// Positional topic filter; `None` entries match anything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<Option<String>>>,
}

impl LogFilter {
    pub fn addresses(addrs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            addresses: Some(addrs.into_iter().map(Into::into).collect()),
            topics: None,
        }
    }

    pub fn topic(mut self, position: usize, topic: impl Into<String>) -> Self {
        let topics = self.topics.get_or_insert_with(Vec::new);
        if topics.len() <= position {
            topics.resize(position + 1, None);
        }
        topics[position] = Some(topic.into());
        self
    }
}

/// One `waitforlogs` query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaitForLogsRequest {
    pub from: Option<BlockPosition>,
    pub to: Option<BlockPosition>,
    pub filter: Option<LogFilter>,
    pub minconf: Option<u64>,
}

/// A single log as returned by `waitforlogs`: receipt coordinates plus the
/// topics/data of one log record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(flatten)]
    pub receipt: ReceiptHeader,
    /// Emitting contract; older nodes leave it out and only report
    /// `contractAddress`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub data: String,
}

impl LogEntry {
    /// The log record part of this entry.
    pub fn raw_log(&self) -> RawLog {
        RawLog {
            address: self
                .address
                .clone()
                .unwrap_or_else(|| self.receipt.contract_address.clone()),
            topics: self.topics.clone(),
            data: self.data.clone(),
        }
    }
}

/// Result of `waitforlogs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaitForLogsResult {
    #[serde(default)]
    pub entries: Vec<LogEntry>,
    #[serde(default)]
    pub count: u64,
    /// Block to resume from; the node is the source of truth. `None` for
    /// an empty round (the node answered `null`), which leaves the cursor
    /// where it was.
    #[serde(default)]
    pub nextblock: Option<u64>,
}
