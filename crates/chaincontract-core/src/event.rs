//! Decoded log shapes handed to callers.

use serde::{Deserialize, Serialize};

use crate::types::{LogEntry, RawLog, ReceiptHeader};
use crate::value::NormalizedValue;

/// A log matched against an event of the contract's ABI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractEvent {
    /// Event name, e.g. `Transfer`.
    #[serde(rename = "type")]
    pub name: String,
    /// Event parameters in declaration order. Indexed reference types
    /// (`string`, `bytes`, arrays, tuples) only carry their topic hash and
    /// appear as `Bytes`.
    pub fields: Vec<(String, NormalizedValue)>,
}

impl ContractEvent {
    pub fn field(&self, name: &str) -> Option<&NormalizedValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}

/// Outcome of decoding one log. A log the ABI does not describe is kept as
/// `Unrecognized` instead of failing the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DecodedLog {
    Recognized(ContractEvent),
    Unrecognized { reason: String },
}

impl DecodedLog {
    pub fn event(&self) -> Option<&ContractEvent> {
        match self {
            Self::Recognized(e) => Some(e),
            Self::Unrecognized { .. } => None,
        }
    }

    /// Event name, if recognized.
    pub fn name(&self) -> Option<&str> {
        self.event().map(|e| e.name.as_str())
    }
}

/// A receipt with its logs decoded. `rawlogs` keeps the node's records
/// unchanged, in the same order as `logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedReceipt {
    #[serde(flatten)]
    pub header: ReceiptHeader,
    pub logs: Vec<DecodedLog>,
    pub rawlogs: Vec<RawLog>,
}

/// A `waitforlogs` entry plus its decoded event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractLogEntry {
    #[serde(flatten)]
    pub entry: LogEntry,
    pub event: DecodedLog,
}

/// One shaped `waitforlogs` round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractLogs {
    pub entries: Vec<ContractLogEntry>,
    pub count: u64,
    /// `None` when the node reported an empty round.
    pub nextblock: Option<u64>,
}
