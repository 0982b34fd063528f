//! chaincontract-core — the types and traits every other ChainContract crate
//! builds on.
//!
//! # Overview
//!
//! - [`ContractInfo`] / [`AbiEntry`] — contract descriptor (ABI + address)
//! - [`MethodIndex`] — name → function lookup with call/send views
//! - [`NormalizedValue`] — typed arguments, outputs and event fields
//! - [`AbiCodec`] — encode/decode seam, implemented by `chaincontract-evm`
//! - [`ContractTransport`] / [`QtumRpc`] — node operations and their qtumd mapping
//! - [`LogCursor`] / [`BlockPosition`] — where the next log round starts
//! - [`ContractError`] / [`CodecError`] — error taxonomy

pub mod abi;
pub mod codec;
pub mod cursor;
pub mod error;
pub mod event;
pub mod method;
pub mod transport;
pub mod types;
pub mod value;

pub use abi::{AbiEntry, AbiEntryKind, AbiParam, ContractInfo, StateMutability};
pub use codec::{decode_outputs_hex, encode_call_hex, AbiCodec};
pub use cursor::{BlockPosition, LogCursor};
pub use error::{CodecError, ContractError, MethodIndexKind, TransportError};
pub use event::{ContractEvent, ContractLogEntry, ContractLogs, ConfirmedReceipt, DecodedLog};
pub use method::{MethodEntry, MethodIndex};
pub use transport::{ContractTransport, QtumRpc};
pub use types::{
    CallContractRequest, CallContractResult, CallReceipt, ExecutionResult, LogEntry, LogFilter,
    RawLog, ReceiptHeader, SendToContractRequest, SendToContractResult, TransactionInfo,
    TransactionReceipt, WaitForLogsRequest, WaitForLogsResult, NO_EXCEPTION,
};
pub use value::NormalizedValue;
