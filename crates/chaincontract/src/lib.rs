//! chaincontract — call, send, confirm and follow the logs of Qtum smart
//! contracts.
//!
//! # Overview
//!
//! - [`Contract`] — method dispatch: `call`, `send`, `encode_params`
//! - [`SendTx`] / [`TxReceiptPoller`] — wait for a transaction to reach a
//!   confirmation depth, receipts come back with decoded logs
//! - [`Contract::logs`] / [`LogPoller`] / [`LogSubscription`] — one
//!   `waitforlogs` round, or a continuous cancellable feed
//! - [`LogEmitter`] / [`EmitterFeed`] — republish decoded entries on
//!   per-event channels
//! - [`ContractBuilder`] / [`ContractConfig`] — construction and tunables

pub mod builder;
pub mod config;
pub mod confirm;
pub mod contract;
pub mod emitter;
pub mod logs;
pub mod options;
pub mod receipt;

pub use builder::ContractBuilder;
pub use config::{ContractConfig, DEFAULT_CONFIRMATIONS};
pub use confirm::{ConfirmState, SendTx, TxReceiptPoller};
pub use contract::{CallResult, Contract};
pub use emitter::{EmitterFeed, LogEmitter, CATCH_ALL_CHANNEL};
pub use logs::{LogHandler, LogPoller, LogSubscription};
pub use options::{CallOptions, LogOptions, SendOptions};
pub use receipt::{shape_logs, shape_receipt};

pub use chaincontract_core::{
    AbiEntry, AbiParam, BlockPosition, ConfirmedReceipt, ContractError, ContractEvent, ContractInfo,
    ContractLogEntry, ContractLogs, ContractTransport, DecodedLog, LogFilter, NormalizedValue,
    QtumRpc, TransactionInfo,
};
pub use chaincontract_evm::EvmAbiCodec;
pub use chaincontract_rpc::{HttpClientConfig, HttpRpcClient, TransportError};
