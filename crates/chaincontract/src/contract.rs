//! `Contract` — dispatches named methods to the node and shapes results.
//!
//! Every method name is looked up before any I/O: the call index holds all
//! functions, the send index only the state-changing ones. Unknown names
//! fail with `ContractError::UnknownMethod` without touching the transport.

use std::future::Future;
use std::sync::Arc;

use chaincontract_core::{
    decode_outputs_hex, encode_call_hex, AbiCodec, AbiEntry, CallContractRequest, CallContractResult,
    ContractError, ContractInfo, ContractLogs, ContractTransport, LogFilter, MethodIndex,
    NormalizedValue, SendToContractRequest, SendToContractResult, WaitForLogsRequest,
};
use chaincontract_evm::EvmAbiCodec;

use crate::builder::ContractBuilder;
use crate::config::ContractConfig;
use crate::confirm::{SendTx, TxReceiptPoller};
use crate::emitter::{EmitterFeed, LogEmitter};
use crate::logs::{LogHandler, LogPoller, LogSubscription};
use crate::options::{CallOptions, LogOptions, SendOptions};
use crate::receipt::shape_logs;

/// Result of a read-only call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallResult {
    /// The node's response, unmodified.
    pub raw: CallContractResult,
    /// Return values decoded against the method's outputs. Empty when the
    /// node returned no output.
    pub outputs: Vec<NormalizedValue>,
}

impl CallResult {
    /// First return value, for the common single-output case.
    pub fn first(&self) -> Option<&NormalizedValue> {
        self.outputs.first()
    }
}

/// A deployed contract bound to a node.
///
/// Cheap to clone: the descriptor, method index, codec and transport are
/// shared.
#[derive(Clone)]
pub struct Contract {
    info: Arc<ContractInfo>,
    methods: Arc<MethodIndex>,
    transport: Arc<dyn ContractTransport>,
    codec: Arc<dyn AbiCodec>,
    config: Arc<ContractConfig>,
}

impl std::fmt::Debug for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contract")
            .field("address", &self.info.address)
            .field("sender", &self.info.sender)
            .field("config", &self.config)
            .finish()
    }
}

impl Contract {
    /// Bind `info` to `transport` with the EVM codec and default config.
    pub fn new(info: ContractInfo, transport: Arc<dyn ContractTransport>) -> Result<Self, ContractError> {
        let codec = Arc::new(EvmAbiCodec::new(&info));
        Self::with_parts(info, transport, codec, ContractConfig::default())
    }

    pub fn builder() -> ContractBuilder {
        ContractBuilder::new()
    }

    /// Build from explicit parts. Fails if the ABI declares two functions
    /// with the same name and argument count.
    pub fn with_parts(
        info: ContractInfo,
        transport: Arc<dyn ContractTransport>,
        codec: Arc<dyn AbiCodec>,
        config: ContractConfig,
    ) -> Result<Self, ContractError> {
        let methods = MethodIndex::build(&info)?;
        Ok(Self {
            info: Arc::new(info),
            methods: Arc::new(methods),
            transport,
            codec,
            config: Arc::new(config),
        })
    }

    pub fn info(&self) -> &ContractInfo {
        &self.info
    }

    pub fn address(&self) -> &str {
        &self.info.address
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn methods(&self) -> &MethodIndex {
        &self.methods
    }

    pub fn codec(&self) -> &dyn AbiCodec {
        self.codec.as_ref()
    }

    fn call_entry(&self, method: &str, args: &[NormalizedValue]) -> Result<Arc<AbiEntry>, ContractError> {
        Ok(self.methods.lookup_call(method, args.len())?.abi().clone())
    }

    fn send_entry(&self, method: &str, args: &[NormalizedValue]) -> Result<Arc<AbiEntry>, ContractError> {
        Ok(self.methods.lookup_send(method, args.len())?.abi().clone())
    }

    fn sender(&self, explicit: Option<String>) -> Option<String> {
        explicit.or_else(|| self.info.sender.clone())
    }

    /// ABI-encode a call to `method` as bare hex. No I/O.
    pub fn encode_params(&self, method: &str, args: &[NormalizedValue]) -> Result<String, ContractError> {
        let entry = self.call_entry(method, args)?;
        Ok(encode_call_hex(self.codec.as_ref(), &entry, args)?)
    }

    async fn call_with_entry(
        &self,
        entry: &AbiEntry,
        args: &[NormalizedValue],
        opts: CallOptions,
    ) -> Result<CallContractResult, ContractError> {
        let datahex = encode_call_hex(self.codec.as_ref(), entry, args)?;
        let req = CallContractRequest {
            address: self.info.address.clone(),
            datahex,
            sender: self.sender(opts.sender),
            gas_limit: opts.gas_limit,
            amount: opts.amount,
        };
        tracing::debug!(address = %req.address, method = %entry.name, "callcontract");
        Ok(self.transport.call_contract(req).await?)
    }

    /// Execute `method` read-only and return the node's result unmodified.
    pub async fn raw_call(
        &self,
        method: &str,
        args: &[NormalizedValue],
        opts: CallOptions,
    ) -> Result<CallContractResult, ContractError> {
        let entry = self.call_entry(method, args)?;
        self.call_with_entry(&entry, args, opts).await
    }

    /// Execute `method` read-only and decode its return values.
    ///
    /// A VM exception becomes `ExecutionReverted` whatever the output holds.
    pub async fn call(
        &self,
        method: &str,
        args: &[NormalizedValue],
        opts: CallOptions,
    ) -> Result<CallResult, ContractError> {
        let entry = self.call_entry(method, args)?;
        let raw = self.call_with_entry(&entry, args, opts).await?;

        let exec = &raw.execution_result;
        if exec.is_exception() {
            tracing::debug!(method, excepted = %exec.excepted, "call reverted");
            return Err(ContractError::ExecutionReverted {
                excepted: exec.excepted.clone(),
                message: exec.excepted_message.clone(),
            });
        }

        let outputs = decode_outputs_hex(self.codec.as_ref(), &entry, &exec.output)?;
        Ok(CallResult { raw, outputs })
    }

    async fn send_with_entry(
        &self,
        entry: &AbiEntry,
        args: &[NormalizedValue],
        opts: SendOptions,
    ) -> Result<SendToContractResult, ContractError> {
        let datahex = encode_call_hex(self.codec.as_ref(), entry, args)?;
        let req = SendToContractRequest {
            address: self.info.address.clone(),
            datahex,
            amount: opts.amount.unwrap_or(0.0),
            gas_limit: opts.gas_limit.unwrap_or(self.config.default_gas_limit),
            gas_price: opts.gas_price.unwrap_or(self.config.default_gas_price),
            sender: self.sender(opts.sender),
        };
        tracing::debug!(
            address = %req.address,
            method = %entry.name,
            gas_limit = req.gas_limit,
            "sendtocontract"
        );
        Ok(self.transport.send_to_contract(req).await?)
    }

    /// Submit a transaction calling `method` and return the node's result
    /// unmodified. Constant methods are rejected before any I/O.
    pub async fn raw_send(
        &self,
        method: &str,
        args: &[NormalizedValue],
        opts: SendOptions,
    ) -> Result<SendToContractResult, ContractError> {
        let entry = self.send_entry(method, args)?;
        self.send_with_entry(&entry, args, opts).await
    }

    /// Submit a transaction and return a handle that can wait for it to be
    /// confirmed.
    pub async fn send(
        &self,
        method: &str,
        args: &[NormalizedValue],
        opts: SendOptions,
    ) -> Result<SendTx, ContractError> {
        let entry = self.send_entry(method, args)?;
        let sent = self.send_with_entry(&entry, args, opts).await?;
        let transaction = self.transport.get_transaction(&sent.txid).await?;
        tracing::info!(txid = %sent.txid, method, "transaction submitted");

        let poller = TxReceiptPoller::new(
            self.transport.clone(),
            self.codec.clone(),
            sent.txid,
            self.config.confirm_poll_interval(),
        );
        Ok(SendTx::new(
            transaction,
            entry.name.clone(),
            sent.sender,
            sent.hash160,
            self.config.default_confirmations,
            poller,
        ))
    }

    /// One `waitforlogs` round, decoded. Without explicit filter addresses
    /// the query is restricted to this contract.
    pub async fn logs(&self, opts: LogOptions) -> Result<ContractLogs, ContractError> {
        let mut filter = opts.filter.unwrap_or_default();
        if filter.addresses.is_none() {
            filter.addresses = LogFilter::addresses([self.info.address.as_str()]).addresses;
        }
        let req = WaitForLogsRequest {
            from: opts.from,
            to: opts.to,
            filter: Some(filter),
            minconf: opts.minconf,
        };
        let result = self.transport.wait_for_logs(req).await?;
        Ok(shape_logs(self.codec.as_ref(), result))
    }

    /// Feed decoded logs to `handler` until `shutdown` resolves or the
    /// transport fails.
    pub async fn on_log<H, S>(&self, handler: H, opts: LogOptions, shutdown: S) -> Result<(), ContractError>
    where
        H: LogHandler,
        S: Future + Send,
    {
        LogPoller::new(self.clone(), handler, opts).run_until(shutdown).await
    }

    /// Run the log feed on a background task.
    pub fn spawn_on_log<H: LogHandler>(&self, handler: H, opts: LogOptions) -> LogSubscription {
        LogSubscription::spawn(LogPoller::new(self.clone(), handler, opts))
    }

    /// Prepare a log feed that republishes entries on per-event channels.
    ///
    /// Polling begins at [`EmitterFeed::start`], after the caller has
    /// subscribed.
    pub fn log_emitter(&self, opts: LogOptions) -> EmitterFeed {
        let emitter = LogEmitter::new(self.config.emitter_capacity);
        EmitterFeed::new(emitter.clone(), LogPoller::new(self.clone(), emitter, opts))
    }
}
