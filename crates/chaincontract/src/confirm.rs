//! Confirmation tracking for submitted contract transactions.
//!
//! A `SendTx` is what `Contract::send` hands back: the node's view of the
//! fresh transaction plus a poller bound to it. Confirming consumes the
//! handle.
//!
//! # States
//! `Submitted` → `Polling` → `Confirmed` | `Failed`
//!
//! While polling, every change in the observed confirmation count (once the
//! transaction is mined) fetches the receipt, shapes it and reports it to
//! the update callback. The receipt that satisfies the target is returned.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chaincontract_core::{AbiCodec, ConfirmedReceipt, ContractError, ContractTransport, TransactionInfo};

use crate::receipt::shape_receipt;

/// Where a confirmation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmState {
    Submitted,
    Polling,
    Confirmed,
    Failed,
}

impl fmt::Display for ConfirmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submitted => write!(f, "submitted"),
            Self::Polling => write!(f, "polling"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Polls `gettransaction` until a transaction reaches a target depth.
pub struct TxReceiptPoller {
    transport: Arc<dyn ContractTransport>,
    codec: Arc<dyn AbiCodec>,
    txid: String,
    poll_interval: Duration,
    state: ConfirmState,
}

impl TxReceiptPoller {
    pub fn new(
        transport: Arc<dyn ContractTransport>,
        codec: Arc<dyn AbiCodec>,
        txid: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            transport,
            codec,
            txid: txid.into(),
            poll_interval,
            state: ConfirmState::Submitted,
        }
    }

    pub fn state(&self) -> ConfirmState {
        self.state
    }

    pub fn txid(&self) -> &str {
        &self.txid
    }

    fn transition(&mut self, next: ConfirmState) {
        tracing::debug!(txid = %self.txid, from = %self.state, to = %next, "confirm state");
        self.state = next;
    }

    /// Poll until the transaction has at least `target` confirmations
    /// (a target of 0 counts as 1).
    ///
    /// `on_update` runs once per observed change of the confirmation count,
    /// in observation order, always before this returns. Transport errors
    /// end the wait and are returned unchanged.
    pub async fn wait<F>(&mut self, target: u64, mut on_update: F) -> Result<ConfirmedReceipt, ContractError>
    where
        F: FnMut(&TransactionInfo, &ConfirmedReceipt) + Send,
    {
        let target = target.max(1);
        let mut last_seen: Option<u64> = None;
        self.transition(ConfirmState::Polling);

        loop {
            let tx = match self.transport.get_transaction(&self.txid).await {
                Ok(tx) => tx,
                Err(e) => {
                    self.transition(ConfirmState::Failed);
                    return Err(e.into());
                }
            };
            let confirmations = tx.confirmed_depth();

            if confirmations >= 1 && last_seen != Some(confirmations) {
                let receipt = match self.transport.get_transaction_receipt(&self.txid).await {
                    Ok(r) => r,
                    Err(e) => {
                        self.transition(ConfirmState::Failed);
                        return Err(e.into());
                    }
                };

                match receipt {
                    Some(receipt) => {
                        last_seen = Some(confirmations);
                        let shaped = shape_receipt(self.codec.as_ref(), &receipt);
                        tracing::debug!(
                            txid = %self.txid,
                            confirmations,
                            target,
                            logs = shaped.logs.len(),
                            "confirmation update"
                        );
                        on_update(&tx, &shaped);

                        if confirmations >= target {
                            self.transition(ConfirmState::Confirmed);
                            tracing::info!(
                                txid = %self.txid,
                                confirmations,
                                block = shaped.header.block_number,
                                "transaction confirmed"
                            );
                            return Ok(shaped);
                        }
                    }
                    None => {
                        tracing::debug!(txid = %self.txid, confirmations, "receipt not available yet");
                    }
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// A submitted transaction awaiting confirmation.
pub struct SendTx {
    /// The node's record of the transaction right after submission.
    pub transaction: TransactionInfo,
    /// ABI name of the method that was sent.
    pub method: String,
    /// Sender address the wallet used.
    pub sender: String,
    /// Sender as hash160 hex.
    pub hash160: String,
    default_confirmations: u64,
    poller: TxReceiptPoller,
}

impl fmt::Debug for SendTx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendTx")
            .field("txid", &self.txid())
            .field("method", &self.method)
            .field("sender", &self.sender)
            .field("confirmations", &self.transaction.confirmations)
            .finish()
    }
}

impl SendTx {
    pub(crate) fn new(
        transaction: TransactionInfo,
        method: String,
        sender: String,
        hash160: String,
        default_confirmations: u64,
        poller: TxReceiptPoller,
    ) -> Self {
        Self {
            transaction,
            method,
            sender,
            hash160,
            default_confirmations,
            poller,
        }
    }

    pub fn txid(&self) -> &str {
        self.poller.txid()
    }

    /// Wait for `confirmations` blocks and return the shaped receipt.
    pub async fn confirm(self, confirmations: u64) -> Result<ConfirmedReceipt, ContractError> {
        self.confirm_with_updates(confirmations, |_, _| {}).await
    }

    /// Wait for the contract's configured default depth.
    pub async fn confirm_default(self) -> Result<ConfirmedReceipt, ContractError> {
        let target = self.default_confirmations;
        self.confirm(target).await
    }

    /// Like [`confirm`](Self::confirm), reporting each confirmation change
    /// to `on_update`.
    pub async fn confirm_with_updates<F>(
        mut self,
        confirmations: u64,
        on_update: F,
    ) -> Result<ConfirmedReceipt, ContractError>
    where
        F: FnMut(&TransactionInfo, &ConfirmedReceipt) + Send,
    {
        tracing::info!(
            txid = %self.txid(),
            method = %self.method,
            confirmations,
            "waiting for confirmations"
        );
        self.poller.wait(confirmations, on_update).await
    }
}
