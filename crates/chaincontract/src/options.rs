//! Per-call options for `call`, `send` and the log operations.

use chaincontract_core::{BlockPosition, LogFilter};
use serde::{Deserialize, Serialize};

/// Options for a read-only call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallOptions {
    /// Overrides the descriptor's default sender.
    pub sender: Option<String>,
    pub gas_limit: Option<u64>,
    /// QTUM attached to the simulated call.
    pub amount: Option<f64>,
}

impl CallOptions {
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }
}

/// Options for a state-changing send. Unset gas fields fall back to the
/// contract's `ContractConfig`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendOptions {
    /// QTUM sent along with the call.
    pub amount: Option<f64>,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<f64>,
    pub sender: Option<String>,
}

impl SendOptions {
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }
}

/// Options for `logs` and the continuous log feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogOptions {
    /// First block; `None` means the chain tip.
    pub from: Option<BlockPosition>,
    /// Last block; `None` means no upper bound.
    pub to: Option<BlockPosition>,
    /// Address/topic filter. Without `addresses` the contract's own
    /// address is used; an explicit list, even empty, is kept.
    pub filter: Option<LogFilter>,
    pub minconf: Option<u64>,
}

impl LogOptions {
    pub fn from_block(mut self, from: impl Into<BlockPosition>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn filter(mut self, filter: LogFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn minconf(mut self, minconf: u64) -> Self {
        self.minconf = Some(minconf);
        self
    }
}
