//! Contract engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Confirmation depth used when the caller does not ask for one.
pub const DEFAULT_CONFIRMATIONS: u64 = 6;

/// Tunables shared by every operation of one `Contract`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Delay between `gettransaction` polls while confirming.
    #[serde(default = "default_confirm_poll_interval_ms")]
    pub confirm_poll_interval_ms: u64,
    /// Target depth for `SendTx::confirm_default`.
    #[serde(default = "default_confirmations")]
    pub default_confirmations: u64,
    /// Gas limit for sends that do not set one.
    #[serde(default = "default_gas_limit")]
    pub default_gas_limit: u64,
    /// Gas price in QTUM for sends that do not set one.
    #[serde(default = "default_gas_price")]
    pub default_gas_price: f64,
    /// Buffer size of each `LogEmitter` channel.
    #[serde(default = "default_emitter_capacity")]
    pub emitter_capacity: usize,
}

fn default_confirm_poll_interval_ms() -> u64 { 3_000 }
fn default_confirmations() -> u64 { DEFAULT_CONFIRMATIONS }
fn default_gas_limit() -> u64 { 200_000 }
fn default_gas_price() -> f64 { 0.000_000_4 }
fn default_emitter_capacity() -> usize { 1_024 }

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            confirm_poll_interval_ms: default_confirm_poll_interval_ms(),
            default_confirmations: default_confirmations(),
            default_gas_limit: default_gas_limit(),
            default_gas_price: default_gas_price(),
            emitter_capacity: default_emitter_capacity(),
        }
    }
}

impl ContractConfig {
    pub fn confirm_poll_interval(&self) -> Duration {
        Duration::from_millis(self.confirm_poll_interval_ms)
    }
}
