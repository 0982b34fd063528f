//! Error types for contract dispatch, codec work and node transport.

use thiserror::Error;

pub use chaincontract_rpc::TransportError;

/// Which view of the method index a lookup went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodIndexKind {
    /// Every function of the ABI.
    Call,
    /// State-changing functions only.
    Send,
}

impl std::fmt::Display for MethodIndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Send => write!(f, "send"),
        }
    }
}

/// Errors raised by an ABI codec.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid ABI type '{ty}': {reason}")]
    InvalidType { ty: String, reason: String },

    #[error("Argument count mismatch for '{method}': ABI has {expected}, got {got}")]
    ArityMismatch {
        method: String,
        expected: usize,
        got: usize,
    },

    #[error("Cannot encode argument '{param}' of '{method}': {reason}")]
    Encode {
        method: String,
        param: String,
        reason: String,
    },

    #[error("ABI decode failed: {reason}")]
    Decode { reason: String },

    /// A log entry does not match any event of the interface description.
    #[error("Log does not match any known event: {reason}")]
    DecodeMismatch { reason: String },

    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// Errors surfaced by contract operations.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Method not present in the index consulted; no network call was made.
    #[error("Unknown method '{method}' (not in {index} index)")]
    UnknownMethod {
        method: String,
        index: MethodIndexKind,
    },

    /// Two overloads share both name and arity, so lookups cannot choose.
    #[error("Ambiguous overload: '{method}' declared twice with {arity} argument(s)")]
    AmbiguousOverload { method: String, arity: usize },

    /// The VM reported an exception; `excepted` is the node's status string.
    #[error("Call exception: {excepted}{}", message_suffix(.message))]
    ExecutionReverted {
        excepted: String,
        message: Option<String>,
    },

    /// The node transport failed; propagated unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(" ({m})"),
        _ => String::new(),
    }
}

impl ContractError {
    pub fn unknown(method: impl Into<String>, index: MethodIndexKind) -> Self {
        Self::UnknownMethod {
            method: method.into(),
            index,
        }
    }

    /// Returns `true` if the error came from the node transport.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if the VM rejected the execution.
    pub fn is_reverted(&self) -> bool {
        matches!(self, Self::ExecutionReverted { .. })
    }
}
