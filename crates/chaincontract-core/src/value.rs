//! The typed value model for contract arguments, outputs and event fields.
//!
//! Qtum runs the EVM, so the value space is the Solidity one. Callers never
//! touch codec-specific representations; everything in and out of a
//! contract is a `NormalizedValue`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A decoded, normalized value.
///
/// Serialized as `{"type": "...", "value": ...}` so argument lists can be
/// written by hand in JSON (the CLI relies on this).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum NormalizedValue {
    Uint(u128),
    /// Large uints (> u128) stored as decimal string
    BigUint(String),
    Int(i128),
    /// Large ints (> i128) stored as decimal string
    BigInt(String),
    Bool(bool),
    Bytes(Vec<u8>),
    Str(String),
    /// 20-byte contract/account address as 40 hex chars. Qtum RPC uses the
    /// bare form; a `0x` prefix is accepted on input.
    Address(String),
    Array(Vec<NormalizedValue>),
    Tuple(Vec<(String, NormalizedValue)>),
    Null,
}

impl NormalizedValue {
    /// Returns `true` if this value is logically null/absent.
    pub fn is_null(&self) -> bool {
        matches!(self, NormalizedValue::Null)
    }

    /// Returns the inner string if this is an Address value.
    pub fn as_address(&self) -> Option<&str> {
        match self {
            NormalizedValue::Address(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Coerce to a u128 if this is a small Uint.
    pub fn as_u128(&self) -> Option<u128> {
        match self {
            NormalizedValue::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NormalizedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NormalizedValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for NormalizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedValue::Uint(v) => write!(f, "{v}"),
            NormalizedValue::BigUint(v) => write!(f, "{v}"),
            NormalizedValue::Int(v) => write!(f, "{v}"),
            NormalizedValue::BigInt(v) => write!(f, "{v}"),
            NormalizedValue::Bool(v) => write!(f, "{v}"),
            NormalizedValue::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            NormalizedValue::Str(s) => write!(f, "{s}"),
            NormalizedValue::Address(a) => write!(f, "{a}"),
            NormalizedValue::Array(v) => {
                let parts: Vec<_> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            NormalizedValue::Tuple(fields) => {
                let parts: Vec<_> = fields.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            NormalizedValue::Null => write!(f, "null"),
        }
    }
}

impl From<bool> for NormalizedValue {
    fn from(b: bool) -> Self {
        NormalizedValue::Bool(b)
    }
}

impl From<u64> for NormalizedValue {
    fn from(v: u64) -> Self {
        NormalizedValue::Uint(v as u128)
    }
}

impl From<u128> for NormalizedValue {
    fn from(v: u128) -> Self {
        NormalizedValue::Uint(v)
    }
}

impl From<&str> for NormalizedValue {
    fn from(s: &str) -> Self {
        NormalizedValue::Str(s.to_string())
    }
}
