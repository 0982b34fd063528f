//! Contract descriptor — the ABI entries plus where the contract lives.
//!
//! The JSON shape is the standard Solidity ABI with two extra top-level
//! fields:
//!
//! ```json
//! {
//!   "address": "bd3a3d87ac9e3a12b4ed5e5d4e2c4c4b8e1f0a2c",
//!   "sender": "qUbxboqjBRp96j3La8D1RYkyqx5uQbJPoW",
//!   "abi": [ { "type": "function", "name": "balanceOf", ... } ]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Kind of an ABI entry. Missing `type` means `function`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbiEntryKind {
    #[default]
    Function,
    Event,
    Constructor,
    Fallback,
    Receive,
    Error,
}

/// Solidity `stateMutability`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    Nonpayable,
    Payable,
}

/// A single input/output parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    /// Solidity type, e.g. `uint256`, `address[]`, `tuple`, `tuple[2]`.
    #[serde(rename = "type")]
    pub ty: String,
    /// Event parameters only.
    #[serde(default)]
    pub indexed: bool,
    /// Members of a `tuple` type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<AbiParam>,
}

impl AbiParam {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            indexed: false,
            components: vec![],
        }
    }

    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    /// The canonical type string used in signatures, with tuples expanded:
    /// `tuple[]` with components `(address,uint256)` → `(address,uint256)[]`.
    pub fn canonical_type(&self) -> String {
        match self.ty.strip_prefix("tuple") {
            Some(suffix) => {
                let inner: Vec<String> =
                    self.components.iter().map(AbiParam::canonical_type).collect();
                format!("({}){suffix}", inner.join(","))
            }
            None => self.ty.clone(),
        }
    }

    /// Indexed reference types are stored as a hash in the topic.
    pub fn is_hashed_when_indexed(&self) -> bool {
        self.ty == "string"
            || self.ty == "bytes"
            || self.ty.ends_with(']')
            || self.ty.starts_with("tuple")
    }
}

/// One entry of the ABI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiEntry {
    #[serde(rename = "type", default)]
    pub kind: AbiEntryKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    /// Legacy (pre-0.5 solc) mutability flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<StateMutability>,
    /// Events only.
    #[serde(default)]
    pub anonymous: bool,
}

impl AbiEntry {
    /// Shorthand for a function entry; used heavily in tests.
    pub fn function(
        name: impl Into<String>,
        inputs: Vec<AbiParam>,
        outputs: Vec<AbiParam>,
        mutability: StateMutability,
    ) -> Self {
        Self {
            kind: AbiEntryKind::Function,
            name: name.into(),
            inputs,
            outputs,
            constant: None,
            payable: None,
            state_mutability: Some(mutability),
            anonymous: false,
        }
    }

    /// Shorthand for an event entry.
    pub fn event(name: impl Into<String>, inputs: Vec<AbiParam>) -> Self {
        Self {
            kind: AbiEntryKind::Event,
            name: name.into(),
            inputs,
            outputs: vec![],
            constant: None,
            payable: None,
            state_mutability: None,
            anonymous: false,
        }
    }

    /// `true` if calling this entry cannot change state.
    ///
    /// `stateMutability` wins when present; otherwise the legacy `constant`
    /// flag decides. No flag at all means state-changing.
    pub fn is_constant(&self) -> bool {
        match self.state_mutability {
            Some(m) => matches!(m, StateMutability::Pure | StateMutability::View),
            None => self.constant.unwrap_or(false),
        }
    }

    /// Canonical signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(AbiParam::canonical_type).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// Canonical output types, e.g. `["uint256"]`.
    pub fn output_types(&self) -> Vec<String> {
        self.outputs.iter().map(AbiParam::canonical_type).collect()
    }
}

/// Everything needed to talk to one deployed contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub abi: Vec<AbiEntry>,
    /// Contract address: 40 lowercase hex chars, no `0x`.
    pub address: String,
    /// Default sender (base58 Qtum address) used when a call does not
    /// specify one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

impl ContractInfo {
    /// Build a descriptor. A leading `0x` on `address` is stripped and the
    /// hex is lowercased, the form qtumd reports in receipts and logs.
    pub fn new(abi: Vec<AbiEntry>, address: impl Into<String>) -> Self {
        let address = address.into();
        let address = address
            .strip_prefix("0x")
            .or_else(|| address.strip_prefix("0X"))
            .unwrap_or(&address)
            .to_ascii_lowercase();
        Self {
            abi,
            address,
            sender: None,
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Parse a descriptor from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let info: ContractInfo = serde_json::from_str(json)?;
        Ok(Self::new(info.abi, info.address).with_optional_sender(info.sender))
    }

    fn with_optional_sender(mut self, sender: Option<String>) -> Self {
        self.sender = sender;
        self
    }

    pub fn functions(&self) -> impl Iterator<Item = &AbiEntry> {
        self.abi.iter().filter(|e| e.kind == AbiEntryKind::Function)
    }

    pub fn events(&self) -> impl Iterator<Item = &AbiEntry> {
        self.abi.iter().filter(|e| e.kind == AbiEntryKind::Event)
    }
}
