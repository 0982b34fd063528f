//! Method index — name → ABI entry lookup, split into a call view and a
//! send view.
//!
//! Every function is callable; only state-changing ones are sendable, so the
//! send view is a subset of the call view. Overloaded names are resolved by
//! argument count.

use std::collections::HashMap;
use std::sync::Arc;

use crate::abi::{AbiEntry, ContractInfo};
use crate::error::{ContractError, MethodIndexKind};

/// A function entry tagged with its mutability class.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodEntry {
    /// `pure`/`view` (or legacy `constant: true`); call only.
    Constant(Arc<AbiEntry>),
    /// May change state; call or send.
    Mutating(Arc<AbiEntry>),
}

impl MethodEntry {
    fn from_abi(entry: &AbiEntry) -> Self {
        let entry = Arc::new(entry.clone());
        if entry.is_constant() {
            Self::Constant(entry)
        } else {
            Self::Mutating(entry)
        }
    }

    pub fn abi(&self) -> &Arc<AbiEntry> {
        match self {
            Self::Constant(e) | Self::Mutating(e) => e,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    fn arity(&self) -> usize {
        self.abi().inputs.len()
    }
}

/// Immutable lookup table built once per contract.
#[derive(Debug, Clone, Default)]
pub struct MethodIndex {
    methods: HashMap<String, Vec<MethodEntry>>,
}

impl MethodIndex {
    /// Index every function entry of `info`.
    ///
    /// Fails with `AmbiguousOverload` if two functions share name and arity.
    pub fn build(info: &ContractInfo) -> Result<Self, ContractError> {
        let mut methods: HashMap<String, Vec<MethodEntry>> = HashMap::new();
        for entry in info.functions() {
            let candidate = MethodEntry::from_abi(entry);
            let overloads = methods.entry(entry.name.clone()).or_default();
            if overloads.iter().any(|m| m.arity() == candidate.arity()) {
                return Err(ContractError::AmbiguousOverload {
                    method: entry.name.clone(),
                    arity: candidate.arity(),
                });
            }
            overloads.push(candidate);
        }
        tracing::debug!(
            address = %info.address,
            methods = methods.len(),
            "method index built"
        );
        Ok(Self { methods })
    }

    /// Resolve `name` in the call view. A name with a single entry resolves
    /// to it whatever `arity` is, so the codec can report the mismatch.
    pub fn lookup_call(&self, name: &str, arity: usize) -> Result<&MethodEntry, ContractError> {
        self.resolve(name, arity, MethodIndexKind::Call)
    }

    /// Resolve `name` in the send view. Constant methods are not part of it.
    pub fn lookup_send(&self, name: &str, arity: usize) -> Result<&MethodEntry, ContractError> {
        self.resolve(name, arity, MethodIndexKind::Send)
    }

    fn resolve(&self, name: &str, arity: usize, kind: MethodIndexKind) -> Result<&MethodEntry, ContractError> {
        let candidates: Vec<&MethodEntry> = self
            .methods
            .get(name)
            .into_iter()
            .flatten()
            .filter(|m| kind == MethodIndexKind::Call || !m.is_constant())
            .collect();

        match candidates.as_slice() {
            [] => Err(ContractError::unknown(name, kind)),
            [only] => Ok(*only),
            many => many
                .iter()
                .find(|m| m.arity() == arity)
                .copied()
                .ok_or_else(|| ContractError::unknown(name, kind)),
        }
    }

    /// Names in the call view.
    pub fn call_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Names in the send view.
    pub fn send_names(&self) -> impl Iterator<Item = &str> {
        self.methods
            .iter()
            .filter(|(_, overloads)| overloads.iter().any(|m| !m.is_constant()))
            .map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
