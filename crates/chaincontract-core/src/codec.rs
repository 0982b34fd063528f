//! The `AbiCodec` trait: turns typed arguments into call data and call
//! output / log records back into typed values.
//!
//! The dispatcher never looks inside the bytes it moves around; everything
//! ABI-specific lives behind this trait so the EVM implementation can be
//! swapped for a mock in tests.

use crate::abi::AbiEntry;
use crate::error::CodecError;
use crate::event::{ContractEvent, DecodedLog};
use crate::types::RawLog;
use crate::value::NormalizedValue;

/// Encoding and decoding against one contract's ABI.
///
/// Object-safe so it can be stored as `Arc<dyn AbiCodec>`.
pub trait AbiCodec: Send + Sync {
    /// Selector followed by the ABI-encoded arguments.
    fn encode_call(&self, method: &AbiEntry, args: &[NormalizedValue]) -> Result<Vec<u8>, CodecError>;

    /// Decode call data (selector + arguments) back into argument values.
    /// Fails if the selector does not belong to `method`.
    fn decode_call(&self, method: &AbiEntry, calldata: &[u8]) -> Result<Vec<NormalizedValue>, CodecError>;

    /// Decode a function's return data into its output values.
    /// Empty `output` decodes to an empty list.
    fn decode_outputs(&self, method: &AbiEntry, output: &[u8]) -> Result<Vec<NormalizedValue>, CodecError>;

    /// Match `log` against the codec's known events and decode it.
    /// Returns `CodecError::DecodeMismatch` when no event matches.
    fn decode_log(&self, log: &RawLog) -> Result<ContractEvent, CodecError>;

    /// Like [`decode_log`](Self::decode_log), but a failure becomes
    /// `DecodedLog::Unrecognized` instead of an error.
    fn try_decode_log(&self, log: &RawLog) -> DecodedLog {
        match self.decode_log(log) {
            Ok(event) => DecodedLog::Recognized(event),
            Err(e) => {
                tracing::debug!(address = %log.address, error = %e, "log not decoded");
                DecodedLog::Unrecognized {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Encode `args` for `method` and return bare hex (no `0x`), the form qtumd
/// expects for `datahex`.
pub fn encode_call_hex(
    codec: &dyn AbiCodec,
    method: &AbiEntry,
    args: &[NormalizedValue],
) -> Result<String, CodecError> {
    if args.len() != method.inputs.len() {
        return Err(CodecError::ArityMismatch {
            method: method.name.clone(),
            expected: method.inputs.len(),
            got: args.len(),
        });
    }
    codec.encode_call(method, args).map(hex::encode)
}

/// Decode hex return data (with or without `0x`).
pub fn decode_outputs_hex(
    codec: &dyn AbiCodec,
    method: &AbiEntry,
    output: &str,
) -> Result<Vec<NormalizedValue>, CodecError> {
    let output = output.strip_prefix("0x").unwrap_or(output);
    if output.is_empty() {
        return Ok(vec![]);
    }
    let bytes = hex::decode(output)?;
    codec.decode_outputs(method, &bytes)
}
