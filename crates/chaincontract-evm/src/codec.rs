//! `EvmAbiCodec` — the `AbiCodec` implementation for Qtum's EVM.

use std::collections::HashMap;

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use chaincontract_core::{
    AbiCodec, AbiEntry, AbiParam, CodecError, ContractEvent, ContractInfo, NormalizedValue, RawLog,
};

use crate::encoder::{encode_params, resolve_type, tuple_type};
use crate::{fingerprint, normalizer};

/// Encoder/decoder for one contract's ABI.
///
/// Events are indexed by topic[0] at construction; anonymous events have no
/// topic[0] and are tried in declaration order when no signature matches.
#[derive(Debug, Clone, Default)]
pub struct EvmAbiCodec {
    events: HashMap<String, AbiEntry>,
    anonymous: Vec<AbiEntry>,
}

impl EvmAbiCodec {
    pub fn new(info: &ContractInfo) -> Self {
        Self::from_entries(info.events())
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a AbiEntry>) -> Self {
        let mut events = HashMap::new();
        let mut anonymous = Vec::new();
        for entry in entries {
            if entry.kind != chaincontract_core::AbiEntryKind::Event {
                continue;
            }
            if entry.anonymous {
                anonymous.push(entry.clone());
            } else {
                events.insert(fingerprint::event_topic(&entry.signature()), entry.clone());
            }
        }
        Self { events, anonymous }
    }

    /// Number of events the codec can recognize.
    pub fn event_count(&self) -> usize {
        self.events.len() + self.anonymous.len()
    }

    fn decode_with(&self, event: &AbiEntry, topics: &[String], data: &[u8]) -> Result<ContractEvent, CodecError> {
        let indexed_count = event.inputs.iter().filter(|p| p.indexed).count();
        if topics.len() < indexed_count {
            return Err(CodecError::DecodeMismatch {
                reason: format!(
                    "event '{}' has {indexed_count} indexed params, log has {} topics",
                    event.name,
                    topics.len()
                ),
            });
        }

        let data_params: Vec<AbiParam> = event.inputs.iter().filter(|p| !p.indexed).cloned().collect();
        let mut data_values = decode_tuple(&data_params, data)?.into_iter();
        let mut topics = topics.iter();

        let mut fields = Vec::with_capacity(event.inputs.len());
        for (i, param) in event.inputs.iter().enumerate() {
            let name = if param.name.is_empty() { i.to_string() } else { param.name.clone() };
            let value = if param.indexed {
                let topic = topics.next().ok_or_else(|| CodecError::Decode {
                    reason: format!("missing topic for '{name}'"),
                })?;
                decode_topic(param, topic)?
            } else {
                data_values.next().ok_or_else(|| CodecError::Decode {
                    reason: format!("missing data value for '{name}'"),
                })?
            };
            fields.push((name, value));
        }

        Ok(ContractEvent {
            name: event.name.clone(),
            fields,
        })
    }
}

/// Decode `data` as the ABI tuple described by `params`, naming tuple
/// members after their components.
fn decode_tuple(params: &[AbiParam], data: &[u8]) -> Result<Vec<NormalizedValue>, CodecError> {
    if params.is_empty() {
        return Ok(vec![]);
    }
    let decoded = tuple_type(params)?
        .abi_decode_params(data)
        .map_err(|e| CodecError::Decode { reason: e.to_string() })?;
    let values = match decoded {
        DynSolValue::Tuple(vals) => vals,
        other => vec![other],
    };
    Ok(params
        .iter()
        .zip(values)
        .map(|(p, v)| normalizer::normalize_param(p, v))
        .collect())
}

/// Decode one indexed topic (always 32 bytes).
///
/// Value types are stored padded and can be recovered. Reference types
/// (string, bytes, arrays, tuples) are stored as keccak256 of their encoding;
/// the hash is returned as `Bytes`.
fn decode_topic(param: &AbiParam, topic: &str) -> Result<NormalizedValue, CodecError> {
    let hex = topic.strip_prefix("0x").unwrap_or(topic);
    let bytes = hex::decode(hex)?;
    if param.is_hashed_when_indexed() {
        return Ok(NormalizedValue::Bytes(bytes));
    }
    let ty: DynSolType = resolve_type(param)?;
    ty.abi_decode(&bytes)
        .map(normalizer::normalize)
        .map_err(|e| CodecError::Decode {
            reason: format!("topic for '{}': {e}", param.name),
        })
}

impl AbiCodec for EvmAbiCodec {
    fn encode_call(&self, method: &AbiEntry, args: &[NormalizedValue]) -> Result<Vec<u8>, CodecError> {
        let encoded = encode_params(&method.name, &method.inputs, args)?;
        let mut calldata = fingerprint::selector(&method.signature()).to_vec();
        calldata.extend_from_slice(&encoded);
        Ok(calldata)
    }

    fn decode_call(&self, method: &AbiEntry, calldata: &[u8]) -> Result<Vec<NormalizedValue>, CodecError> {
        if calldata.len() < 4 {
            return Err(CodecError::Decode {
                reason: format!("calldata too short: {} bytes", calldata.len()),
            });
        }
        let expected = fingerprint::selector(&method.signature());
        if calldata[..4] != expected {
            return Err(CodecError::DecodeMismatch {
                reason: format!(
                    "selector 0x{} is not {} (0x{})",
                    hex::encode(&calldata[..4]),
                    method.signature(),
                    hex::encode(expected)
                ),
            });
        }
        decode_tuple(&method.inputs, &calldata[4..])
    }

    fn decode_outputs(&self, method: &AbiEntry, output: &[u8]) -> Result<Vec<NormalizedValue>, CodecError> {
        if output.is_empty() {
            return Ok(vec![]);
        }
        decode_tuple(&method.outputs, output)
    }

    fn decode_log(&self, log: &RawLog) -> Result<ContractEvent, CodecError> {
        let data_hex = log.data.strip_prefix("0x").unwrap_or(&log.data);
        let data = hex::decode(data_hex)?;

        if let Some(topic0) = log.topics.first().and_then(|t| fingerprint::normalize_topic(t)) {
            if let Some(event) = self.events.get(&topic0) {
                return self.decode_with(event, &log.topics[1..], &data);
            }
        }

        for event in &self.anonymous {
            let indexed = event.inputs.iter().filter(|p| p.indexed).count();
            if indexed != log.topics.len() {
                continue;
            }
            if let Ok(decoded) = self.decode_with(event, &log.topics, &data) {
                return Ok(decoded);
            }
        }

        Err(CodecError::DecodeMismatch {
            reason: match log.topics.first() {
                Some(t) => format!("unknown event topic {t}"),
                None => "log has no topics".to_string(),
            },
        })
    }
}
