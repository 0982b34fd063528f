//! Converts alloy `DynSolValue` → `NormalizedValue`.
//!
//! Addresses come out in the bare 40-hex form qtumd uses. Tuple members take
//! their names from the ABI `components` when available.

use alloy_core::dyn_abi::DynSolValue;
use chaincontract_core::{AbiParam, NormalizedValue};

/// Convert a decoded `DynSolValue` into a `NormalizedValue`. Tuple members
/// get positional names `"0"`, `"1"`, ...
pub fn normalize(val: DynSolValue) -> NormalizedValue {
    match val {
        DynSolValue::Bool(b) => NormalizedValue::Bool(b),

        DynSolValue::Int(i, _bits) => match i128::try_from(i) {
            Ok(v) => NormalizedValue::Int(v),
            Err(_) => NormalizedValue::BigInt(i.to_string()),
        },

        DynSolValue::Uint(u, _bits) => match u128::try_from(u) {
            Ok(v) => NormalizedValue::Uint(v),
            Err(_) => NormalizedValue::BigUint(u.to_string()),
        },

        DynSolValue::FixedBytes(word, size) => NormalizedValue::Bytes(word[..size].to_vec()),

        DynSolValue::Bytes(b) => NormalizedValue::Bytes(b),

        DynSolValue::String(s) => NormalizedValue::Str(s),

        DynSolValue::Address(a) => NormalizedValue::Address(hex::encode(a.as_slice())),

        DynSolValue::Array(vals) | DynSolValue::FixedArray(vals) => {
            NormalizedValue::Array(vals.into_iter().map(normalize).collect())
        }

        DynSolValue::Tuple(fields) => NormalizedValue::Tuple(
            fields
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), normalize(v)))
                .collect(),
        ),

        DynSolValue::Function(f) => NormalizedValue::Bytes(f.to_vec()),
    }
}

/// Like [`normalize`], but names tuple members after `param`'s components,
/// descending through arrays of tuples.
pub fn normalize_param(param: &AbiParam, val: DynSolValue) -> NormalizedValue {
    if param.components.is_empty() {
        return normalize(val);
    }
    match val {
        DynSolValue::Tuple(fields) => NormalizedValue::Tuple(
            fields
                .into_iter()
                .enumerate()
                .map(|(i, v)| match param.components.get(i) {
                    Some(c) if !c.name.is_empty() => (c.name.clone(), normalize_param(c, v)),
                    Some(c) => (i.to_string(), normalize_param(c, v)),
                    None => (i.to_string(), normalize(v)),
                })
                .collect(),
        ),
        DynSolValue::Array(vals) | DynSolValue::FixedArray(vals) => {
            // element type: strip one array suffix, keep the components
            let elem = AbiParam {
                ty: strip_array_suffix(&param.ty).to_string(),
                ..param.clone()
            };
            NormalizedValue::Array(vals.into_iter().map(|v| normalize_param(&elem, v)).collect())
        }
        other => normalize(other),
    }
}

fn strip_array_suffix(ty: &str) -> &str {
    match ty.rfind('[') {
        Some(pos) if ty.ends_with(']') => &ty[..pos],
        _ => ty,
    }
}
