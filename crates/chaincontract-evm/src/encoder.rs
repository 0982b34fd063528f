//! `NormalizedValue` → alloy `DynSolValue`, and ABI type resolution.

use std::str::FromStr;

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, B256, I256, U256};
use chaincontract_core::{AbiParam, CodecError};

/// Resolve an ABI parameter (tuples expanded) into an alloy type.
pub fn resolve_type(param: &AbiParam) -> Result<DynSolType, CodecError> {
    let ty = param.canonical_type();
    parse_type(&ty)
}

pub fn parse_type(ty: &str) -> Result<DynSolType, CodecError> {
    ty.parse()
        .map_err(|e: alloy_dyn_abi::Error| CodecError::InvalidType {
            ty: ty.to_string(),
            reason: e.to_string(),
        })
}

/// The parameter list as one tuple type, the shape of call data and return
/// data after the selector.
pub fn tuple_type(params: &[AbiParam]) -> Result<DynSolType, CodecError> {
    let types = params.iter().map(resolve_type).collect::<Result<Vec<_>, _>>()?;
    Ok(DynSolType::Tuple(types))
}

/// Convert a `NormalizedValue` to the alloy `DynSolValue` for the given expected type.
pub fn normalized_to_dyn_value(
    val: &chaincontract_core::NormalizedValue,
    expected: &DynSolType,
) -> Result<DynSolValue, String> {
    use chaincontract_core::NormalizedValue as V;

    match (val, expected) {
        (V::Bool(b), DynSolType::Bool) => Ok(DynSolValue::Bool(*b)),

        (V::Uint(u), DynSolType::Uint(bits)) => {
            let u = U256::from(*u);
            check_uint_width(u, *bits)?;
            Ok(DynSolValue::Uint(u, *bits))
        }
        (V::BigUint(s), DynSolType::Uint(bits)) => {
            let u = U256::from_str(s).map_err(|e| format!("BigUint parse: {e}"))?;
            check_uint_width(u, *bits)?;
            Ok(DynSolValue::Uint(u, *bits))
        }

        (V::Int(i), DynSolType::Int(bits)) => {
            let i = I256::try_from(*i).map_err(|e| e.to_string())?;
            check_int_width(i, *bits)?;
            Ok(DynSolValue::Int(i, *bits))
        }
        (V::BigInt(s), DynSolType::Int(bits)) => {
            let i = I256::from_str(s).map_err(|e| format!("BigInt parse: {e}"))?;
            check_int_width(i, *bits)?;
            Ok(DynSolValue::Int(i, *bits))
        }
        // non-negative literal for a signed slot
        (V::Uint(u), DynSolType::Int(bits)) => {
            let i = I256::try_from(U256::from(*u)).map_err(|e| e.to_string())?;
            check_int_width(i, *bits)?;
            Ok(DynSolValue::Int(i, *bits))
        }

        (V::Address(s), DynSolType::Address) => {
            let hex = s.strip_prefix("0x").unwrap_or(s);
            let addr = Address::from_str(hex).map_err(|e| format!("address parse: {e}"))?;
            Ok(DynSolValue::Address(addr))
        }

        (V::Bytes(b), DynSolType::Bytes) => Ok(DynSolValue::Bytes(b.clone())),

        (V::Bytes(b), DynSolType::FixedBytes(n)) => {
            if b.len() != *n {
                return Err(format!("bytes{n}: got {} bytes", b.len()));
            }
            let mut word = [0u8; 32];
            word[..b.len()].copy_from_slice(b);
            Ok(DynSolValue::FixedBytes(B256::from(word), *n))
        }

        (V::Str(s), DynSolType::String) => Ok(DynSolValue::String(s.clone())),

        (V::Array(elems), DynSolType::Array(inner)) => {
            let dyn_elems: Result<Vec<_>, _> =
                elems.iter().map(|e| normalized_to_dyn_value(e, inner)).collect();
            Ok(DynSolValue::Array(dyn_elems?))
        }

        (V::Array(elems), DynSolType::FixedArray(inner, len)) => {
            if elems.len() != *len {
                return Err(format!("fixed array length mismatch: expected {len}, got {}", elems.len()));
            }
            let dyn_elems: Result<Vec<_>, _> =
                elems.iter().map(|e| normalized_to_dyn_value(e, inner)).collect();
            Ok(DynSolValue::FixedArray(dyn_elems?))
        }

        (V::Tuple(fields), DynSolType::Tuple(types)) => {
            if fields.len() != types.len() {
                return Err(format!("tuple arity mismatch: expected {}, got {}", types.len(), fields.len()));
            }
            let dyn_elems: Result<Vec<_>, _> = fields
                .iter()
                .zip(types.iter())
                .map(|((_, v), t)| normalized_to_dyn_value(v, t))
                .collect();
            Ok(DynSolValue::Tuple(dyn_elems?))
        }

        _ => Err(format!("cannot convert {val} to {expected}")),
    }
}

fn check_uint_width(u: U256, bits: usize) -> Result<(), String> {
    if bits < 256 && u.bit_len() > bits {
        return Err(format!("value {u} does not fit in uint{bits}"));
    }
    Ok(())
}

/// Two's-complement range of `int{bits}`: [-2^(bits-1), 2^(bits-1) - 1].
fn check_int_width(i: I256, bits: usize) -> Result<(), String> {
    if bits >= 256 {
        return Ok(());
    }
    let limit = U256::from(1u8) << (bits - 1);
    let magnitude = i.unsigned_abs();
    let fits = if i.is_negative() {
        magnitude <= limit
    } else {
        magnitude < limit
    };
    if !fits {
        return Err(format!("value {i} does not fit in int{bits}"));
    }
    Ok(())
}

/// ABI-encode `args` against `params` (no selector).
pub fn encode_params(
    method: &str,
    params: &[AbiParam],
    args: &[chaincontract_core::NormalizedValue],
) -> Result<Vec<u8>, CodecError> {
    if args.len() != params.len() {
        return Err(CodecError::ArityMismatch {
            method: method.to_string(),
            expected: params.len(),
            got: args.len(),
        });
    }

    let mut values = Vec::with_capacity(args.len());
    for (i, (param, arg)) in params.iter().zip(args).enumerate() {
        let sol_type = resolve_type(param)?;
        let value = normalized_to_dyn_value(arg, &sol_type).map_err(|reason| CodecError::Encode {
            method: method.to_string(),
            param: if param.name.is_empty() { i.to_string() } else { param.name.clone() },
            reason,
        })?;
        values.push(value);
    }

    Ok(DynSolValue::Tuple(values).abi_encode_params())
}
