//! # chaincontract-evm
//!
//! EVM ABI codec implementing the `AbiCodec` trait for Qtum contracts.
//!
//! ## Implementation notes
//! - Uses `alloy-core` dynamic ABI types; type strings come straight from
//!   the contract descriptor
//! - Call data → `keccak256(signature)[..4]` ++ ABI-encoded argument tuple
//! - Topics[0] → event signature (keccak256); absent for anonymous events
//! - Topics[1..] → indexed parameters (each 32 bytes, ABI-encoded)
//! - `data` → non-indexed parameters (ABI-encoded tuple)

pub mod codec;
pub mod encoder;
pub mod fingerprint;
pub mod normalizer;

pub use codec::EvmAbiCodec;
