//! Function selectors and event topics.
//!
//! Both are keccak256 of the canonical signature string:
//!   keccak256("transfer(address,uint256)")[..4] → a9059cbb
//!   keccak256("Transfer(address,address,uint256)") → ddf252ad…b3ef
//!
//! Topics are kept as bare lowercase hex, the form qtumd uses in receipts
//! and `waitforlogs` entries.

use tiny_keccak::{Hasher, Keccak};

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// 4-byte function selector of `signature`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// topic[0] of a non-anonymous event, bare hex.
pub fn event_topic(signature: &str) -> String {
    hex::encode(keccak256(signature.as_bytes()))
}

/// Canonical form of a topic as it comes off the wire: no `0x`, lowercase.
/// Returns `None` unless it is 32 bytes of hex.
pub fn normalize_topic(topic: &str) -> Option<String> {
    let hex = topic.strip_prefix("0x").unwrap_or(topic);
    if hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(hex.to_ascii_lowercase())
    } else {
        None
    }
}
