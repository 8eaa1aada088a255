//! Deterministic event hashing.
//!
//! An event's identity is the EIP-191 personal-message digest of the
//! canonical JSON serialization of its base: keccak256 over
//! `"\x19Ethereum Signed Message:\n" + len + bytes`. The personal-message
//! envelope means any stock Ethereum wallet can produce and verify event
//! signatures without custom signing support.

use alloy::hex;
use alloy::primitives::B256;
use alloy::primitives::utils::eip191_hash_message;

use crate::error::Error;

use super::Event;

/// Hash an event base.
///
/// Returns both the `0x`-prefixed lowercase hex string (what goes into
/// [`SignedEvent::hash`](super::SignedEvent) and into successors'
/// `prevEvents`) and the raw 32-byte digest (what signing and recovery
/// operate on).
///
/// Hashing the same base twice yields identical output. The canonical form
/// sorts object keys recursively, so the hash does not depend on the field
/// order of whatever JSON the base was parsed from.
///
/// # Errors
///
/// Returns [`Error::Json`] if the base fails to serialize (should not
/// happen with well-formed payloads).
pub fn hash_event(event: &Event) -> Result<(String, B256), Error> {
    let value = serde_json::to_value(event)?;
    let canonical = super::canonicalize_json(&value);
    let digest = eip191_hash_message(canonical.as_bytes());
    Ok((hex::encode_prefixed(digest), digest))
}

/// Whether `s` is a well-formed event hash: `0x` followed by exactly 64
/// lowercase hex chars.
#[must_use]
pub fn is_event_hash(s: &str) -> bool {
    s.strip_prefix("0x").is_some_and(|digits| {
        digits.len() == 64 && digits.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
