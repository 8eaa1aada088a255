//! Event data model for weir streams.
//!
//! This module defines the base [`Event`] struct, its signed envelope
//! [`SignedEvent`], the [`Payload`] union covering all ten payload kinds,
//! and the canonical JSON serialization needed for deterministic hashing.
//!
//! # Wire format
//!
//! Events cross the store boundary as JSON:
//!
//! ```text
//! {
//!   "hash": "0x" + 64 lowercase hex,
//!   "signature": "0x" + 130 hex (r||s||v, v in {27, 28}),
//!   "base": {
//!     "creatorAddress": checksummed 0x address,
//!     "salt": 21-char base62,
//!     "prevEvents": ["0x..", ..],     // empty only for inception
//!     "payload": { "kind": .., ..kind-specific fields }
//!   }
//! }
//! ```
//!
//! The `hash` covers the canonical serialization of `base`; the `signature`
//! covers the hash digest. Everything under `base` is immutable once signed.

pub mod canonical;
pub mod check;
pub mod hash;
pub mod make;
pub mod payload;
pub mod sign;

pub use canonical::{canonicalize_json, canonicalize_json_str};
pub use check::{check_event, check_events};
pub use hash::{hash_event, is_event_hash};
pub use make::{make_event, make_event_ref, make_events};
pub use payload::{
    ChannelCreatedPayload, ChannelDeletedPayload, InceptionData, InceptionPayload, InvitePayload,
    JoinPayload, LeavePayload, MessagePayload, Payload, PayloadKind, StreamKind,
    UnknownPayloadKind, UserInvitedPayload, UserJoinedPayload, UserLeftPayload,
};
pub use sign::{Identity, recover_creator};

use serde::{Deserialize, Serialize};

/// The signable part of an event: everything the hash and signature cover.
///
/// `prev_events` carries the hashes of the DAG fringe this event builds on.
/// It is empty only for inception events. The `salt` makes two otherwise
/// identical events hash differently, so authors can say the same thing
/// twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Checksummed address of the keypair that signed this event.
    pub creator_address: String,

    /// Random 21-char base62 uniquifier.
    pub salt: String,

    /// Hashes of the predecessor events. Empty only for inception.
    pub prev_events: Vec<String>,

    /// The typed payload.
    pub payload: Payload,
}

impl Event {
    /// Whether this is a stream's genesis event.
    #[must_use]
    pub const fn is_inception(&self) -> bool {
        matches!(self.payload, Payload::Inception(_))
    }
}

/// An event plus its content hash and the creator's signature over that
/// hash. This is what crosses the store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedEvent {
    /// `0x`-prefixed lowercase hex digest of the canonicalized base.
    pub hash: String,

    /// `0x`-prefixed 130-hex-char `r||s||v` signature over the digest.
    pub signature: String,

    /// The signed content.
    pub base: Event,
}

impl SignedEvent {
    /// Return the payload kind tag.
    #[must_use]
    pub const fn kind(&self) -> PayloadKind {
        self.base.payload.kind()
    }
}

impl std::fmt::Display for SignedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Abbreviated form for logs: kind, truncated hash, creator.
        let short = self.hash.get(..10).unwrap_or(&self.hash);
        write!(f, "{} {} by {}", self.kind(), short, self.base.creator_address)
    }
}

/// A pointer to an event in another stream.
///
/// Derived user-stream payloads carry one of these so the user's own stream
/// records *which* membership event elsewhere caused the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRef {
    /// Stream the referenced event lives in.
    pub stream_id: String,

    /// Hash of the referenced event.
    pub hash: String,

    /// Signature of the referenced event.
    pub signature: String,

    /// Creator of the referenced event.
    pub creator_address: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
