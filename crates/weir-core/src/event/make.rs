//! Event factory: build signed events from an identity and a payload.

use tracing::trace;

use crate::error::Error;
use crate::id::gen_id;

use super::{
    Event, EventRef, Identity, Payload, PayloadKind, SignedEvent, hash_event, is_event_hash,
};

/// Build one signed event.
///
/// The event gets a fresh random salt, is hashed over its canonical form,
/// and signed with `identity`. `prev_event_hashes` become the event's
/// `prevEvents` exactly as given.
///
/// # Errors
///
/// - [`Error::EmptyPrevEvents`] if the payload is not an inception and
///   `prev_event_hashes` is empty. Every non-genesis event must extend the
///   DAG somewhere.
/// - [`Error::BadHashFormat`] if any supplied hash is not `0x` + 64
///   lowercase hex chars.
pub fn make_event(
    identity: &Identity,
    payload: Payload,
    prev_event_hashes: &[String],
) -> Result<SignedEvent, Error> {
    if payload.kind() != PayloadKind::Inception && prev_event_hashes.is_empty() {
        return Err(Error::EmptyPrevEvents {
            kind: payload.kind().to_string(),
        });
    }
    for hash in prev_event_hashes {
        if !is_event_hash(hash) {
            return Err(Error::BadHashFormat { hash: hash.clone() });
        }
    }

    let base = Event {
        creator_address: identity.address().to_string(),
        salt: gen_id(),
        prev_events: prev_event_hashes.to_vec(),
        payload,
    };
    let (hash, digest) = hash_event(&base)?;
    let signature = identity.sign_digest(&digest)?;

    trace!(kind = %base.payload.kind(), %hash, "made event");
    Ok(SignedEvent {
        hash,
        signature,
        base,
    })
}

/// Build a strictly linear chain of signed events.
///
/// The first event gets `prev_event_hashes`; every subsequent event's
/// single predecessor is the hash of the event before it. The result
/// always passes [`check_events`](super::check_events).
///
/// # Errors
///
/// Same conditions as [`make_event`], applied per payload.
pub fn make_events(
    identity: &Identity,
    payloads: Vec<Payload>,
    prev_event_hashes: &[String],
) -> Result<Vec<SignedEvent>, Error> {
    let mut events = Vec::with_capacity(payloads.len());
    let mut prev = prev_event_hashes.to_vec();
    for payload in payloads {
        let event = make_event(identity, payload, &prev)?;
        prev = vec![event.hash.clone()];
        events.push(event);
    }
    Ok(events)
}

/// Build a reference to `event` as seen from `stream_id`.
///
/// Derived user-stream payloads carry these to point back at the
/// originating membership event.
#[must_use]
pub fn make_event_ref(stream_id: &str, event: &SignedEvent) -> EventRef {
    EventRef {
        stream_id: stream_id.to_string(),
        hash: event.hash.clone(),
        signature: event.signature.clone(),
        creator_address: event.base.creator_address.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
