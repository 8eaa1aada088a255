//! Event and chain verification.
//!
//! Verification is the trust boundary: everything read back from a store or
//! peer goes through [`check_event`] before it may reach a stream view.
//! Three gates, in order: predecessor context, hash integrity, signature
//! authenticity. The projector itself never re-verifies.

use crate::error::Error;

use super::{SignedEvent, hash_event, recover_creator};

/// Verify one signed event.
///
/// With `expected_prev_hash` set, the event must have exactly that single
/// predecessor. Pass `None` for inception events, DAG merge events, or when
/// the caller validates predecessor context itself.
///
/// The hash is recomputed from the base and must match `event.hash`; the
/// signature must recover to `creatorAddress`, compared case-sensitively on
/// the checksummed form.
///
/// # Errors
///
/// - [`Error::PrevCountNotOne`] / [`Error::PrevHashMismatch`] when the
///   predecessor context does not line up (`BAD_PREV_EVENTS`).
/// - [`Error::HashMismatch`] when the recomputed hash differs
///   (`BAD_EVENT_ID`): the content was altered after hashing.
/// - [`Error::MalformedSignature`] / [`Error::SignerMismatch`] when the
///   signature does not parse or recovers to a different address
///   (`BAD_EVENT_SIGNATURE`).
pub fn check_event(event: &SignedEvent, expected_prev_hash: Option<&str>) -> Result<(), Error> {
    if let Some(expected) = expected_prev_hash {
        let [found] = event.base.prev_events.as_slice() else {
            return Err(Error::PrevCountNotOne {
                found: event.base.prev_events.len(),
            });
        };
        if found != expected {
            return Err(Error::PrevHashMismatch {
                expected: expected.to_string(),
                found: found.clone(),
            });
        }
    }

    let (computed, digest) = hash_event(&event.base)?;
    if computed != event.hash {
        return Err(Error::HashMismatch {
            claimed: event.hash.clone(),
            computed,
        });
    }

    let recovered = recover_creator(&digest, &event.signature)?;
    if recovered != event.base.creator_address {
        return Err(Error::SignerMismatch {
            claimed: event.base.creator_address.clone(),
            recovered,
        });
    }

    Ok(())
}

/// Verify a strictly linear chain of events.
///
/// Walks the list with the expected predecessor starting at `None`, so the
/// first event may be an inception or carry externally validated
/// predecessors; every later event must chain to the one before it.
///
/// Fails on the first invalid event. No valid prefix is reported: callers
/// treat the whole batch as rejected.
///
/// # Errors
///
/// The first failing event's error from [`check_event`].
pub fn check_events(events: &[SignedEvent]) -> Result<(), Error> {
    let mut prev: Option<&str> = None;
    for event in events {
        check_event(event, prev)?;
        prev = Some(&event.hash);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
