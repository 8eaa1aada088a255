//! Resolve the leaf events of a stream's hash DAG.

use std::collections::BTreeSet;

use crate::error::Error;
use crate::event::SignedEvent;

/// Find the hashes of the events nothing else builds on yet.
///
/// New events must name the current leaves as their predecessors, so this
/// is the answer to "where does the stream grow next". The result is the
/// set of all event hashes minus every hash referenced as a predecessor
/// anywhere in `events`, which makes the outcome independent of the order
/// the events are listed in. Hashes come back sorted.
///
/// # Errors
///
/// Returns [`Error::EmptyEventList`] when `events` is empty and
/// [`Error::NoLeafEvents`] when every event is referenced as a
/// predecessor, which only happens on a malformed log.
pub fn find_leaf_event_hashes(
    stream_id: &str,
    events: &[SignedEvent],
) -> Result<Vec<String>, Error> {
    if events.is_empty() {
        return Err(Error::EmptyEventList { stream_id: stream_id.to_string() });
    }
    let mut leaves: BTreeSet<&str> =
        events.iter().map(|event| event.hash.as_str()).collect();
    for event in events {
        for prev in &event.base.prev_events {
            leaves.remove(prev.as_str());
        }
    }
    if leaves.is_empty() {
        return Err(Error::NoLeafEvents { stream_id: stream_id.to_string() });
    }
    Ok(leaves.into_iter().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, Identity, Payload, make_event, make_events};

    fn chain(identity: &Identity, texts: &[&str]) -> Vec<SignedEvent> {
        let inception =
            make_event(identity, Payload::channel_inception("c-test", "s-home"), &[]).unwrap();
        let payloads: Vec<Payload> = texts.iter().map(|text| Payload::message(*text)).collect();
        let mut events = vec![inception.clone()];
        events.extend(make_events(identity, payloads, &[inception.hash]).unwrap());
        events
    }

    /// Fabricate an event envelope without signing. Leaf resolution only
    /// reads hashes and predecessor lists.
    fn bare(hash: &str, prevs: &[&str]) -> SignedEvent {
        SignedEvent {
            hash: hash.to_string(),
            signature: String::new(),
            base: Event {
                creator_address: String::new(),
                salt: String::new(),
                prev_events: prevs.iter().map(|prev| (*prev).to_string()).collect(),
                payload: Payload::message("x"),
            },
        }
    }

    #[test]
    fn linear_chain_has_one_leaf() {
        let identity = Identity::random();
        let events = chain(&identity, &["one", "two", "three"]);
        let leaves = find_leaf_event_hashes("c-test", &events).unwrap();
        assert_eq!(leaves, vec![events.last().unwrap().hash.clone()]);
    }

    #[test]
    fn fork_has_two_leaves_sorted() {
        let identity = Identity::random();
        let root =
            make_event(&identity, Payload::channel_inception("c-test", "s-home"), &[]).unwrap();
        let left =
            make_event(&identity, Payload::message("left"), std::slice::from_ref(&root.hash))
                .unwrap();
        let right =
            make_event(&identity, Payload::message("right"), std::slice::from_ref(&root.hash))
                .unwrap();

        let events = vec![root, left.clone(), right.clone()];
        let leaves = find_leaf_event_hashes("c-test", &events).unwrap();

        let mut expected = vec![left.hash, right.hash];
        expected.sort();
        assert_eq!(leaves, expected);
    }

    #[test]
    fn merge_event_collapses_fork() {
        let identity = Identity::random();
        let root =
            make_event(&identity, Payload::channel_inception("c-test", "s-home"), &[]).unwrap();
        let left =
            make_event(&identity, Payload::message("left"), std::slice::from_ref(&root.hash))
                .unwrap();
        let right =
            make_event(&identity, Payload::message("right"), std::slice::from_ref(&root.hash))
                .unwrap();
        let merge = make_event(
            &identity,
            Payload::message("merge"),
            &[left.hash.clone(), right.hash.clone()],
        )
        .unwrap();

        let events = vec![root, left, right, merge.clone()];
        let leaves = find_leaf_event_hashes("c-test", &events).unwrap();
        assert_eq!(leaves, vec![merge.hash]);
    }

    #[test]
    fn result_does_not_depend_on_event_order() {
        let identity = Identity::random();
        let events = chain(&identity, &["one", "two", "three"]);
        let forward = find_leaf_event_hashes("c-test", &events).unwrap();

        let mut reversed = events;
        reversed.reverse();
        let backward = find_leaf_event_hashes("c-test", &reversed).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn empty_stream_is_rejected() {
        let err = find_leaf_event_hashes("c-empty", &[]).unwrap_err();
        assert!(matches!(err, Error::EmptyEventList { ref stream_id } if stream_id == "c-empty"));
        assert_eq!(err.code().as_str(), "STREAM_BAD_HASHES");
    }

    #[test]
    fn cycle_leaves_nothing() {
        // Two fabricated events referencing each other. Never produced by
        // honest makers, but the resolver must not loop or panic on it.
        let events = vec![bare("0xaa", &["0xbb"]), bare("0xbb", &["0xaa"])];
        let err = find_leaf_event_hashes("c-cycle", &events).unwrap_err();
        assert!(matches!(err, Error::NoLeafEvents { ref stream_id } if stream_id == "c-cycle"));
        assert_eq!(err.code().as_str(), "STREAM_BAD_HASHES");
    }

    #[test]
    fn duplicate_prev_references_are_harmless() {
        let identity = Identity::random();
        let root =
            make_event(&identity, Payload::channel_inception("c-test", "s-home"), &[]).unwrap();
        let next = make_event(
            &identity,
            Payload::message("next"),
            &[root.hash.clone(), root.hash.clone()],
        )
        .unwrap();

        let events = vec![root, next.clone()];
        let leaves = find_leaf_event_hashes("c-test", &events).unwrap();
        assert_eq!(leaves, vec![next.hash]);
    }
}
