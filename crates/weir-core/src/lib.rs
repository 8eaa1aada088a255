//! Event-chain protocol core for weir streams.
//!
//! Every piece of chat state — spaces, channels, user memberships,
//! messages — lives in a stream: an append-only log of signed events,
//! each one hash-linked to its predecessors. The hash covers a canonical
//! JSON form of the event, run through the Ethereum personal-message
//! digest, and the signature is recoverable ECDSA over that digest, so
//! an event carries its own proof of integrity and authorship.
//!
//! The crate splits along the protocol's phases:
//!
//! - [`event`] makes, hashes, signs, and verifies events;
//! - [`stream`] resolves a stream's leaf events and folds event lists
//!   into a queryable [`StreamView`];
//! - [`id`] generates and classifies stream ids;
//! - [`error`] carries the wire-coded failure taxonomy.
//!
//! Nothing here does IO. Persistence and service-side rules live in
//! `weir-store`, which drives this crate.

#![forbid(unsafe_code)]

pub mod error;
pub mod event;
pub mod id;
pub mod stream;

pub use error::{ErrCode, Error};
pub use event::{
    Event, EventRef, Identity, Payload, PayloadKind, SignedEvent, StreamKind, canonicalize_json,
    canonicalize_json_str, check_event, check_events, hash_event, is_event_hash, make_event,
    make_event_ref, make_events, recover_creator,
};
pub use id::{
    gen_id, is_channel_stream_id, is_space_stream_id, is_user_stream_id, make_channel_stream_id,
    make_space_stream_id, make_unique_channel_stream_id, make_unique_space_stream_id,
    make_user_stream_id, parse_stream_id, user_id_from_address,
};
pub use stream::{StreamSignal, StreamSink, StreamView, find_leaf_event_hashes, rollup_stream};
