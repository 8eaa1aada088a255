//! Stream-level machinery: leaf-hash resolution and the state projector.
//!
//! A stream is an append-only, hash-linked event log for one chat entity.
//! [`find_leaf_event_hashes`] computes the DAG fringe new events must build
//! on; [`StreamView`] folds verified events into queryable state and
//! reports changes to an optional [`StreamSink`].

pub mod leaf;
pub mod sink;
pub mod view;

pub use leaf::find_leaf_event_hashes;
pub use sink::{StreamSignal, StreamSink};
pub use view::{StreamView, rollup_stream};
