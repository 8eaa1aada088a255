//! Storage and service layer for weir event streams.
//!
//! [`EventStore`] is the persistence seam: an append-only map from stream
//! ids to verified event chains, with cookie-based incremental reads.
//! [`MemoryEventStore`] is the in-process reference implementation.
//! [`StreamService`] wraps a store with the append-time rules clients are
//! not trusted to follow: event verification, inception placement,
//! payload limits, membership gates, and the derived events that fan
//! membership and channel lifecycle out to other streams.

#![forbid(unsafe_code)]

pub mod config;
pub mod memory;
pub mod service;
pub mod store;

pub use config::ServiceConfig;
pub use memory::MemoryEventStore;
pub use service::StreamService;
pub use store::{EventStore, StreamAndCookie, SyncCookie, SyncPos};
