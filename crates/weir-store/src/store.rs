//! The event-store contract.
//!
//! A store is an append-only log per stream plus a cursor scheme. Cookies
//! are opaque to clients: hand back whatever the store gave you and it
//! returns the events you have not seen. Implementations define the
//! cookie encoding; callers must not parse it.

use std::collections::BTreeMap;

use weir_core::{Error, SignedEvent};

/// Opaque read cursor. Compare for equality only.
pub type SyncCookie = String;

/// A client's position in one stream.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPos {
    pub stream_id: String,
    pub sync_cookie: SyncCookie,
}

/// A slice of a stream plus the cursor to resume from.
///
/// `original_sync_cookie` echoes the cookie the request carried, so a
/// client juggling several in-flight reads can match responses up.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamAndCookie {
    pub events: Vec<SignedEvent>,
    pub sync_cookie: SyncCookie,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_sync_cookie: Option<SyncCookie>,
}

/// Append-only storage for event streams.
///
/// The store persists what it is given and hands out cursors; it does not
/// verify events. Validation is the service's job, before anything
/// reaches the store.
pub trait EventStore {
    /// Create a stream from its initial events.
    ///
    /// # Errors
    ///
    /// [`Error::StreamExists`] when the id is taken,
    /// [`Error::BadCreationEvents`] when the batch is empty.
    fn create_event_stream(
        &mut self,
        stream_id: &str,
        events: Vec<SignedEvent>,
    ) -> Result<SyncCookie, Error>;

    /// Append events to an existing stream and return the new cursor.
    ///
    /// # Errors
    ///
    /// [`Error::StreamNotFound`] when the stream does not exist.
    fn add_events(
        &mut self,
        stream_id: &str,
        events: Vec<SignedEvent>,
    ) -> Result<SyncCookie, Error>;

    /// Read a whole stream from the top.
    ///
    /// # Errors
    ///
    /// [`Error::StreamNotFound`] when the stream is absent or empty.
    fn get_event_stream(&self, stream_id: &str) -> Result<StreamAndCookie, Error>;

    /// Read what changed since each given position. Streams with nothing
    /// new — including unknown stream ids — are left out of the result.
    ///
    /// # Errors
    ///
    /// [`Error::BadSyncCookie`] when a cookie is not one this store
    /// issued.
    fn read_new_events(
        &self,
        positions: &[SyncPos],
    ) -> Result<BTreeMap<String, StreamAndCookie>, Error>;

    fn stream_exists(&self, stream_id: &str) -> bool;

    /// Drop a stream and its events.
    ///
    /// # Errors
    ///
    /// [`Error::StreamNotFound`] when the stream does not exist.
    fn delete_event_stream(&mut self, stream_id: &str) -> Result<(), Error>;
}
