//! In-memory reference store.

use std::collections::BTreeMap;

use tracing::debug;
use weir_core::{Error, SignedEvent};

use crate::store::{EventStore, StreamAndCookie, SyncCookie, SyncPos};

/// [`EventStore`] backed by a map of vectors. The cookie for a stream is
/// the decimal count of its events at read time, so "new events since
/// cookie N" is a suffix slice.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    streams: BTreeMap<String, Vec<SignedEvent>>,
}

impl MemoryEventStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn parse_cookie(cookie: &str) -> Result<usize, Error> {
        cookie.parse().map_err(|_| Error::BadSyncCookie {
            cookie: cookie.to_string(),
        })
    }
}

impl EventStore for MemoryEventStore {
    fn create_event_stream(
        &mut self,
        stream_id: &str,
        events: Vec<SignedEvent>,
    ) -> Result<SyncCookie, Error> {
        if self.streams.contains_key(stream_id) {
            return Err(Error::StreamExists {
                stream_id: stream_id.to_string(),
            });
        }
        if events.is_empty() {
            return Err(Error::BadCreationEvents {
                stream_id: stream_id.to_string(),
                reason: "creation batch is empty".to_string(),
            });
        }
        let cookie = events.len().to_string();
        debug!(stream_id, count = events.len(), "created stream");
        self.streams.insert(stream_id.to_string(), events);
        Ok(cookie)
    }

    fn add_events(
        &mut self,
        stream_id: &str,
        events: Vec<SignedEvent>,
    ) -> Result<SyncCookie, Error> {
        let Some(stream) = self.streams.get_mut(stream_id) else {
            return Err(Error::StreamNotFound {
                stream_id: stream_id.to_string(),
            });
        };
        stream.extend(events);
        debug!(stream_id, total = stream.len(), "appended events");
        Ok(stream.len().to_string())
    }

    fn get_event_stream(&self, stream_id: &str) -> Result<StreamAndCookie, Error> {
        let events = self
            .streams
            .get(stream_id)
            .filter(|events| !events.is_empty())
            .ok_or_else(|| Error::StreamNotFound {
                stream_id: stream_id.to_string(),
            })?;
        Ok(StreamAndCookie {
            events: events.clone(),
            sync_cookie: events.len().to_string(),
            original_sync_cookie: None,
        })
    }

    fn read_new_events(
        &self,
        positions: &[SyncPos],
    ) -> Result<BTreeMap<String, StreamAndCookie>, Error> {
        let mut updates = BTreeMap::new();
        for pos in positions {
            let seen = Self::parse_cookie(&pos.sync_cookie)?;
            let Some(stream) = self.streams.get(&pos.stream_id) else {
                continue;
            };
            if stream.len() <= seen {
                continue;
            }
            updates.insert(
                pos.stream_id.clone(),
                StreamAndCookie {
                    events: stream[seen..].to_vec(),
                    sync_cookie: stream.len().to_string(),
                    original_sync_cookie: Some(pos.sync_cookie.clone()),
                },
            );
        }
        Ok(updates)
    }

    fn stream_exists(&self, stream_id: &str) -> bool {
        self.streams.contains_key(stream_id)
    }

    fn delete_event_stream(&mut self, stream_id: &str) -> Result<(), Error> {
        if self.streams.remove(stream_id).is_none() {
            return Err(Error::StreamNotFound {
                stream_id: stream_id.to_string(),
            });
        }
        debug!(stream_id, "deleted stream");
        Ok(())
    }
}
