//! Fold a stream's events into queryable state.
//!
//! [`StreamView`] is a pure projection: it trusts its input, so callers
//! verify events with [`check_events`](crate::event::check_events) before
//! feeding them in. State only changes through [`StreamView::add_event`]
//! and [`StreamView::add_events`]; everything else is read-only access.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, trace};

use crate::error::Error;
use crate::event::{Payload, SignedEvent, StreamKind};
use crate::stream::sink::{StreamSignal, StreamSink};

// ---------------------------------------------------------------------------
// StreamView
// ---------------------------------------------------------------------------

/// Materialized state of one stream.
///
/// Which collections fill up depends on the stream's kind: membership
/// tracks any stream, `space_channels` only moves on space streams,
/// `messages` on channel streams, and the `user_*_streams` sets on user
/// streams. Events of a kind that does not belong to the stream's kind
/// are still recorded in the timeline; rejecting them is the service's
/// job, not the projector's.
#[derive(Debug, Clone)]
pub struct StreamView {
    stream_id: String,
    kind: StreamKind,
    parent_space_id: Option<String>,
    timeline: Vec<SignedEvent>,
    events: HashMap<String, SignedEvent>,
    leaf_event_hashes: BTreeSet<String>,
    joined_users: BTreeSet<String>,
    invited_users: BTreeSet<String>,
    messages: HashMap<String, SignedEvent>,
    space_channels: BTreeSet<String>,
    user_invited_streams: BTreeSet<String>,
    user_joined_streams: BTreeSet<String>,
}

impl StreamView {
    /// Start an empty view for `stream_id`, taking the stream's kind from
    /// its inception event. The event is only inspected here; pass it
    /// again through [`Self::add_events`] to apply it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingInception`] when no event is given,
    /// [`Error::NotInception`] when the first event is not an inception,
    /// and [`Error::InceptionStreamIdMismatch`] when the inception names
    /// a different stream.
    pub fn new(stream_id: &str, inception_event: Option<&SignedEvent>) -> Result<Self, Error> {
        let Some(event) = inception_event else {
            return Err(Error::MissingInception {
                stream_id: stream_id.to_string(),
            });
        };
        let Payload::Inception(inception) = &event.base.payload else {
            return Err(Error::NotInception {
                stream_id: stream_id.to_string(),
            });
        };
        if inception.stream_id != stream_id {
            return Err(Error::InceptionStreamIdMismatch {
                expected: stream_id.to_string(),
                found: inception.stream_id.clone(),
            });
        }
        let parent_space_id = match inception.data.stream_kind {
            StreamKind::Channel => inception.data.space_id.clone(),
            StreamKind::User | StreamKind::Space => None,
        };
        Ok(Self {
            stream_id: stream_id.to_string(),
            kind: inception.data.stream_kind,
            parent_space_id,
            timeline: Vec::new(),
            events: HashMap::new(),
            leaf_event_hashes: BTreeSet::new(),
            joined_users: BTreeSet::new(),
            invited_users: BTreeSet::new(),
            messages: HashMap::new(),
            space_channels: BTreeSet::new(),
            user_invited_streams: BTreeSet::new(),
            user_joined_streams: BTreeSet::new(),
        })
    }

    /// Apply one event: record it, advance the leaf set, then dispatch on
    /// its payload kind. Signals fire on `sink` as state changes.
    ///
    /// Delivering the same event twice leaves the derived sets unchanged
    /// but appends to the timeline and signals again. Consumers that need
    /// exactly-once dedupe by event hash.
    pub fn add_event(&mut self, event: SignedEvent, mut sink: Option<&mut (dyn StreamSink + '_)>) {
        self.timeline.push(event.clone());
        self.events.insert(event.hash.clone(), event.clone());
        self.leaf_event_hashes.insert(event.hash.clone());
        for prev in &event.base.prev_events {
            self.leaf_event_hashes.remove(prev);
        }

        match &event.base.payload {
            Payload::Inception(_) => {
                notify(
                    &mut sink,
                    StreamSignal::Inception {
                        stream_id: self.stream_id.clone(),
                        kind: self.kind,
                    },
                );
            }
            Payload::Join(payload) => {
                self.joined_users.insert(payload.user_id.clone());
                notify(
                    &mut sink,
                    StreamSignal::NewUserJoined {
                        stream_id: self.stream_id.clone(),
                        user_id: payload.user_id.clone(),
                    },
                );
            }
            Payload::Invite(payload) => {
                self.invited_users.insert(payload.user_id.clone());
                notify(
                    &mut sink,
                    StreamSignal::NewUserInvited {
                        stream_id: self.stream_id.clone(),
                        user_id: payload.user_id.clone(),
                    },
                );
            }
            Payload::Leave(payload) => {
                self.joined_users.remove(&payload.user_id);
                self.invited_users.remove(&payload.user_id);
                notify(
                    &mut sink,
                    StreamSignal::UserLeft {
                        stream_id: self.stream_id.clone(),
                        user_id: payload.user_id.clone(),
                    },
                );
            }
            Payload::UserInvited(payload) => {
                self.user_invited_streams.insert(payload.stream_id.clone());
                notify(
                    &mut sink,
                    StreamSignal::UserInvitedToStream {
                        stream_id: payload.stream_id.clone(),
                    },
                );
            }
            Payload::UserJoined(payload) => {
                self.user_joined_streams.insert(payload.stream_id.clone());
                notify(
                    &mut sink,
                    StreamSignal::UserJoinedStream {
                        stream_id: payload.stream_id.clone(),
                    },
                );
            }
            Payload::UserLeft(payload) => {
                // Signal fires while the set still lists the stream.
                notify(
                    &mut sink,
                    StreamSignal::UserLeftStream {
                        stream_id: payload.stream_id.clone(),
                    },
                );
                self.user_joined_streams.remove(&payload.stream_id);
            }
            Payload::ChannelCreated(payload) => {
                self.space_channels.insert(payload.channel_id.clone());
                notify(
                    &mut sink,
                    StreamSignal::NewChannelCreated {
                        space_id: self.stream_id.clone(),
                        channel_id: payload.channel_id.clone(),
                    },
                );
            }
            Payload::ChannelDeleted(payload) => {
                // Signal fires while the channel is still listed.
                notify(
                    &mut sink,
                    StreamSignal::ChannelDeleted {
                        space_id: self.stream_id.clone(),
                        channel_id: payload.channel_id.clone(),
                    },
                );
                self.space_channels.remove(&payload.channel_id);
            }
            Payload::Message(_) => {
                self.messages.insert(event.hash.clone(), event.clone());
                notify(
                    &mut sink,
                    StreamSignal::NewMessage {
                        channel_id: self.stream_id.clone(),
                        event: event.clone(),
                    },
                );
            }
        }

        trace!(
            stream_id = %self.stream_id,
            kind = %event.kind(),
            hash = %event.hash,
            "applied event"
        );
    }

    /// Apply a batch of events in order, then fire exactly one batch
    /// signal: [`StreamSignal::Initialized`] when `is_init` is set,
    /// [`StreamSignal::Updated`] otherwise. The batch signal fires even
    /// for an empty batch.
    pub fn add_events(
        &mut self,
        events: &[SignedEvent],
        mut sink: Option<&mut dyn StreamSink>,
        is_init: bool,
    ) {
        for event in events {
            self.add_event(event.clone(), sink.as_deref_mut());
        }
        let signal = if is_init {
            StreamSignal::Initialized {
                stream_id: self.stream_id.clone(),
                kind: self.kind,
                events: events.to_vec(),
            }
        } else {
            StreamSignal::Updated {
                stream_id: self.stream_id.clone(),
                events: events.to_vec(),
            }
        };
        debug!(
            stream_id = %self.stream_id,
            count = events.len(),
            init = is_init,
            "applied event batch"
        );
        notify(&mut sink, signal);
    }

    // ---- Read access ----

    #[must_use]
    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    #[must_use]
    pub const fn kind(&self) -> StreamKind {
        self.kind
    }

    /// Parent space of a channel stream. `None` for other kinds.
    #[must_use]
    pub fn parent_space_id(&self) -> Option<&str> {
        self.parent_space_id.as_deref()
    }

    /// Every applied event, in application order.
    #[must_use]
    pub fn timeline(&self) -> &[SignedEvent] {
        &self.timeline
    }

    /// Look up an applied event by hash.
    #[must_use]
    pub fn event(&self, hash: &str) -> Option<&SignedEvent> {
        self.events.get(hash)
    }

    #[must_use]
    pub fn contains_event(&self, hash: &str) -> bool {
        self.events.contains_key(hash)
    }

    /// Hashes new events must build on.
    #[must_use]
    pub const fn leaf_event_hashes(&self) -> &BTreeSet<String> {
        &self.leaf_event_hashes
    }

    #[must_use]
    pub const fn joined_users(&self) -> &BTreeSet<String> {
        &self.joined_users
    }

    #[must_use]
    pub const fn invited_users(&self) -> &BTreeSet<String> {
        &self.invited_users
    }

    #[must_use]
    pub fn is_member(&self, user_id: &str) -> bool {
        self.joined_users.contains(user_id)
    }

    #[must_use]
    pub fn is_invited(&self, user_id: &str) -> bool {
        self.invited_users.contains(user_id)
    }

    /// Message events keyed by hash. Only fills on channel streams.
    #[must_use]
    pub const fn messages(&self) -> &HashMap<String, SignedEvent> {
        &self.messages
    }

    /// Channel ids of a space stream.
    #[must_use]
    pub const fn space_channels(&self) -> &BTreeSet<String> {
        &self.space_channels
    }

    /// Streams the owning user has a standing invite to. Only fills on
    /// user streams. Invites stay recorded after joining or leaving.
    #[must_use]
    pub const fn user_invited_streams(&self) -> &BTreeSet<String> {
        &self.user_invited_streams
    }

    /// Streams the owning user is currently in. Only fills on user
    /// streams.
    #[must_use]
    pub const fn user_joined_streams(&self) -> &BTreeSet<String> {
        &self.user_joined_streams
    }
}

/// Build a view of `stream_id` from its full event list. The first event
/// must be the stream's inception.
///
/// # Errors
///
/// Fails with the same errors as [`StreamView::new`].
pub fn rollup_stream(
    stream_id: &str,
    events: &[SignedEvent],
    sink: Option<&mut dyn StreamSink>,
) -> Result<StreamView, Error> {
    let mut view = StreamView::new(stream_id, events.first())?;
    view.add_events(events, sink, true);
    Ok(view)
}

fn notify(sink: &mut Option<&mut (dyn StreamSink + '_)>, signal: StreamSignal) {
    if let Some(sink) = sink {
        sink.emit(signal);
    }
}
