//! Append-time rules and derived events.
//!
//! [`StreamService`] sits between clients and an [`EventStore`]. Clients
//! hand it fully signed events; it verifies them, applies the rules a
//! bare store cannot (inception placement, payload size, membership),
//! and writes the derived bookkeeping events the protocol calls for: a
//! channel's lifecycle is announced in its parent space, and membership
//! changes are mirrored into the affected user's own stream, signed by
//! the service's node identity.

use std::collections::BTreeMap;

use tracing::{debug, warn};
use weir_core::{
    Error, Identity, Payload, PayloadKind, SignedEvent, StreamKind, StreamView, check_event,
    check_events, find_leaf_event_hashes, is_channel_stream_id, make_event, make_event_ref,
    make_user_stream_id, parse_stream_id, rollup_stream,
};

use crate::config::ServiceConfig;
use crate::store::{EventStore, StreamAndCookie, SyncCookie, SyncPos};

#[derive(Debug)]
pub struct StreamService<S> {
    store: S,
    identity: Identity,
    config: ServiceConfig,
}

impl<S: EventStore> StreamService<S> {
    #[must_use]
    pub const fn new(store: S, identity: Identity, config: ServiceConfig) -> Self {
        Self {
            store,
            identity,
            config,
        }
    }

    /// Read access to the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Checksummed address the service signs derived events with.
    #[must_use]
    pub fn node_address(&self) -> &str {
        self.identity.address()
    }

    /// Roll up the stored stream into a queryable view.
    ///
    /// # Errors
    ///
    /// [`Error::StreamNotFound`] when the stream does not exist, plus any
    /// rollup failure.
    pub fn stream_view(&self, stream_id: &str) -> Result<StreamView, Error> {
        let stored = self.store.get_event_stream(stream_id)?;
        rollup_stream(stream_id, &stored.events, None)
    }

    /// Create a stream from a verified creation batch.
    ///
    /// The batch must open with an inception that names `stream_id` and
    /// declares the kind its prefix promises; a user stream's id must
    /// derive from the creator's address. Creating a channel announces it
    /// in the parent space with a service-signed `ChannelCreated` event.
    ///
    /// # Errors
    ///
    /// [`Error::BadCreationEvents`] for a batch that breaks the rules
    /// above, [`Error::StreamNotFound`] for a channel whose parent space
    /// is not stored, plus any verification failure from
    /// [`check_events`].
    pub fn create_stream(
        &mut self,
        stream_id: &str,
        events: Vec<SignedEvent>,
    ) -> Result<SyncCookie, Error> {
        let reject = |reason: String| Error::BadCreationEvents {
            stream_id: stream_id.to_string(),
            reason,
        };

        let Some(first) = events.first() else {
            return Err(reject("creation batch is empty".to_string()));
        };
        check_events(&events)?;

        let Payload::Inception(inception) = &first.base.payload else {
            return Err(reject("first event is not an inception".to_string()));
        };
        if inception.stream_id != stream_id {
            return Err(reject(format!(
                "inception names stream {}",
                inception.stream_id
            )));
        }
        let kind = parse_stream_id(stream_id)?;
        if inception.data.stream_kind != kind {
            return Err(reject(format!(
                "id prefix says {kind}, inception declares {}",
                inception.data.stream_kind
            )));
        }
        if kind == StreamKind::User
            && stream_id != make_user_stream_id(&first.base.creator_address)
        {
            return Err(reject(
                "user stream id must derive from the creator address".to_string(),
            ));
        }

        let parent_space = if kind == StreamKind::Channel {
            let Some(space_id) = inception.data.space_id.as_deref() else {
                return Err(reject("channel inception names no parent space".to_string()));
            };
            if !self.store.stream_exists(space_id) {
                return Err(Error::StreamNotFound {
                    stream_id: space_id.to_string(),
                });
            }
            Some(space_id.to_string())
        } else {
            None
        };

        let cookie = self.store.create_event_stream(stream_id, events)?;
        debug!(stream_id, %kind, "stream created");

        if let Some(space_id) = parent_space {
            self.append_as_node(&space_id, Payload::channel_created(stream_id))?;
        }
        Ok(cookie)
    }

    /// Verify and append one client event, then write whatever derived
    /// events it implies.
    ///
    /// # Errors
    ///
    /// [`Error::StreamNotFound`] for an unknown stream;
    /// [`Error::MisplacedInception`] for an inception after genesis;
    /// [`Error::EmptyPrevEvents`] for an event with no predecessors;
    /// [`Error::OversizedPayload`] beyond the configured limit;
    /// [`Error::DerivedKindRejected`] for service-only kinds;
    /// [`Error::NotAllowed`] when membership gates deny the creator;
    /// plus any verification failure from [`check_event`].
    pub fn add_event(&mut self, stream_id: &str, event: SignedEvent) -> Result<SyncCookie, Error> {
        match self.append_client_event(stream_id, event) {
            Ok(cookie) => Ok(cookie),
            Err(err) => {
                warn!(stream_id, code = err.code().as_str(), %err, "rejected event");
                Err(err)
            }
        }
    }

    /// Tear down a channel: announce `ChannelDeleted` in the parent
    /// space, then drop the channel stream.
    ///
    /// # Errors
    ///
    /// [`Error::BadStreamId`] when the id is not a channel id,
    /// [`Error::StreamNotFound`] when the channel or its parent space is
    /// not stored.
    pub fn remove_channel(&mut self, channel_id: &str) -> Result<(), Error> {
        if !is_channel_stream_id(channel_id) {
            return Err(Error::BadStreamId {
                id: channel_id.to_string(),
            });
        }
        let stored = self.store.get_event_stream(channel_id)?;
        let view = rollup_stream(channel_id, &stored.events, None)?;
        let Some(space_id) = view.parent_space_id() else {
            return Err(Error::MalformedPayload {
                reason: format!("channel {channel_id} has no parent space"),
            });
        };
        let space_id = space_id.to_string();

        self.append_as_node(&space_id, Payload::channel_deleted(channel_id))?;
        self.store.delete_event_stream(channel_id)?;
        debug!(channel_id, space_id, "channel removed");
        Ok(())
    }

    /// Read what changed since each given position.
    ///
    /// # Errors
    ///
    /// [`Error::BadSyncCookie`] when a cookie is not one the store
    /// issued.
    pub fn sync_streams(
        &self,
        positions: &[SyncPos],
    ) -> Result<BTreeMap<String, StreamAndCookie>, Error> {
        self.store.read_new_events(positions)
    }

    // ---- Append pipeline ----

    fn append_client_event(
        &mut self,
        stream_id: &str,
        event: SignedEvent,
    ) -> Result<SyncCookie, Error> {
        let stored = self.store.get_event_stream(stream_id)?;

        if event.kind() == PayloadKind::Inception {
            return Err(Error::MisplacedInception {
                stream_id: stream_id.to_string(),
            });
        }
        if event.base.prev_events.is_empty() {
            return Err(Error::EmptyPrevEvents {
                kind: event.kind().to_string(),
            });
        }
        check_event(&event, None)?;
        self.check_payload_size(&event)?;
        if event.kind().is_derived() {
            return Err(Error::DerivedKindRejected {
                kind: event.kind().to_string(),
            });
        }
        if self.config.enforce_membership {
            check_authorized(stream_id, &stored.events, &event)?;
        }

        let cookie = self.store.add_events(stream_id, vec![event.clone()])?;
        self.mirror_membership(stream_id, &event)?;
        Ok(cookie)
    }

    fn check_payload_size(&self, event: &SignedEvent) -> Result<(), Error> {
        let size = serde_json::to_vec(&event.base.payload)?.len();
        let limit = self.config.max_payload_bytes;
        if size > limit {
            return Err(Error::OversizedPayload { size, limit });
        }
        Ok(())
    }

    /// Record a membership change in the affected user's own stream.
    /// Users without a stored stream are skipped.
    fn mirror_membership(&mut self, stream_id: &str, event: &SignedEvent) -> Result<(), Error> {
        let mirrored = match &event.base.payload {
            Payload::Invite(payload) => Some((
                payload.user_id.as_str(),
                Payload::user_invited(
                    stream_id,
                    event.base.creator_address.as_str(),
                    make_event_ref(stream_id, event),
                ),
            )),
            Payload::Join(payload) => Some((
                payload.user_id.as_str(),
                Payload::user_joined(stream_id, make_event_ref(stream_id, event)),
            )),
            Payload::Leave(payload) => Some((
                payload.user_id.as_str(),
                Payload::user_left(stream_id, make_event_ref(stream_id, event)),
            )),
            _ => None,
        };
        let Some((user_id, payload)) = mirrored else {
            return Ok(());
        };

        let user_stream_id = make_user_stream_id(user_id);
        if !self.store.stream_exists(&user_stream_id) {
            warn!(user_id, stream_id, "no user stream to mirror membership into");
            return Ok(());
        }
        self.append_as_node(&user_stream_id, payload)?;
        Ok(())
    }

    /// Sign `payload` onto the current leaves of `stream_id` and append.
    fn append_as_node(&mut self, stream_id: &str, payload: Payload) -> Result<SyncCookie, Error> {
        let stored = self.store.get_event_stream(stream_id)?;
        let leaves = find_leaf_event_hashes(stream_id, &stored.events)?;
        let event = make_event(&self.identity, payload, &leaves)?;
        debug!(stream_id, kind = %event.kind(), "derived event appended");
        self.store.add_events(stream_id, vec![event])
    }
}

/// Membership gates: posting and inviting take a joined creator; joining
/// takes a standing invite (or an earlier join); leaving takes either.
fn check_authorized(
    stream_id: &str,
    current: &[SignedEvent],
    event: &SignedEvent,
) -> Result<(), Error> {
    if !matches!(
        event.base.payload,
        Payload::Message(_) | Payload::Invite(_) | Payload::Join(_) | Payload::Leave(_)
    ) {
        return Ok(());
    }

    let view = rollup_stream(stream_id, current, None)?;
    let creator = event.base.creator_address.as_str();
    let denied = |user_id: &str, action: &'static str| Error::NotAllowed {
        stream_id: stream_id.to_string(),
        user_id: user_id.to_string(),
        action,
    };

    match &event.base.payload {
        Payload::Message(_) if !view.is_member(creator) => Err(denied(creator, "post")),
        Payload::Invite(_) if !view.is_member(creator) => Err(denied(creator, "invite")),
        Payload::Join(payload)
            if !view.is_invited(&payload.user_id) && !view.is_member(&payload.user_id) =>
        {
            Err(denied(&payload.user_id, "join"))
        }
        Payload::Leave(payload)
            if !view.is_member(&payload.user_id) && !view.is_invited(&payload.user_id) =>
        {
            Err(denied(&payload.user_id, "leave"))
        }
        _ => Ok(()),
    }
}
