//! Change signals reported by the projector.

use crate::event::{SignedEvent, StreamKind};

// ---------------------------------------------------------------------------
// StreamSignal
// ---------------------------------------------------------------------------

/// One observable state change produced while folding events into a
/// [`StreamView`](crate::stream::StreamView).
///
/// Per-event signals fire as each event is applied; [`Initialized`] or
/// [`Updated`] fires once per applied batch, after the per-event signals.
/// The membership signals carry the id of the stream the membership
/// changed in: for the user-stream variants (`UserInvitedToStream` and
/// friends) that is the target stream named by the payload, not the user
/// stream the event was written to.
///
/// [`Initialized`]: StreamSignal::Initialized
/// [`Updated`]: StreamSignal::Updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSignal {
    /// The stream's genesis event was applied.
    Inception { stream_id: String, kind: StreamKind },
    /// `user_id` joined the stream.
    NewUserJoined { stream_id: String, user_id: String },
    /// `user_id` was invited to the stream.
    NewUserInvited { stream_id: String, user_id: String },
    /// `user_id` left (or retracted an invite to) the stream.
    UserLeft { stream_id: String, user_id: String },
    /// The user this stream belongs to was invited to `stream_id`.
    UserInvitedToStream { stream_id: String },
    /// The user this stream belongs to joined `stream_id`.
    UserJoinedStream { stream_id: String },
    /// The user this stream belongs to left `stream_id`.
    UserLeftStream { stream_id: String },
    /// A channel was created under the space.
    NewChannelCreated { space_id: String, channel_id: String },
    /// A channel was deleted from the space.
    ChannelDeleted { space_id: String, channel_id: String },
    /// A message event landed in the channel.
    NewMessage { channel_id: String, event: SignedEvent },
    /// Batch signal: the view was built from scratch with `events`.
    Initialized {
        stream_id: String,
        kind: StreamKind,
        events: Vec<SignedEvent>,
    },
    /// Batch signal: `events` were appended to an existing view.
    Updated {
        stream_id: String,
        events: Vec<SignedEvent>,
    },
}

impl StreamSignal {
    /// Stable signal name for logs and subscription filters.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Inception { .. } => "streamInception",
            Self::NewUserJoined { .. } => "streamNewUserJoined",
            Self::NewUserInvited { .. } => "streamNewUserInvited",
            Self::UserLeft { .. } => "streamUserLeft",
            Self::UserInvitedToStream { .. } => "userInvitedToStream",
            Self::UserJoinedStream { .. } => "userJoinedStream",
            Self::UserLeftStream { .. } => "userLeftStream",
            Self::NewChannelCreated { .. } => "spaceNewChannelCreated",
            Self::ChannelDeleted { .. } => "spaceChannelDeleted",
            Self::NewMessage { .. } => "channelNewMessage",
            Self::Initialized { .. } => "streamInitialized",
            Self::Updated { .. } => "streamUpdated",
        }
    }
}

// ---------------------------------------------------------------------------
// StreamSink
// ---------------------------------------------------------------------------

/// Receiver for projector signals.
///
/// Implementations must not assume signals arrive for one stream only;
/// a single sink may observe several views.
pub trait StreamSink {
    fn emit(&mut self, signal: StreamSignal);
}

/// Collects signals in order. The workhorse sink for tests and for
/// callers that want to inspect a batch after the fact.
impl StreamSink for Vec<StreamSignal> {
    fn emit(&mut self, signal: StreamSignal) {
        self.push(signal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Identity, Payload, make_event};
    use std::collections::HashSet;

    #[test]
    fn vec_sink_records_in_order() {
        let mut sink: Vec<StreamSignal> = Vec::new();
        sink.emit(StreamSignal::NewUserJoined {
            stream_id: "s-home".into(),
            user_id: "0xaa".into(),
        });
        sink.emit(StreamSignal::UserLeft {
            stream_id: "s-home".into(),
            user_id: "0xaa".into(),
        });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].name(), "streamNewUserJoined");
        assert_eq!(sink[1].name(), "streamUserLeft");
    }

    #[test]
    fn signal_names_are_distinct() {
        let identity = Identity::random();
        let event = make_event(&identity, Payload::channel_inception("c-x", "s-x"), &[]).unwrap();

        let all = [
            StreamSignal::Inception {
                stream_id: "s-x".into(),
                kind: StreamKind::Space,
            },
            StreamSignal::NewUserJoined {
                stream_id: "s-x".into(),
                user_id: "0xaa".into(),
            },
            StreamSignal::NewUserInvited {
                stream_id: "s-x".into(),
                user_id: "0xaa".into(),
            },
            StreamSignal::UserLeft {
                stream_id: "s-x".into(),
                user_id: "0xaa".into(),
            },
            StreamSignal::UserInvitedToStream {
                stream_id: "s-x".into(),
            },
            StreamSignal::UserJoinedStream {
                stream_id: "s-x".into(),
            },
            StreamSignal::UserLeftStream {
                stream_id: "s-x".into(),
            },
            StreamSignal::NewChannelCreated {
                space_id: "s-x".into(),
                channel_id: "c-x".into(),
            },
            StreamSignal::ChannelDeleted {
                space_id: "s-x".into(),
                channel_id: "c-x".into(),
            },
            StreamSignal::NewMessage {
                channel_id: "c-x".into(),
                event: event.clone(),
            },
            StreamSignal::Initialized {
                stream_id: "c-x".into(),
                kind: StreamKind::Channel,
                events: vec![event.clone()],
            },
            StreamSignal::Updated {
                stream_id: "c-x".into(),
                events: vec![event],
            },
        ];

        let names: HashSet<&str> = all.iter().map(StreamSignal::name).collect();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn signals_compare_by_content() {
        let a = StreamSignal::UserJoinedStream {
            stream_id: "s-1".into(),
        };
        let b = StreamSignal::UserJoinedStream {
            stream_id: "s-1".into(),
        };
        let c = StreamSignal::UserJoinedStream {
            stream_id: "s-2".into(),
        };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
