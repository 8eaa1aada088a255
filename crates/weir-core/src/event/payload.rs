//! Typed payloads for the ten event kinds.
//!
//! Every event carries exactly one payload. On the wire a payload is a JSON
//! object with an inline `kind` tag (`"join"`, `"message"`, ...) beside the
//! kind-specific fields. [`Payload`] implements `Serialize` by injecting the
//! tag and `Deserialize` by stripping it before dispatching to the per-kind
//! struct, so the flattened `extra` maps never capture it. Unknown fields
//! are preserved via `#[serde(flatten)]` for forward compatibility.
//!
//! The `user-invited`, `user-joined` and `user-left` kinds are derived:
//! the service writes them into a user's own stream when that user's
//! membership changes somewhere else. Clients never append them directly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

use super::EventRef;

// ---------------------------------------------------------------------------
// StreamKind
// ---------------------------------------------------------------------------

/// The three stream families. Fixed by the inception event, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    /// A user's personal stream: tracks which other streams they belong to.
    User,
    /// A space: a named community holding users and channels.
    Space,
    /// A channel inside a space: holds messages.
    Channel,
}

impl StreamKind {
    /// All stream kinds.
    pub const ALL: [Self; 3] = [Self::User, Self::Space, Self::Channel];

    /// Return the canonical lowercase string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Space => "space",
            Self::Channel => "channel",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PayloadKind
// ---------------------------------------------------------------------------

/// The ten payload kinds in the event catalog.
///
/// String representation is the kebab-case `kind` tag carried in wire JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// First event of a stream; fixes its kind.
    Inception,
    /// Add a user to the stream's joined set.
    Join,
    /// Add a user to the stream's invited set.
    Invite,
    /// Remove a user from the joined and invited sets.
    Leave,
    /// Derived: the stream's owner was invited to another stream.
    UserInvited,
    /// Derived: the stream's owner joined another stream.
    UserJoined,
    /// Derived: the stream's owner left another stream.
    UserLeft,
    /// Register a channel under a space.
    ChannelCreated,
    /// Remove a channel from a space.
    ChannelDeleted,
    /// A chat message.
    Message,
}

/// Error returned when parsing an unknown payload kind string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPayloadKind {
    /// The unrecognised input string.
    pub raw: String,
}

impl fmt::Display for UnknownPayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown payload kind '{}': expected one of inception, join, \
             invite, leave, user-invited, user-joined, user-left, \
             channel-created, channel-deleted, message",
            self.raw
        )
    }
}

impl std::error::Error for UnknownPayloadKind {}

impl PayloadKind {
    /// All known payload kinds in catalog order.
    pub const ALL: [Self; 10] = [
        Self::Inception,
        Self::Join,
        Self::Invite,
        Self::Leave,
        Self::UserInvited,
        Self::UserJoined,
        Self::UserLeft,
        Self::ChannelCreated,
        Self::ChannelDeleted,
        Self::Message,
    ];

    /// Return the canonical kebab-case string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inception => "inception",
            Self::Join => "join",
            Self::Invite => "invite",
            Self::Leave => "leave",
            Self::UserInvited => "user-invited",
            Self::UserJoined => "user-joined",
            Self::UserLeft => "user-left",
            Self::ChannelCreated => "channel-created",
            Self::ChannelDeleted => "channel-deleted",
            Self::Message => "message",
        }
    }

    /// Whether this kind is written by the service rather than by clients.
    #[must_use]
    pub const fn is_derived(self) -> bool {
        matches!(self, Self::UserInvited | Self::UserJoined | Self::UserLeft)
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayloadKind {
    type Err = UnknownPayloadKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inception" => Ok(Self::Inception),
            "join" => Ok(Self::Join),
            "invite" => Ok(Self::Invite),
            "leave" => Ok(Self::Leave),
            "user-invited" => Ok(Self::UserInvited),
            "user-joined" => Ok(Self::UserJoined),
            "user-left" => Ok(Self::UserLeft),
            "channel-created" => Ok(Self::ChannelCreated),
            "channel-deleted" => Ok(Self::ChannelDeleted),
            "message" => Ok(Self::Message),
            _ => Err(UnknownPayloadKind { raw: s.to_string() }),
        }
    }
}

// Custom serde: serialize as the kebab-case string.
impl Serialize for PayloadKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PayloadKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Payload — the unified enum
// ---------------------------------------------------------------------------

/// Typed payload for an event. The discriminant is the `kind` field of the
/// wire JSON object.
///
/// **Serde note:** `Serialize` injects the `kind` tag into the serialized
/// object; `Deserialize` goes through [`Payload::from_value`], which strips
/// the tag before parsing the per-kind struct. This keeps the tag out of the
/// flattened `extra` maps on both paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Payload for `inception`.
    Inception(InceptionPayload),
    /// Payload for `join`.
    Join(JoinPayload),
    /// Payload for `invite`.
    Invite(InvitePayload),
    /// Payload for `leave`.
    Leave(LeavePayload),
    /// Payload for `user-invited`.
    UserInvited(UserInvitedPayload),
    /// Payload for `user-joined`.
    UserJoined(UserJoinedPayload),
    /// Payload for `user-left`.
    UserLeft(UserLeftPayload),
    /// Payload for `channel-created`.
    ChannelCreated(ChannelCreatedPayload),
    /// Payload for `channel-deleted`.
    ChannelDeleted(ChannelDeletedPayload),
    /// Payload for `message`.
    Message(MessagePayload),
}

impl Payload {
    /// Inception payload for a user or space stream.
    #[must_use]
    pub fn inception(stream_id: impl Into<String>, stream_kind: StreamKind) -> Self {
        Self::Inception(InceptionPayload {
            stream_id: stream_id.into(),
            data: InceptionData {
                stream_kind,
                space_id: None,
                extra: BTreeMap::new(),
            },
            extra: BTreeMap::new(),
        })
    }

    /// Inception payload for a channel stream under `space_id`.
    #[must_use]
    pub fn channel_inception(stream_id: impl Into<String>, space_id: impl Into<String>) -> Self {
        Self::Inception(InceptionPayload {
            stream_id: stream_id.into(),
            data: InceptionData {
                stream_kind: StreamKind::Channel,
                space_id: Some(space_id.into()),
                extra: BTreeMap::new(),
            },
            extra: BTreeMap::new(),
        })
    }

    /// Join payload.
    #[must_use]
    pub fn join(user_id: impl Into<String>) -> Self {
        Self::Join(JoinPayload {
            user_id: user_id.into(),
            extra: BTreeMap::new(),
        })
    }

    /// Invite payload.
    #[must_use]
    pub fn invite(user_id: impl Into<String>) -> Self {
        Self::Invite(InvitePayload {
            user_id: user_id.into(),
            extra: BTreeMap::new(),
        })
    }

    /// Leave payload.
    #[must_use]
    pub fn leave(user_id: impl Into<String>) -> Self {
        Self::Leave(LeavePayload {
            user_id: user_id.into(),
            extra: BTreeMap::new(),
        })
    }

    /// Derived user-invited payload.
    #[must_use]
    pub fn user_invited(
        stream_id: impl Into<String>,
        inviter_id: impl Into<String>,
        event_ref: EventRef,
    ) -> Self {
        Self::UserInvited(UserInvitedPayload {
            stream_id: stream_id.into(),
            inviter_id: inviter_id.into(),
            event_ref,
            extra: BTreeMap::new(),
        })
    }

    /// Derived user-joined payload.
    #[must_use]
    pub fn user_joined(stream_id: impl Into<String>, event_ref: EventRef) -> Self {
        Self::UserJoined(UserJoinedPayload {
            stream_id: stream_id.into(),
            event_ref,
            extra: BTreeMap::new(),
        })
    }

    /// Derived user-left payload.
    #[must_use]
    pub fn user_left(stream_id: impl Into<String>, event_ref: EventRef) -> Self {
        Self::UserLeft(UserLeftPayload {
            stream_id: stream_id.into(),
            event_ref,
            extra: BTreeMap::new(),
        })
    }

    /// Channel-created payload.
    #[must_use]
    pub fn channel_created(channel_id: impl Into<String>) -> Self {
        Self::ChannelCreated(ChannelCreatedPayload {
            channel_id: channel_id.into(),
            extra: BTreeMap::new(),
        })
    }

    /// Channel-deleted payload.
    #[must_use]
    pub fn channel_deleted(channel_id: impl Into<String>) -> Self {
        Self::ChannelDeleted(ChannelDeletedPayload {
            channel_id: channel_id.into(),
            extra: BTreeMap::new(),
        })
    }

    /// Message payload.
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message(MessagePayload {
            text: text.into(),
            extra: BTreeMap::new(),
        })
    }

    /// Return the kind tag for this payload.
    #[must_use]
    pub const fn kind(&self) -> PayloadKind {
        match self {
            Self::Inception(_) => PayloadKind::Inception,
            Self::Join(_) => PayloadKind::Join,
            Self::Invite(_) => PayloadKind::Invite,
            Self::Leave(_) => PayloadKind::Leave,
            Self::UserInvited(_) => PayloadKind::UserInvited,
            Self::UserJoined(_) => PayloadKind::UserJoined,
            Self::UserLeft(_) => PayloadKind::UserLeft,
            Self::ChannelCreated(_) => PayloadKind::ChannelCreated,
            Self::ChannelDeleted(_) => PayloadKind::ChannelDeleted,
            Self::Message(_) => PayloadKind::Message,
        }
    }

    /// Parse a payload from a wire JSON value carrying an inline `kind` tag.
    ///
    /// This is the boundary deserializer: anything arriving from storage or
    /// the network goes through here before the rest of the crate sees it.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedPayload`] if the value is not an object, has no
    /// string `kind`, or the kind-specific fields do not match the schema.
    /// [`Error::UnknownPayload`] if the kind tag is not in the catalog,
    /// which surfaces as `INTERNAL_ERROR_SWITCH` and is fatal.
    pub fn from_value(value: serde_json::Value) -> Result<Self, Error> {
        let serde_json::Value::Object(mut fields) = value else {
            return Err(Error::MalformedPayload {
                reason: "payload must be a JSON object".to_string(),
            });
        };
        let Some(tag) = fields.remove("kind") else {
            return Err(Error::MalformedPayload {
                reason: "payload has no kind field".to_string(),
            });
        };
        let serde_json::Value::String(tag) = tag else {
            return Err(Error::MalformedPayload {
                reason: "payload kind must be a string".to_string(),
            });
        };
        let kind = tag
            .parse::<PayloadKind>()
            .map_err(|err| Error::UnknownPayload { kind: err.raw })?;

        let rest = serde_json::Value::Object(fields);
        let result = match kind {
            PayloadKind::Inception => {
                serde_json::from_value::<InceptionPayload>(rest).map(Self::Inception)
            }
            PayloadKind::Join => serde_json::from_value::<JoinPayload>(rest).map(Self::Join),
            PayloadKind::Invite => serde_json::from_value::<InvitePayload>(rest).map(Self::Invite),
            PayloadKind::Leave => serde_json::from_value::<LeavePayload>(rest).map(Self::Leave),
            PayloadKind::UserInvited => {
                serde_json::from_value::<UserInvitedPayload>(rest).map(Self::UserInvited)
            }
            PayloadKind::UserJoined => {
                serde_json::from_value::<UserJoinedPayload>(rest).map(Self::UserJoined)
            }
            PayloadKind::UserLeft => {
                serde_json::from_value::<UserLeftPayload>(rest).map(Self::UserLeft)
            }
            PayloadKind::ChannelCreated => {
                serde_json::from_value::<ChannelCreatedPayload>(rest).map(Self::ChannelCreated)
            }
            PayloadKind::ChannelDeleted => {
                serde_json::from_value::<ChannelDeletedPayload>(rest).map(Self::ChannelDeleted)
            }
            PayloadKind::Message => {
                serde_json::from_value::<MessagePayload>(rest).map(Self::Message)
            }
        };

        result.map_err(|source| Error::MalformedPayload {
            reason: format!("invalid {kind} payload: {source}"),
        })
    }

    /// Serialize the payload to a [`serde_json::Value`] including the `kind`
    /// tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the inner struct fails to serialize
    /// (should not happen with well-formed data).
    pub fn to_value(&self) -> Result<serde_json::Value, Error> {
        let mut value = match self {
            Self::Inception(p) => serde_json::to_value(p),
            Self::Join(p) => serde_json::to_value(p),
            Self::Invite(p) => serde_json::to_value(p),
            Self::Leave(p) => serde_json::to_value(p),
            Self::UserInvited(p) => serde_json::to_value(p),
            Self::UserJoined(p) => serde_json::to_value(p),
            Self::UserLeft(p) => serde_json::to_value(p),
            Self::ChannelCreated(p) => serde_json::to_value(p),
            Self::ChannelDeleted(p) => serde_json::to_value(p),
            Self::Message(p) => serde_json::to_value(p),
        }?;
        if let serde_json::Value::Object(fields) = &mut value {
            fields.insert(
                "kind".to_string(),
                serde_json::Value::String(self.kind().as_str().to_string()),
            );
        }
        Ok(value)
    }
}

impl Serialize for Payload {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.to_value().map_err(serde::ser::Error::custom)?;
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Payload structs — one per kind
// ---------------------------------------------------------------------------

/// Kind-specific genesis data carried by an inception payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InceptionData {
    /// The kind this stream will have for its whole life.
    pub stream_kind: StreamKind,

    /// Parent space id. Set only for channel streams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Payload for `inception`.
///
/// The first event of every stream. Embeds the stream's own id so a view
/// can detect events grafted from a different stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InceptionPayload {
    /// Id of the stream this event incepts.
    pub stream_id: String,

    /// Genesis data fixing the stream kind.
    pub data: InceptionData,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Payload for `join`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    /// User joining the stream.
    pub user_id: String,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Payload for `invite`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitePayload {
    /// User being invited.
    pub user_id: String,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Payload for `leave`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeavePayload {
    /// User leaving the stream.
    pub user_id: String,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Payload for `user-invited`.
///
/// Written into the invitee's own stream. `event_ref` points at the invite
/// event in the source stream, `inviter_id` at who sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInvitedPayload {
    /// The stream the user was invited to.
    pub stream_id: String,

    /// The user who issued the invite.
    pub inviter_id: String,

    /// Reference to the originating invite event.
    #[serde(rename = "ref")]
    pub event_ref: EventRef,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Payload for `user-joined`.
///
/// Written into the joining user's own stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserJoinedPayload {
    /// The stream the user joined.
    pub stream_id: String,

    /// Reference to the originating join event.
    #[serde(rename = "ref")]
    pub event_ref: EventRef,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Payload for `user-left`.
///
/// Written into the leaving user's own stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLeftPayload {
    /// The stream the user left.
    pub stream_id: String,

    /// Reference to the originating leave event.
    #[serde(rename = "ref")]
    pub event_ref: EventRef,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Payload for `channel-created`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelCreatedPayload {
    /// Channel stream registered under the space.
    pub channel_id: String,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Payload for `channel-deleted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDeletedPayload {
    /// Channel stream removed from the space.
    pub channel_id: String,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Payload for `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    /// Message body.
    pub text: String,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_ref() -> EventRef {
        EventRef {
            stream_id: "s-lobby".into(),
            hash: format!("0x{}", "ab".repeat(32)),
            signature: format!("0x{}1b", "cd".repeat(64)),
            creator_address: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".into(),
        }
    }

    fn one_of_each() -> Vec<Payload> {
        vec![
            Payload::Inception(InceptionPayload {
                stream_id: "c-general".into(),
                data: InceptionData {
                    stream_kind: StreamKind::Channel,
                    space_id: Some("s-lobby".into()),
                    extra: BTreeMap::new(),
                },
                extra: BTreeMap::new(),
            }),
            Payload::Join(JoinPayload {
                user_id: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".into(),
                extra: BTreeMap::new(),
            }),
            Payload::Invite(InvitePayload {
                user_id: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".into(),
                extra: BTreeMap::new(),
            }),
            Payload::Leave(LeavePayload {
                user_id: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".into(),
                extra: BTreeMap::new(),
            }),
            Payload::UserInvited(UserInvitedPayload {
                stream_id: "s-lobby".into(),
                inviter_id: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".into(),
                event_ref: sample_ref(),
                extra: BTreeMap::new(),
            }),
            Payload::UserJoined(UserJoinedPayload {
                stream_id: "s-lobby".into(),
                event_ref: sample_ref(),
                extra: BTreeMap::new(),
            }),
            Payload::UserLeft(UserLeftPayload {
                stream_id: "s-lobby".into(),
                event_ref: sample_ref(),
                extra: BTreeMap::new(),
            }),
            Payload::ChannelCreated(ChannelCreatedPayload {
                channel_id: "c-general".into(),
                extra: BTreeMap::new(),
            }),
            Payload::ChannelDeleted(ChannelDeletedPayload {
                channel_id: "c-general".into(),
                extra: BTreeMap::new(),
            }),
            Payload::Message(MessagePayload {
                text: "hello".into(),
                extra: BTreeMap::new(),
            }),
        ]
    }

    // === PayloadKind ========================================================

    #[test]
    fn kind_display_all() {
        let expected = [
            (PayloadKind::Inception, "inception"),
            (PayloadKind::Join, "join"),
            (PayloadKind::Invite, "invite"),
            (PayloadKind::Leave, "leave"),
            (PayloadKind::UserInvited, "user-invited"),
            (PayloadKind::UserJoined, "user-joined"),
            (PayloadKind::UserLeft, "user-left"),
            (PayloadKind::ChannelCreated, "channel-created"),
            (PayloadKind::ChannelDeleted, "channel-deleted"),
            (PayloadKind::Message, "message"),
        ];
        for (kind, s) in expected {
            assert_eq!(kind.to_string(), s);
            assert_eq!(kind.as_str(), s);
        }
    }

    #[test]
    fn kind_fromstr_roundtrip() {
        for kind in PayloadKind::ALL {
            let parsed: PayloadKind = kind.as_str().parse().expect("should parse");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn kind_fromstr_rejects_unknown() {
        let err = "reaction".parse::<PayloadKind>().unwrap_err();
        assert_eq!(err.raw, "reaction");
        assert!(err.to_string().contains("expected one of"));
    }

    #[test]
    fn kind_fromstr_rejects_empty_and_case() {
        assert!("".parse::<PayloadKind>().is_err());
        assert!("Join".parse::<PayloadKind>().is_err());
    }

    #[test]
    fn kind_serde_as_string() {
        for kind in PayloadKind::ALL {
            let json = serde_json::to_string(&kind).expect("serialize");
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let back: PayloadKind = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn kind_all_has_ten_entries() {
        assert_eq!(PayloadKind::ALL.len(), 10);
    }

    #[test]
    fn kind_error_lists_valid_options() {
        let err = UnknownPayloadKind { raw: "nope".into() };
        let msg = err.to_string();
        for kind in PayloadKind::ALL {
            assert!(msg.contains(kind.as_str()), "missing {}", kind.as_str());
        }
    }

    #[test]
    fn only_user_stream_kinds_are_derived() {
        let derived: Vec<_> = PayloadKind::ALL
            .into_iter()
            .filter(|kind| kind.is_derived())
            .collect();
        assert_eq!(
            derived,
            vec![
                PayloadKind::UserInvited,
                PayloadKind::UserJoined,
                PayloadKind::UserLeft
            ]
        );
    }

    // === StreamKind =========================================================

    #[test]
    fn stream_kind_wire_strings() {
        for kind in StreamKind::ALL {
            let json = serde_json::to_string(&kind).expect("serialize");
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let back: StreamKind = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn constructors_cover_every_kind() {
        let built = [
            Payload::inception("s-lobby", StreamKind::Space),
            Payload::join("u1"),
            Payload::invite("u1"),
            Payload::leave("u1"),
            Payload::user_invited("s-lobby", "u2", sample_ref()),
            Payload::user_joined("s-lobby", sample_ref()),
            Payload::user_left("s-lobby", sample_ref()),
            Payload::channel_created("c-general"),
            Payload::channel_deleted("c-general"),
            Payload::message("hi"),
        ];
        let kinds: Vec<_> = built.iter().map(Payload::kind).collect();
        assert_eq!(kinds, PayloadKind::ALL.to_vec());

        let Payload::Inception(channel) = Payload::channel_inception("c-general", "s-lobby")
        else {
            panic!("expected inception payload");
        };
        assert_eq!(channel.data.stream_kind, StreamKind::Channel);
        assert_eq!(channel.data.space_id.as_deref(), Some("s-lobby"));
    }

    // === Payload serde ======================================================

    #[test]
    fn each_payload_roundtrips_through_value() {
        for payload in one_of_each() {
            let value = payload.to_value().expect("to_value");
            let back = Payload::from_value(value).expect("from_value");
            assert_eq!(back, payload);
        }
    }

    #[test]
    fn serialize_injects_kind_tag() {
        for payload in one_of_each() {
            let value = serde_json::to_value(&payload).expect("serialize");
            assert_eq!(
                value.get("kind"),
                Some(&json!(payload.kind().as_str())),
                "missing tag for {}",
                payload.kind()
            );
        }
    }

    #[test]
    fn inception_wire_shape() {
        let payload = Payload::Inception(InceptionPayload {
            stream_id: "s-lobby".into(),
            data: InceptionData {
                stream_kind: StreamKind::Space,
                space_id: None,
                extra: BTreeMap::new(),
            },
            extra: BTreeMap::new(),
        });
        let json = serde_json::to_string(&payload).expect("serialize");
        assert_eq!(
            json,
            r#"{"data":{"streamKind":"space"},"kind":"inception","streamId":"s-lobby"}"#
        );
    }

    #[test]
    fn user_invited_uses_ref_wire_name() {
        let payload = Payload::UserInvited(UserInvitedPayload {
            stream_id: "s-lobby".into(),
            inviter_id: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".into(),
            event_ref: sample_ref(),
            extra: BTreeMap::new(),
        });
        let value = serde_json::to_value(&payload).expect("serialize");
        assert!(value.get("ref").is_some());
        assert!(value.get("eventRef").is_none());
        assert!(value.get("inviterId").is_some());
    }

    #[test]
    fn from_value_parses_wire_json() {
        let value = json!({
            "kind": "join",
            "userId": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        });
        let payload = Payload::from_value(value).expect("from_value");
        let Payload::Join(join) = payload else {
            panic!("expected join payload");
        };
        assert_eq!(join.user_id, "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert!(join.extra.is_empty());
    }

    #[test]
    fn kind_tag_never_lands_in_extra() {
        let value = json!({ "kind": "message", "text": "hi" });
        let Payload::Message(msg) = Payload::from_value(value).expect("from_value") else {
            panic!("expected message payload");
        };
        assert!(msg.extra.is_empty());

        // And reserializing emits exactly one kind tag.
        let json = serde_json::to_string(&Payload::Message(msg)).expect("serialize");
        assert_eq!(json.matches("\"kind\"").count(), 1);
    }

    #[test]
    fn unknown_fields_survive_roundtrip() {
        let value = json!({
            "kind": "message",
            "text": "hi",
            "replyTo": "0x1234"
        });
        let payload = Payload::from_value(value).expect("from_value");
        let Payload::Message(msg) = &payload else {
            panic!("expected message payload");
        };
        assert_eq!(msg.extra.get("replyTo"), Some(&json!("0x1234")));

        let reserialized = serde_json::to_string(&payload).expect("serialize");
        assert!(reserialized.contains("replyTo"));
    }

    #[test]
    fn from_value_rejects_unknown_kind() {
        let err = Payload::from_value(json!({ "kind": "reaction" })).unwrap_err();
        assert!(matches!(err, Error::UnknownPayload { ref kind } if kind == "reaction"));
        assert_eq!(err.code(), crate::error::ErrCode::InternalErrorSwitch);
    }

    #[test]
    fn from_value_rejects_non_object() {
        let err = Payload::from_value(json!("join")).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrCode::BadPayload);
    }

    #[test]
    fn from_value_rejects_missing_kind() {
        let err = Payload::from_value(json!({ "text": "hi" })).unwrap_err();
        assert!(err.to_string().contains("no kind field"));
    }

    #[test]
    fn from_value_rejects_schema_mismatch() {
        let err = Payload::from_value(json!({ "kind": "join" })).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrCode::BadPayload);
        assert!(err.to_string().contains("invalid join payload"));
    }

    #[test]
    fn inception_space_id_omitted_when_none() {
        let data = InceptionData {
            stream_kind: StreamKind::User,
            space_id: None,
            extra: BTreeMap::new(),
        };
        let json = serde_json::to_string(&data).expect("serialize");
        assert!(!json.contains("spaceId"));
    }
}
