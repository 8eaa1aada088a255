//! Protocol error taxonomy.
//!
//! Every failure carries an [`ErrCode`] — a stable, RPC-transmissible code —
//! plus a human message and whatever structured context the failing
//! operation had on hand. Verification failures (`BAD_*`) are expected,
//! recoverable-by-caller conditions. [`ErrCode::InternalErrorSwitch`] is a
//! programmer error (an unhandled payload kind crossed a boundary) and must
//! never be caught-and-continued.

use std::fmt;

// ---------------------------------------------------------------------------
// ErrCode
// ---------------------------------------------------------------------------

/// Machine-readable protocol error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrCode {
    BadPrevEvents,
    BadHashFormat,
    BadEventId,
    BadEventSignature,
    BadEvent,
    BadPayload,
    BadStreamId,
    BadSyncCookie,
    BadStreamCreationParams,
    PermissionDenied,
    StreamEmpty,
    StreamBadHashes,
    StreamBadEvent,
    StreamNotFound,
    InternalErrorSwitch,
}

impl ErrCode {
    /// Every code, for exhaustive iteration in tests and tooling.
    pub const ALL: [Self; 15] = [
        Self::BadPrevEvents,
        Self::BadHashFormat,
        Self::BadEventId,
        Self::BadEventSignature,
        Self::BadEvent,
        Self::BadPayload,
        Self::BadStreamId,
        Self::BadSyncCookie,
        Self::BadStreamCreationParams,
        Self::PermissionDenied,
        Self::StreamEmpty,
        Self::StreamBadHashes,
        Self::StreamBadEvent,
        Self::StreamNotFound,
        Self::InternalErrorSwitch,
    ];

    /// Stable numeric code for wire transmission.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::BadPrevEvents => 1,
            Self::BadHashFormat => 2,
            Self::BadEventId => 3,
            Self::BadEventSignature => 4,
            Self::BadEvent => 5,
            Self::BadPayload => 6,
            Self::BadStreamId => 7,
            Self::BadSyncCookie => 8,
            Self::BadStreamCreationParams => 9,
            Self::PermissionDenied => 10,
            Self::StreamEmpty => 11,
            Self::StreamBadHashes => 12,
            Self::StreamBadEvent => 13,
            Self::StreamNotFound => 14,
            Self::InternalErrorSwitch => 15,
        }
    }

    /// Stable wire identifier for machine parsing.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadPrevEvents => "BAD_PREV_EVENTS",
            Self::BadHashFormat => "BAD_HASH_FORMAT",
            Self::BadEventId => "BAD_EVENT_ID",
            Self::BadEventSignature => "BAD_EVENT_SIGNATURE",
            Self::BadEvent => "BAD_EVENT",
            Self::BadPayload => "BAD_PAYLOAD",
            Self::BadStreamId => "BAD_STREAM_ID",
            Self::BadSyncCookie => "BAD_SYNC_COOKIE",
            Self::BadStreamCreationParams => "BAD_STREAM_CREATION_PARAMS",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::StreamEmpty => "STREAM_EMPTY",
            Self::StreamBadHashes => "STREAM_BAD_HASHES",
            Self::StreamBadEvent => "STREAM_BAD_EVENT",
            Self::StreamNotFound => "STREAM_NOT_FOUND",
            Self::InternalErrorSwitch => "INTERNAL_ERROR_SWITCH",
        }
    }

    /// Short human-facing summary for logs.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::BadPrevEvents => "Malformed or missing predecessor references",
            Self::BadHashFormat => "Malformed event hash string",
            Self::BadEventId => "Recomputed hash does not match claimed hash",
            Self::BadEventSignature => "Signature does not recover to claimed creator",
            Self::BadEvent => "Event not valid at this position in the stream",
            Self::BadPayload => "Payload rejected",
            Self::BadStreamId => "Malformed stream id",
            Self::BadSyncCookie => "Unparseable sync cookie",
            Self::BadStreamCreationParams => "Invalid stream creation batch",
            Self::PermissionDenied => "Creator is not allowed to perform this action",
            Self::StreamEmpty => "Stream has no events",
            Self::StreamBadHashes => "Leaf resolution failed",
            Self::StreamBadEvent => "First event of stream is not a valid inception",
            Self::StreamNotFound => "Referenced stream not found in store",
            Self::InternalErrorSwitch => "Unhandled payload kind in exhaustive dispatch",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::BadPrevEvents => {
                Some("Re-read the stream and rebuild the event on its current leaf hashes.")
            }
            Self::BadHashFormat => Some("Event hashes are 0x followed by 64 lowercase hex chars."),
            Self::BadSyncCookie => Some("Re-fetch the stream to obtain a fresh cookie."),
            Self::StreamNotFound => Some("Create the stream before appending to it."),
            Self::InternalErrorSwitch => {
                Some("Schema/version mismatch between peers. Upgrade before retrying.")
            }
            _ => None,
        }
    }

    /// Fatal codes indicate programmer errors, not bad input; callers must
    /// not swallow them.
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::InternalErrorSwitch)
    }
}

impl fmt::Display for ErrCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// The protocol error type. Each variant maps to exactly one [`ErrCode`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("event of kind {kind} must reference at least one predecessor")]
    EmptyPrevEvents { kind: String },

    #[error("expected exactly one predecessor, found {found}")]
    PrevCountNotOne { found: usize },

    #[error("predecessor mismatch: expected {expected}, found {found}")]
    PrevHashMismatch { expected: String, found: String },

    #[error("malformed event hash: {hash}")]
    BadHashFormat { hash: String },

    #[error("event hash mismatch: claimed {claimed}, computed {computed}")]
    HashMismatch { claimed: String, computed: String },

    #[error("malformed signature: {reason}")]
    MalformedSignature { reason: String },

    #[error("signing failed: {reason}")]
    Signing { reason: String },

    #[error("signature recovers to {recovered} but event claims {claimed}")]
    SignerMismatch { claimed: String, recovered: String },

    #[error("inception event not allowed after genesis of {stream_id}")]
    MisplacedInception { stream_id: String },

    #[error("derived payload kind {kind} cannot be appended directly")]
    DerivedKindRejected { kind: String },

    #[error("payload is {size} bytes, limit is {limit}")]
    OversizedPayload { size: usize, limit: usize },

    #[error("payload json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed payload: {reason}")]
    MalformedPayload { reason: String },

    #[error("malformed stream id: {id}")]
    BadStreamId { id: String },

    #[error("unparseable sync cookie: {cookie}")]
    BadSyncCookie { cookie: String },

    #[error("stream {stream_id} already exists")]
    StreamExists { stream_id: String },

    #[error("invalid creation batch for {stream_id}: {reason}")]
    BadCreationEvents { stream_id: String, reason: String },

    #[error("{user_id} may not {action} in {stream_id}")]
    NotAllowed {
        stream_id: String,
        user_id: String,
        action: &'static str,
    },

    #[error("stream {stream_id} is empty")]
    MissingInception { stream_id: String },

    #[error("stream {stream_id} has no events to resolve")]
    EmptyEventList { stream_id: String },

    #[error("no leaf event found in {stream_id}")]
    NoLeafEvents { stream_id: String },

    #[error("first event of {stream_id} is not an inception")]
    NotInception { stream_id: String },

    #[error("inception declares stream id {found}, expected {expected}")]
    InceptionStreamIdMismatch { expected: String, found: String },

    #[error("stream {stream_id} not found")]
    StreamNotFound { stream_id: String },

    #[error("unhandled payload kind: {kind}")]
    UnknownPayload { kind: String },
}

impl Error {
    /// The wire code this error maps to.
    #[must_use]
    pub const fn code(&self) -> ErrCode {
        match self {
            Self::EmptyPrevEvents { .. }
            | Self::PrevCountNotOne { .. }
            | Self::PrevHashMismatch { .. } => ErrCode::BadPrevEvents,
            Self::BadHashFormat { .. } => ErrCode::BadHashFormat,
            Self::HashMismatch { .. } => ErrCode::BadEventId,
            Self::MalformedSignature { .. } | Self::Signing { .. } | Self::SignerMismatch { .. } => {
                ErrCode::BadEventSignature
            }
            Self::MisplacedInception { .. } | Self::DerivedKindRejected { .. } => ErrCode::BadEvent,
            Self::OversizedPayload { .. } | Self::Json(_) | Self::MalformedPayload { .. } => {
                ErrCode::BadPayload
            }
            Self::BadStreamId { .. } => ErrCode::BadStreamId,
            Self::BadSyncCookie { .. } => ErrCode::BadSyncCookie,
            Self::StreamExists { .. } | Self::BadCreationEvents { .. } => {
                ErrCode::BadStreamCreationParams
            }
            Self::NotAllowed { .. } => ErrCode::PermissionDenied,
            Self::MissingInception { .. } => ErrCode::StreamEmpty,
            Self::EmptyEventList { .. } | Self::NoLeafEvents { .. } => ErrCode::StreamBadHashes,
            Self::NotInception { .. } | Self::InceptionStreamIdMismatch { .. } => {
                ErrCode::StreamBadEvent
            }
            Self::StreamNotFound { .. } => ErrCode::StreamNotFound,
            Self::UnknownPayload { .. } => ErrCode::InternalErrorSwitch,
        }
    }
}
