//! Stream id scheme and random id generation.
//!
//! Ids are prefixed by kind: `u-<address>` for user streams, `s-<name>` for
//! spaces, `c-<name>` for channels. The unique constructors append a random
//! 21-char base62 suffix, the same alphabet event salts use.

use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};

use crate::error::Error;
use crate::event::StreamKind;

/// Length of generated ids and event salts.
const ID_LENGTH: usize = 21;

/// Generate a random 21-char base62 id.
#[must_use]
pub fn gen_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LENGTH)
        .map(char::from)
        .collect()
}

/// Id of a user's own stream: `u-` + their checksummed address.
#[must_use]
pub fn make_user_stream_id(address: &str) -> String {
    format!("u-{address}")
}

/// Id of a space stream: `s-` + a name.
#[must_use]
pub fn make_space_stream_id(name: &str) -> String {
    format!("s-{name}")
}

/// Id of a channel stream: `c-` + a name.
#[must_use]
pub fn make_channel_stream_id(name: &str) -> String {
    format!("c-{name}")
}

/// Fresh space stream id with a random suffix.
#[must_use]
pub fn make_unique_space_stream_id() -> String {
    make_space_stream_id(&gen_id())
}

/// Fresh channel stream id with a random suffix.
#[must_use]
pub fn make_unique_channel_stream_id() -> String {
    make_channel_stream_id(&gen_id())
}

/// Classify a stream id by its prefix.
///
/// # Errors
///
/// Returns [`Error::BadStreamId`] on an unknown prefix or empty suffix.
pub fn parse_stream_id(id: &str) -> Result<StreamKind, Error> {
    let bad = || Error::BadStreamId { id: id.to_string() };
    let (prefix, suffix) = id.split_at_checked(2).ok_or_else(bad)?;
    if suffix.is_empty() {
        return Err(bad());
    }
    match prefix {
        "u-" => Ok(StreamKind::User),
        "s-" => Ok(StreamKind::Space),
        "c-" => Ok(StreamKind::Channel),
        _ => Err(bad()),
    }
}

/// Whether `id` names a user stream.
#[must_use]
pub fn is_user_stream_id(id: &str) -> bool {
    matches!(parse_stream_id(id), Ok(StreamKind::User))
}

/// Whether `id` names a space stream.
#[must_use]
pub fn is_space_stream_id(id: &str) -> bool {
    matches!(parse_stream_id(id), Ok(StreamKind::Space))
}

/// Whether `id` names a channel stream.
#[must_use]
pub fn is_channel_stream_id(id: &str) -> bool {
    matches!(parse_stream_id(id), Ok(StreamKind::Channel))
}

/// User ids are the user's checksummed address, unchanged.
#[must_use]
pub fn user_id_from_address(address: &str) -> String {
    address.to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
