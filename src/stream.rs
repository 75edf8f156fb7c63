//! Stream identifiers and the roles encoded in their low bits.
//!
//! The transport assigns stream identifiers so that the two low-order bits
//! form a fixed tag: bit 0 names the initiator and bit 1 the
//! directionality. Classification is a lookup in a constant four-entry table.

use std::fmt;

/// Endpoint that opened a stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Initiator {
    /// Opened by the client.
    Client,
    /// Opened by the server.
    Server,
}

/// Whether a stream carries data in one or both directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Directionality {
    /// Both peers may send.
    Bidirectional,
    /// Only the initiator sends.
    Unidirectional,
}

/// Initiator and directionality of a stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StreamRole {
    /// Endpoint that opened the stream.
    pub initiator: Initiator,
    /// Direction of data flow.
    pub directionality: Directionality,
}

impl StreamRole {
    const fn new(initiator: Initiator, directionality: Directionality) -> Self {
        Self {
            initiator,
            directionality,
        }
    }

    /// Whether the role describes a unidirectional stream.
    #[must_use]
    pub const fn is_unidirectional(self) -> bool {
        matches!(self.directionality, Directionality::Unidirectional)
    }

    /// Whether the role describes a bidirectional stream.
    #[must_use]
    pub const fn is_bidirectional(self) -> bool { !self.is_unidirectional() }
}

const ROLES: [StreamRole; 4] = [
    StreamRole::new(Initiator::Client, Directionality::Bidirectional),
    StreamRole::new(Initiator::Server, Directionality::Bidirectional),
    StreamRole::new(Initiator::Client, Directionality::Unidirectional),
    StreamRole::new(Initiator::Server, Directionality::Unidirectional),
];

const ROLE_MASK: u64 = 0b11;
const DIRECTION_BIT: u64 = 0b10;

/// Transport-assigned stream identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamId(u64);

impl StreamId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Return the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }

    /// Role encoded in the identifier's low bits.
    #[must_use]
    pub const fn role(self) -> StreamRole { role_of(self) }
}

impl From<u64> for StreamId {
    fn from(id: u64) -> Self { Self(id) }
}

impl From<StreamId> for u64 {
    fn from(id: StreamId) -> Self { id.0 }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// Classify a stream by its identifier.
///
/// # Examples
///
/// ```
/// use h3frame::stream::{Directionality, Initiator, StreamId, role_of};
///
/// let role = role_of(StreamId::new(6));
/// assert_eq!(role.initiator, Initiator::Client);
/// assert_eq!(role.directionality, Directionality::Unidirectional);
/// ```
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "the value is masked to two bits"
)]
pub const fn role_of(id: StreamId) -> StreamRole { ROLES[(id.0 & ROLE_MASK) as usize] }

/// Whether `id` names a unidirectional stream.
#[must_use]
pub const fn is_unidirectional(id: StreamId) -> bool { id.0 & DIRECTION_BIT != 0 }

/// Whether `id` names a bidirectional stream.
#[must_use]
pub const fn is_bidirectional(id: StreamId) -> bool { !is_unidirectional(id) }
