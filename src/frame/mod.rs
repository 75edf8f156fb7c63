//! Typed frame model.
//!
//! Every frame on the wire is `varint(type) || varint(length) || payload`.
//! [`Frame`] is a closed enum with one variant per known frame type; the
//! generator and parser dispatch on it with exhaustive matches, so adding a
//! variant forces both directions to be updated.
//!
//! Frames are immutable once built. Constructors validate anything the wire
//! format cannot represent, which keeps [`Frame::payload_len`] and
//! [`Frame::encode_payload`] infallible.

use std::fmt;

use bytes::{Buf, BufMut, Bytes};

use crate::{
    error::MalformedError,
    stream::StreamRole,
    varint::{self, Decoded},
};

pub mod control;
pub mod data;
pub mod settings;

pub use control::{CancelPushFrame, GoAwayFrame, MaxPushIdFrame};
pub use data::{DataFrame, HeadersFrame, PushPromiseFrame};
pub use settings::{Setting, SettingsFrame};

/// Known frame types and their wire tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameType {
    /// Message body bytes.
    Data,
    /// Encoded header field section.
    Headers,
    /// Cancels a server push.
    CancelPush,
    /// Connection configuration parameters.
    Settings,
    /// Announces a server push.
    PushPromise,
    /// Initiates graceful connection shutdown.
    GoAway,
    /// Limits the push identifiers a server may use.
    MaxPushId,
}

impl FrameType {
    /// Every known frame type.
    pub const ALL: [Self; 7] = [
        Self::Data,
        Self::Headers,
        Self::CancelPush,
        Self::Settings,
        Self::PushPromise,
        Self::GoAway,
        Self::MaxPushId,
    ];

    /// Wire tag of this frame type.
    #[must_use]
    pub const fn tag(self) -> u64 {
        match self {
            Self::Data => 0x00,
            Self::Headers => 0x01,
            Self::CancelPush => 0x03,
            Self::Settings => 0x04,
            Self::PushPromise => 0x05,
            Self::GoAway => 0x07,
            Self::MaxPushId => 0x0d,
        }
    }

    /// Look up the frame type carrying `tag`.
    ///
    /// # Examples
    ///
    /// ```
    /// use h3frame::frame::FrameType;
    ///
    /// assert_eq!(FrameType::from_tag(0x04), Some(FrameType::Settings));
    /// assert_eq!(FrameType::from_tag(0x21), None);
    /// ```
    #[must_use]
    pub const fn from_tag(tag: u64) -> Option<Self> {
        match tag {
            0x00 => Some(Self::Data),
            0x01 => Some(Self::Headers),
            0x03 => Some(Self::CancelPush),
            0x04 => Some(Self::Settings),
            0x05 => Some(Self::PushPromise),
            0x07 => Some(Self::GoAway),
            0x0d => Some(Self::MaxPushId),
            _ => None,
        }
    }

    /// Upper-case protocol name, for logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Data => "DATA",
            Self::Headers => "HEADERS",
            Self::CancelPush => "CANCEL_PUSH",
            Self::Settings => "SETTINGS",
            Self::PushPromise => "PUSH_PROMISE",
            Self::GoAway => "GOAWAY",
            Self::MaxPushId => "MAX_PUSH_ID",
        }
    }

    /// Whether frames of this type may appear on a stream with `role`.
    ///
    /// Connection-level frames travel on the unidirectional control stream,
    /// `PUSH_PROMISE` only on request streams, and message frames on either.
    #[must_use]
    pub const fn permitted_on(self, role: StreamRole) -> bool {
        match self {
            Self::Data | Self::Headers => true,
            Self::PushPromise => role.is_bidirectional(),
            Self::CancelPush | Self::Settings | Self::GoAway | Self::MaxPushId => {
                role.is_unidirectional()
            }
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Whether `tag` belongs to a frame type that only existed in HTTP/2.
///
/// Such frames are always a protocol violation.
#[must_use]
pub const fn is_reserved_http2(tag: u64) -> bool { matches!(tag, 0x02 | 0x06 | 0x08 | 0x09) }

/// Whether `tag` is a reserved `0x1f * N + 0x21` type that peers send to
/// exercise extension handling.
#[must_use]
pub const fn is_grease(tag: u64) -> bool { tag >= 0x21 && (tag - 0x21) % 0x1f == 0 }

/// A single protocol frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    /// `DATA` frame.
    Data(DataFrame),
    /// `HEADERS` frame.
    Headers(HeadersFrame),
    /// `CANCEL_PUSH` frame.
    CancelPush(CancelPushFrame),
    /// `SETTINGS` frame.
    Settings(SettingsFrame),
    /// `PUSH_PROMISE` frame.
    PushPromise(PushPromiseFrame),
    /// `GOAWAY` frame.
    GoAway(GoAwayFrame),
    /// `MAX_PUSH_ID` frame.
    MaxPushId(MaxPushIdFrame),
}

impl Frame {
    /// Type of this frame.
    #[must_use]
    pub const fn frame_type(&self) -> FrameType {
        match self {
            Self::Data(_) => FrameType::Data,
            Self::Headers(_) => FrameType::Headers,
            Self::CancelPush(_) => FrameType::CancelPush,
            Self::Settings(_) => FrameType::Settings,
            Self::PushPromise(_) => FrameType::PushPromise,
            Self::GoAway(_) => FrameType::GoAway,
            Self::MaxPushId(_) => FrameType::MaxPushId,
        }
    }

    /// Encoded payload length, computed without serialising.
    #[must_use]
    pub fn payload_len(&self) -> usize {
        match self {
            Self::Data(frame) => frame.data().len(),
            Self::Headers(frame) => frame.field_section().len(),
            Self::CancelPush(frame) => frame.payload_len(),
            Self::Settings(frame) => frame.payload_len(),
            Self::PushPromise(frame) => frame.payload_len(),
            Self::GoAway(frame) => frame.payload_len(),
            Self::MaxPushId(frame) => frame.payload_len(),
        }
    }

    /// Length of the type and length prefix preceding the payload.
    #[must_use]
    pub fn header_len(&self) -> usize {
        varint_len(self.frame_type().tag()) + varint_len(self.payload_len() as u64)
    }

    /// Total bytes this frame occupies on the wire.
    #[must_use]
    pub fn wire_len(&self) -> usize { self.header_len() + self.payload_len() }

    /// Write the type and length prefix to `dst`.
    pub fn encode_header<B: BufMut>(&self, dst: &mut B) {
        put_varint(self.frame_type().tag(), dst);
        put_varint(self.payload_len() as u64, dst);
    }

    /// Serialise the payload into `dst`.
    pub fn encode_payload<B: BufMut>(&self, dst: &mut B) {
        match self {
            Self::Data(frame) => dst.put_slice(frame.data()),
            Self::Headers(frame) => dst.put_slice(frame.field_section()),
            Self::CancelPush(frame) => frame.encode(dst),
            Self::Settings(frame) => frame.encode(dst),
            Self::PushPromise(frame) => frame.encode(dst),
            Self::GoAway(frame) => frame.encode(dst),
            Self::MaxPushId(frame) => frame.encode(dst),
        }
    }

    /// Rebuild a frame from its complete payload.
    ///
    /// `last` is recorded on `DATA` frames and ignored otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedError`] if the payload does not match the layout of
    /// `frame_type`.
    pub fn decode_payload(
        frame_type: FrameType,
        payload: Bytes,
        last: bool,
    ) -> Result<Self, MalformedError> {
        let frame = match frame_type {
            FrameType::Data => Self::Data(DataFrame::new(payload, last)),
            FrameType::Headers => Self::Headers(HeadersFrame::new(payload)),
            FrameType::CancelPush => Self::CancelPush(CancelPushFrame::decode(payload)?),
            FrameType::Settings => Self::Settings(SettingsFrame::decode(payload)?),
            FrameType::PushPromise => Self::PushPromise(PushPromiseFrame::decode(payload)?),
            FrameType::GoAway => Self::GoAway(GoAwayFrame::decode(payload)?),
            FrameType::MaxPushId => Self::MaxPushId(MaxPushIdFrame::decode(payload)?),
        };
        Ok(frame)
    }
}

macro_rules! impl_from_frame {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Frame {
                fn from(frame: $ty) -> Self { Self::$variant(frame) }
            }
        )*
    };
}

impl_from_frame!(
    Data(DataFrame),
    Headers(HeadersFrame),
    CancelPush(CancelPushFrame),
    Settings(SettingsFrame),
    PushPromise(PushPromiseFrame),
    GoAway(GoAwayFrame),
    MaxPushId(MaxPushIdFrame),
);

/// Length of a varint already validated by a frame constructor.
pub(crate) fn varint_len(value: u64) -> usize { varint::encoded_len(value).unwrap_or(varint::MAX_LEN) }

/// Write a varint already validated by a frame constructor.
pub(crate) fn put_varint<B: BufMut>(value: u64, dst: &mut B) {
    let written = varint::encode(value, dst);
    debug_assert!(written.is_ok(), "frame constructors validate varint fields");
}

/// Read one varint from the front of a frame payload.
pub(crate) fn take_varint(
    frame_type: FrameType,
    payload: &mut Bytes,
) -> Result<u64, MalformedError> {
    match varint::decode(payload)? {
        Decoded::Complete { value, consumed } => {
            payload.advance(consumed);
            Ok(value)
        }
        Decoded::Incomplete { .. } => Err(MalformedError::InvalidPayload {
            frame_type,
            reason: "truncated varint",
        }),
    }
}

/// Ensure a structured payload was consumed exactly.
pub(crate) fn expect_consumed(frame_type: FrameType, rest: &Bytes) -> Result<(), MalformedError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(MalformedError::InvalidPayload {
            frame_type,
            reason: "trailing bytes",
        })
    }
}

#[cfg(test)]
mod tests;
