//! Frames carrying message bytes: `DATA`, `HEADERS` and `PUSH_PROMISE`.
//!
//! Field sections are kept as opaque, already-compressed bytes; header
//! compression happens in a separate layer.

use bytes::{BufMut, Bytes};

use super::{FrameType, put_varint, take_varint, varint_len};
use crate::{error::MalformedError, varint::VarIntError};

/// Body bytes of a message.
///
/// `last` is not part of the frame encoding. It mirrors the transport's
/// end-of-stream marker: a generator's caller closes the stream after
/// sending a `last` frame and the parser sets it on the frame that ends a
/// stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataFrame {
    data: Bytes,
    last: bool,
}

impl DataFrame {
    /// Build a data frame.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::Bytes;
    /// use h3frame::frame::DataFrame;
    ///
    /// let frame = DataFrame::new(Bytes::from_static(b"hello"), true);
    /// assert_eq!(frame.data(), b"hello".as_slice());
    /// assert!(frame.is_last());
    /// ```
    #[must_use]
    pub fn new(data: impl Into<Bytes>, last: bool) -> Self {
        Self {
            data: data.into(),
            last,
        }
    }

    /// Payload bytes.
    #[must_use]
    pub fn data(&self) -> &Bytes { &self.data }

    /// Whether this frame ends the stream.
    #[must_use]
    pub const fn is_last(&self) -> bool { self.last }

    /// Consume the frame, returning its payload.
    #[must_use]
    pub fn into_data(self) -> Bytes { self.data }
}

/// Encoded header field section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadersFrame {
    field_section: Bytes,
}

impl HeadersFrame {
    /// Wrap an encoded field section.
    #[must_use]
    pub fn new(field_section: impl Into<Bytes>) -> Self {
        Self {
            field_section: field_section.into(),
        }
    }

    /// Encoded field section.
    #[must_use]
    pub fn field_section(&self) -> &Bytes { &self.field_section }
}

/// Server push announcement: a push identifier followed by the promised
/// request's encoded field section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushPromiseFrame {
    push_id: u64,
    field_section: Bytes,
}

impl PushPromiseFrame {
    /// Build a push promise.
    ///
    /// # Errors
    ///
    /// Returns [`VarIntError::ValueTooLarge`] if `push_id` exceeds the varint
    /// range.
    pub fn new(push_id: u64, field_section: impl Into<Bytes>) -> Result<Self, VarIntError> {
        if push_id > crate::varint::MAX_VALUE {
            return Err(VarIntError::ValueTooLarge { value: push_id });
        }
        Ok(Self {
            push_id,
            field_section: field_section.into(),
        })
    }

    /// Push identifier.
    #[must_use]
    pub const fn push_id(&self) -> u64 { self.push_id }

    /// Encoded field section of the promised request.
    #[must_use]
    pub fn field_section(&self) -> &Bytes { &self.field_section }

    pub(super) fn payload_len(&self) -> usize {
        varint_len(self.push_id) + self.field_section.len()
    }

    pub(super) fn encode<B: BufMut>(&self, dst: &mut B) {
        put_varint(self.push_id, dst);
        dst.put_slice(&self.field_section);
    }

    pub(super) fn decode(mut payload: Bytes) -> Result<Self, MalformedError> {
        let push_id = take_varint(FrameType::PushPromise, &mut payload)?;
        Ok(Self {
            push_id,
            field_section: payload,
        })
    }
}
