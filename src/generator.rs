//! Frame serialisation into pooled buffers.
//!
//! [`MessageGenerator`] writes one frame per call into a [`Lease`]. A frame
//! that fits in one buffer of the configured capacity is written whole;
//! otherwise the header gets its own buffer and the payload follows, either
//! referenced in place (zero-copy `DATA`) or copied in capacity-sized pieces.

use bytes::{BufMut, BytesMut};
use tracing::{debug, trace};

use crate::{
    config::GeneratorConfig,
    error::GenerateError,
    frame::Frame,
    metrics::{self, Direction},
    pool::{Lease, PoolError},
    stream::StreamId,
};

/// Serialises frames into the buffers of a [`Lease`].
///
/// The generator holds only configuration, so one instance can serve any
/// number of streams and threads.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use bytes::Bytes;
/// use h3frame::{
///     frame::{DataFrame, Frame},
///     generator::MessageGenerator,
///     pool::{Lease, NullBufferPool},
///     stream::StreamId,
/// };
///
/// let generator = MessageGenerator::new(8192, true);
/// let mut lease = Lease::new(Arc::new(NullBufferPool));
/// let frame = Frame::from(DataFrame::new(Bytes::from_static(b"hi"), false));
/// let written = generator
///     .generate(&mut lease, StreamId::new(0), &frame)
///     .expect("generate frame");
/// assert_eq!(written, 4);
/// assert_eq!(lease.to_bytes(), Bytes::from_static(&[0x00, 0x02, b'h', b'i']));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct MessageGenerator {
    config: GeneratorConfig,
}

impl MessageGenerator {
    /// Create a generator with the given buffer capacity and zero-copy flag.
    #[must_use]
    pub fn new(max_buffer_capacity: usize, zero_copy: bool) -> Self {
        Self::with_config(
            GeneratorConfig::default()
                .max_buffer_capacity(max_buffer_capacity)
                .zero_copy(zero_copy),
        )
    }

    /// Create a generator from a full configuration.
    #[must_use]
    pub const fn with_config(config: GeneratorConfig) -> Self { Self { config } }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> GeneratorConfig { self.config }

    /// Append `frame` to `lease`, returning the number of bytes written.
    ///
    /// The frame is not modified. Nothing is sent; the caller transmits the
    /// lease buffers in order and sets the transport's end-of-stream marker
    /// after a `DATA` frame whose [`is_last`](crate::frame::DataFrame::is_last)
    /// is set. On error the lease is left as it was before the call.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::UnexpectedFrame`] if the frame type may not
    /// travel on `stream_id`, and [`GenerateError::Pool`] if the pool cannot
    /// supply a buffer.
    pub fn generate(
        &self,
        lease: &mut Lease,
        stream_id: StreamId,
        frame: &Frame,
    ) -> Result<usize, GenerateError> {
        let frame_type = frame.frame_type();
        if !frame_type.permitted_on(stream_id.role()) {
            metrics::inc_errors("unexpected_frame");
            return Err(GenerateError::UnexpectedFrame {
                frame_type,
                stream_id,
            });
        }

        let mark = lease.len();
        let written = self.write_frame(lease, frame).inspect_err(|err| {
            lease.truncate(mark);
            debug!(%stream_id, %frame_type, error = %err, "frame generation failed");
        })?;

        trace!(
            %stream_id,
            %frame_type,
            bytes = written,
            buffers = lease.len() - mark,
            "generated frame"
        );
        metrics::inc_frames(Direction::Outbound, frame_type.as_str());
        Ok(written)
    }

    fn write_frame(&self, lease: &mut Lease, frame: &Frame) -> Result<usize, PoolError> {
        let capacity = self.config.buffer_capacity();
        let header_len = frame.header_len();
        let payload_len = frame.payload_len();
        let total = header_len + payload_len;

        if total <= capacity {
            let buffer = lease.acquire(total)?;
            frame.encode_header(buffer);
            frame.encode_payload(buffer);
            return Ok(total);
        }

        frame.encode_header(lease.acquire(header_len)?);
        match frame {
            Frame::Data(data) if self.config.uses_zero_copy() => lease.append(data.data().clone()),
            Frame::Data(data) => copy_in_pieces(lease, data.data(), capacity)?,
            Frame::Headers(headers) => copy_in_pieces(lease, headers.field_section(), capacity)?,
            Frame::CancelPush(_)
            | Frame::Settings(_)
            | Frame::PushPromise(_)
            | Frame::GoAway(_)
            | Frame::MaxPushId(_) => {
                let mut payload = BytesMut::with_capacity(payload_len);
                frame.encode_payload(&mut payload);
                copy_in_pieces(lease, &payload, capacity)?;
            }
        }
        Ok(total)
    }
}

fn copy_in_pieces(lease: &mut Lease, payload: &[u8], capacity: usize) -> Result<(), PoolError> {
    for piece in payload.chunks(capacity) {
        lease.acquire(piece.len())?.put_slice(piece);
    }
    Ok(())
}
