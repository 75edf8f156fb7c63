//! Tokio codec adapter.
//!
//! [`FrameCodec`] drives one stream's [`MessageParser`] and
//! [`MessageGenerator`] through `tokio_util`'s [`Decoder`] and [`Encoder`]
//! traits, so frames can be read and written with `FramedRead` and
//! `FramedWrite` over any `AsyncRead` or `AsyncWrite` that models the stream.
//!
//! Errors surface as [`io::Error`]: malformed input maps to
//! [`io::ErrorKind::InvalidData`], a stream ending inside a frame to
//! [`io::ErrorKind::UnexpectedEof`], and pool exhaustion to
//! [`io::ErrorKind::OutOfMemory`].

use std::{io, sync::Arc};

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::{
    config::{GeneratorConfig, ParserConfig},
    frame::{DataFrame, Frame},
    generator::MessageGenerator,
    parser::MessageParser,
    pool::{BufferPool, Lease, NullBufferPool},
    stream::StreamId,
};

/// Encoder and decoder for the frames of a single stream.
///
/// Decoded payloads are split off the read buffer without copying whenever a
/// frame arrives whole. A `DATA` frame is marked
/// [`last`](crate::frame::DataFrame::is_last) only when it is completed by
/// [`Decoder::decode_eof`]; frames finished by [`Decoder::decode`] cannot
/// know that the stream is about to end. `FramedRead` completes every whole
/// frame through `decode`, so enable [`detect_last`](Self::detect_last) to
/// carry the flag on that path.
///
/// # Examples
///
/// ```
/// use bytes::{Bytes, BytesMut};
/// use h3frame::{
///     codec::FrameCodec,
///     frame::{DataFrame, Frame},
///     stream::StreamId,
/// };
/// use tokio_util::codec::{Decoder, Encoder};
///
/// let mut codec = FrameCodec::new(StreamId::new(0));
/// let mut wire = BytesMut::new();
/// let frame = Frame::from(DataFrame::new(Bytes::from_static(b"hi"), false));
/// codec.encode(frame.clone(), &mut wire).expect("encode");
/// assert_eq!(codec.decode(&mut wire).expect("decode"), Some(frame));
/// ```
#[derive(Debug)]
pub struct FrameCodec {
    parser: MessageParser,
    generator: MessageGenerator,
    pool: Arc<dyn BufferPool>,
    detect_last: bool,
    held: Option<DataFrame>,
}

impl FrameCodec {
    /// Codec for `stream_id` with default configuration and no pooling.
    #[must_use]
    pub fn new(stream_id: StreamId) -> Self {
        Self::with_config(stream_id, ParserConfig::default(), GeneratorConfig::default())
    }

    /// Codec for `stream_id` with explicit parser and generator settings.
    #[must_use]
    pub fn with_config(stream_id: StreamId, parser: ParserConfig, generator: GeneratorConfig) -> Self {
        Self {
            parser: MessageParser::with_config(stream_id, parser),
            generator: MessageGenerator::with_config(generator),
            pool: Arc::new(NullBufferPool),
            detect_last: false,
            held: None,
        }
    }

    /// Draw encoder buffers from `pool` instead of allocating them.
    #[must_use]
    pub fn with_pool(mut self, pool: Arc<dyn BufferPool>) -> Self {
        self.pool = pool;
        self
    }

    /// Hold back a `DATA` frame that drains the read buffer until it is known
    /// whether the stream ends there.
    ///
    /// The held frame is delivered once more bytes arrive, with `last` unset,
    /// or at end of stream, with `last` set. A peer that waits for a reply
    /// before sending more will therefore not see its final `DATA` frame
    /// decoded until it closes the stream.
    #[must_use]
    pub fn detect_last(mut self, enabled: bool) -> Self {
        self.detect_last = enabled;
        self
    }

    /// Stream this codec serves.
    #[must_use]
    pub const fn stream_id(&self) -> StreamId { self.parser.stream_id() }

    /// Underlying parser.
    #[must_use]
    pub const fn parser(&self) -> &MessageParser { &self.parser }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.held.is_some() {
            if src.is_empty() {
                return Ok(None);
            }
            return Ok(self.held.take().map(Frame::Data));
        }
        match self.parser.parse(src)? {
            Some(Frame::Data(data)) if self.detect_last && src.is_empty() => {
                self.held = Some(data);
                Ok(None)
            }
            frame => Ok(frame),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(data) = self.held.take() {
            let last = src.is_empty();
            return Ok(Some(Frame::Data(DataFrame::new(data.into_data(), last))));
        }
        self.parser.parse_last(src).map_err(io::Error::from)
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = io::Error;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let mut lease = Lease::new(Arc::clone(&self.pool));
        let written = self
            .generator
            .generate(&mut lease, self.parser.stream_id(), &item)?;
        dst.reserve(written);
        for buffer in lease.buffers() {
            dst.extend_from_slice(buffer);
        }
        lease.release();
        Ok(())
    }
}
