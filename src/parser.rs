//! Resumable frame parser.
//!
//! [`MessageParser`] is an explicit state record driven by repeated
//! synchronous calls. Each call consumes bytes from the supplied chunk until
//! one frame completes or the chunk runs dry, so chunks may be empty, hold
//! several frames, or split a varint or payload anywhere.
//!
//! ```text
//! AwaitingType -> AwaitingLength -> AwaitingPayload -> (emit) -> AwaitingType
//! ```
//!
//! `Ok(None)` always means "feed me more bytes". Anything the parser rejects
//! is an `Err`, after which the parser is poisoned.

use bytes::{Buf, BufMut, BytesMut};
use log::warn;
use tracing::{debug, trace};

use crate::{
    config::{ParserConfig, UnknownFramePolicy},
    error::{MalformedError, ParseError},
    frame::{Frame, FrameType, is_grease, is_reserved_http2},
    metrics::{self, Direction},
    stream::StreamId,
    varint::VarIntDecoder,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Known(FrameType),
    Skip(u64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    AwaitingType,
    AwaitingLength { frame_type: u64 },
    AwaitingPayload { target: Target, len: usize, remaining: usize },
    Failed,
}

/// Incremental parser for the frames of one stream.
///
/// Bytes must be fed in transport order. The parser owns no external
/// resources, so dropping it mid-frame is always safe.
///
/// # Examples
///
/// ```
/// use h3frame::{frame::Frame, parser::MessageParser, stream::StreamId};
///
/// let mut parser = MessageParser::new(StreamId::new(0));
/// let mut first = &[0x00, 0x03, b'a'][..];
/// assert_eq!(parser.parse(&mut first), Ok(None));
///
/// let mut rest = &[b'b', b'c'][..];
/// let frame = parser.parse_last(&mut rest).expect("valid frame").expect("complete");
/// let Frame::Data(data) = frame else { panic!("expected DATA") };
/// assert_eq!(data.data().as_ref(), b"abc");
/// assert!(data.is_last());
/// ```
#[derive(Debug)]
pub struct MessageParser {
    config: ParserConfig,
    stream_id: StreamId,
    phase: Phase,
    varint: VarIntDecoder,
    payload: BytesMut,
}

impl MessageParser {
    /// Create a parser for `stream_id` with default configuration.
    #[must_use]
    pub fn new(stream_id: StreamId) -> Self { Self::with_config(stream_id, ParserConfig::default()) }

    /// Create a parser for `stream_id` with `config`.
    #[must_use]
    pub fn with_config(stream_id: StreamId, config: ParserConfig) -> Self {
        Self {
            config,
            stream_id,
            phase: Phase::AwaitingType,
            varint: VarIntDecoder::new(),
            payload: BytesMut::new(),
        }
    }

    /// Stream whose bytes this parser reads.
    #[must_use]
    pub const fn stream_id(&self) -> StreamId { self.stream_id }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> ParserConfig { self.config }

    /// Whether some bytes of a frame have been read but the frame is not
    /// complete.
    #[must_use]
    pub fn is_mid_frame(&self) -> bool {
        match self.phase {
            Phase::AwaitingType => self.varint.is_partial(),
            Phase::AwaitingLength { .. } | Phase::AwaitingPayload { .. } => true,
            Phase::Failed => false,
        }
    }

    /// Whether a previous error left the parser unusable.
    #[must_use]
    pub const fn is_poisoned(&self) -> bool { matches!(self.phase, Phase::Failed) }

    /// Consume bytes from `chunk` and return the next complete frame.
    ///
    /// Returns `Ok(None)` once `chunk` is exhausted without completing a
    /// frame; call again with the next chunk. At most one frame is returned
    /// per call, so loop while `chunk` has bytes left.
    ///
    /// Payloads lying wholly inside `chunk` are taken with
    /// [`Buf::copy_to_bytes`], which shares rather than copies when `chunk`
    /// is a [`Bytes`](bytes::Bytes). Payloads spanning chunks are accumulated
    /// in an owned buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for malformed input, unknown frame types under
    /// the strict policy, or frames not permitted on this stream. The parser
    /// is poisoned afterwards and reports [`ParseError::Poisoned`].
    pub fn parse<B: Buf>(&mut self, chunk: &mut B) -> Result<Option<Frame>, ParseError> {
        self.parse_chunk(chunk, false)
    }

    /// Like [`parse`](Self::parse) for the final chunk of the stream.
    ///
    /// A `DATA` frame ending exactly where this chunk ends is marked
    /// [`last`](crate::frame::DataFrame::is_last).
    ///
    /// # Errors
    ///
    /// As [`parse`](Self::parse); additionally reports
    /// [`MalformedError::TruncatedHeader`] or
    /// [`MalformedError::TruncatedPayload`] when the chunk ends inside a
    /// frame.
    pub fn parse_last<B: Buf>(&mut self, chunk: &mut B) -> Result<Option<Frame>, ParseError> {
        self.parse_chunk(chunk, true)
    }

    fn parse_chunk<B: Buf>(
        &mut self,
        chunk: &mut B,
        end_of_stream: bool,
    ) -> Result<Option<Frame>, ParseError> {
        let result = self.advance(chunk, end_of_stream).and_then(|frame| match frame {
            None if end_of_stream => self.check_truncation().map(|()| None),
            other => Ok(other),
        });

        match &result {
            Ok(Some(frame)) => {
                trace!(
                    stream_id = %self.stream_id,
                    frame_type = %frame.frame_type(),
                    payload_len = frame.payload_len(),
                    "parsed frame"
                );
                metrics::inc_frames(Direction::Inbound, frame.frame_type().as_str());
            }
            Ok(None) | Err(ParseError::Poisoned) => {}
            Err(err) => {
                debug!(stream_id = %self.stream_id, error = %err, "frame parsing failed");
                metrics::inc_errors(err.error_type());
                self.poison();
            }
        }
        result
    }

    fn advance<B: Buf>(
        &mut self,
        chunk: &mut B,
        end_of_stream: bool,
    ) -> Result<Option<Frame>, ParseError> {
        loop {
            match self.phase {
                Phase::AwaitingType => {
                    let Some(frame_type) = self.read_varint(chunk)? else {
                        return Ok(None);
                    };
                    if is_reserved_http2(frame_type) {
                        return Err(MalformedError::ReservedFrameType { frame_type }.into());
                    }
                    self.phase = Phase::AwaitingLength { frame_type };
                }
                Phase::AwaitingLength { frame_type } => {
                    let Some(len) = self.read_varint(chunk)? else {
                        return Ok(None);
                    };
                    self.phase = self.begin_payload(frame_type, len)?;
                }
                Phase::AwaitingPayload {
                    target: Target::Skip(frame_type),
                    len,
                    remaining,
                } => {
                    let step = remaining.min(chunk.remaining());
                    chunk.advance(step);
                    if step < remaining {
                        self.phase = Phase::AwaitingPayload {
                            target: Target::Skip(frame_type),
                            len,
                            remaining: remaining - step,
                        };
                        return Ok(None);
                    }
                    self.phase = Phase::AwaitingType;
                }
                Phase::AwaitingPayload {
                    target: Target::Known(frame_type),
                    len,
                    remaining,
                } => {
                    let payload = if self.payload.is_empty() && chunk.remaining() >= remaining {
                        chunk.copy_to_bytes(remaining)
                    } else {
                        let step = remaining.min(chunk.remaining());
                        self.payload.put((&mut *chunk).take(step));
                        if step < remaining {
                            self.phase = Phase::AwaitingPayload {
                                target: Target::Known(frame_type),
                                len,
                                remaining: remaining - step,
                            };
                            return Ok(None);
                        }
                        self.payload.split().freeze()
                    };
                    self.phase = Phase::AwaitingType;
                    let last = end_of_stream && !chunk.has_remaining();
                    return Frame::decode_payload(frame_type, payload, last)
                        .map(Some)
                        .map_err(ParseError::from);
                }
                Phase::Failed => return Err(ParseError::Poisoned),
            }
        }
    }

    fn read_varint<B: Buf>(&mut self, chunk: &mut B) -> Result<Option<u64>, ParseError> {
        self.varint
            .push(chunk)
            .map_err(|err| MalformedError::from(err).into())
    }

    fn begin_payload(&self, frame_type: u64, declared: u64) -> Result<Phase, ParseError> {
        let max = self.config.frame_payload_limit();
        let len = usize::try_from(declared)
            .ok()
            .filter(|len| *len <= max)
            .ok_or(MalformedError::FrameTooLarge {
                frame_type,
                declared,
                max,
            })?;

        let target = match FrameType::from_tag(frame_type) {
            Some(known) if known.permitted_on(self.stream_id.role()) => Target::Known(known),
            Some(known) => {
                return Err(ParseError::UnexpectedFrame {
                    frame_type: known,
                    stream_id: self.stream_id,
                });
            }
            None => match self.config.policy() {
                UnknownFramePolicy::Strict => {
                    return Err(ParseError::UnknownFrameType { frame_type });
                }
                UnknownFramePolicy::Lenient => {
                    if !is_grease(frame_type) {
                        warn!(
                            "skipping unknown frame: stream_id={}, frame_type={frame_type:#x}, \
                             len={len}",
                            self.stream_id
                        );
                    }
                    Target::Skip(frame_type)
                }
            },
        };

        Ok(Phase::AwaitingPayload {
            target,
            len,
            remaining: len,
        })
    }

    fn check_truncation(&self) -> Result<(), ParseError> {
        match self.phase {
            Phase::AwaitingType if self.varint.is_partial() => {
                Err(MalformedError::TruncatedHeader.into())
            }
            Phase::AwaitingLength { .. } => Err(MalformedError::TruncatedHeader.into()),
            Phase::AwaitingPayload { len, remaining, .. } => {
                Err(MalformedError::TruncatedPayload {
                    received: len - remaining,
                    expected: len,
                }
                .into())
            }
            Phase::AwaitingType | Phase::Failed => Ok(()),
        }
    }

    fn poison(&mut self) {
        self.phase = Phase::Failed;
        self.varint.reset();
        self.payload = BytesMut::new();
    }
}
