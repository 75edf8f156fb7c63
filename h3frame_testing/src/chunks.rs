//! Chunking and parsing helpers.

use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};
use h3frame::{
    config::ParserConfig,
    error::{GenerateError, ParseError},
    frame::Frame,
    generator::MessageGenerator,
    parser::MessageParser,
    pool::{Lease, NullBufferPool},
    stream::StreamId,
    varint,
};

/// Encode `frame_type || len || payload` without any validation.
///
/// Useful for unknown, grease and reserved types that [`Frame`] cannot
/// represent.
///
/// # Panics
///
/// Panics if `frame_type` exceeds the varint range.
#[must_use]
pub fn raw_frame(frame_type: u64, payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::new();
    varint::encode(frame_type, &mut buf).expect("frame type within varint range");
    varint::encode(payload.len() as u64, &mut buf).expect("length within varint range");
    buf.put_slice(payload);
    buf.freeze()
}

/// Generate `frames` back to back and flatten the lease into one buffer.
///
/// # Errors
///
/// Propagates the first [`GenerateError`].
pub fn encode_frames(
    generator: &MessageGenerator,
    stream_id: StreamId,
    frames: &[Frame],
) -> Result<Bytes, GenerateError> {
    let mut lease = Lease::new(Arc::new(NullBufferPool));
    for frame in frames {
        generator.generate(&mut lease, stream_id, frame)?;
    }
    Ok(lease.to_bytes())
}

/// Split `bytes` into consecutive chunks of the given sizes.
///
/// Splitting stops once the input is used up; any remainder left after the
/// last size becomes a final chunk. Zero sizes before that point yield empty
/// chunks.
#[must_use]
pub fn split_at_sizes(bytes: &Bytes, sizes: &[usize]) -> Vec<Bytes> {
    let mut chunks = Vec::with_capacity(sizes.len() + 1);
    let mut offset = 0;
    for &size in sizes {
        if offset == bytes.len() {
            return chunks;
        }
        let end = (offset + size).min(bytes.len());
        chunks.push(bytes.slice(offset..end));
        offset = end;
    }
    if offset < bytes.len() {
        chunks.push(bytes.slice(offset..));
    }
    chunks
}

/// Split `bytes` into single-byte chunks.
#[must_use]
pub fn byte_chunks(bytes: &Bytes) -> Vec<Bytes> {
    (0..bytes.len()).map(|i| bytes.slice(i..=i)).collect()
}

/// Feed `chunks` to a fresh default parser, the last one as end of stream.
///
/// # Errors
///
/// Returns the first [`ParseError`] reported by the parser.
pub fn feed_chunks(
    stream_id: StreamId,
    chunks: impl IntoIterator<Item = Bytes>,
) -> Result<Vec<Frame>, ParseError> {
    feed_chunks_with_config(stream_id, ParserConfig::default(), chunks)
}

/// Feed `chunks` to a fresh parser built from `config`, the last one as end
/// of stream.
///
/// An empty iterator is treated as a single empty final chunk.
///
/// # Errors
///
/// Returns the first [`ParseError`] reported by the parser.
pub fn feed_chunks_with_config(
    stream_id: StreamId,
    config: ParserConfig,
    chunks: impl IntoIterator<Item = Bytes>,
) -> Result<Vec<Frame>, ParseError> {
    drive_parser(MessageParser::with_config(stream_id, config), chunks, true)
}

/// Feed `chunks` to a fresh default parser on a stream that stays open.
///
/// # Errors
///
/// Returns the first [`ParseError`] reported by the parser.
pub fn feed_open_chunks(
    stream_id: StreamId,
    chunks: impl IntoIterator<Item = Bytes>,
) -> Result<Vec<Frame>, ParseError> {
    drive_parser(MessageParser::new(stream_id), chunks, false)
}

fn drive_parser(
    mut parser: MessageParser,
    chunks: impl IntoIterator<Item = Bytes>,
    end_of_stream: bool,
) -> Result<Vec<Frame>, ParseError> {
    let mut frames = Vec::new();
    let mut chunks = chunks.into_iter().peekable();
    loop {
        let mut chunk = chunks.next().unwrap_or_default();
        let final_chunk = chunks.peek().is_none();
        loop {
            let frame = if final_chunk && end_of_stream {
                parser.parse_last(&mut chunk)?
            } else {
                parser.parse(&mut chunk)?
            };
            match frame {
                Some(frame) => frames.push(frame),
                None => break,
            }
        }
        if final_chunk {
            return Ok(frames);
        }
    }
}
