//! Utilities for exercising `h3frame` generators and parsers in tests.
//!
//! Helpers split encoded streams into arbitrary chunks, feed them to a
//! [`MessageParser`](h3frame::parser::MessageParser), and drive a
//! [`FrameCodec`](h3frame::codec::FrameCodec) over an in-memory
//! `tokio::io::duplex` stream.
//!
//! ```rust
//! use bytes::Bytes;
//! use h3frame::{
//!     frame::{DataFrame, Frame},
//!     generator::MessageGenerator,
//!     stream::StreamId,
//! };
//! use h3frame_testing::{byte_chunks, encode_frames, feed_chunks};
//!
//! let stream = StreamId::new(0);
//! let frames = vec![Frame::from(DataFrame::new(Bytes::from_static(b"hi"), true))];
//! let wire = encode_frames(&MessageGenerator::default(), stream, &frames).unwrap();
//! let parsed = feed_chunks(stream, byte_chunks(&wire)).unwrap();
//! assert_eq!(parsed, frames);
//! ```

pub mod chunks;
pub mod drive;
pub mod logging;
pub mod metrics;
pub mod props;

pub use chunks::{
    byte_chunks,
    encode_frames,
    feed_chunks,
    feed_chunks_with_config,
    feed_open_chunks,
    raw_frame,
    split_at_sizes,
};
pub use drive::{DEFAULT_CAPACITY, round_trip_over_duplex};
pub use logging::{LoggerHandle, logger};
pub use metrics::{counter_value, debugging_recorder_setup};
pub use props::{deterministic_runner, random_payload};
