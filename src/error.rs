//! Error taxonomy for frame parsing and generation.
//!
//! Running out of input is never an error: the parser returns `Ok(None)`
//! and waits for more bytes. Everything here is a real failure that the
//! caller must act on.
//!
//! - [`MalformedError`]: the bytes violate the framing rules. Fatal to the
//!   parser and to the stream that carried them.
//! - [`ParseError`]: everything the parser can report, including unknown
//!   frame types under the strict policy and frames sent on the wrong kind of
//!   stream.
//! - [`GenerateError`]: failures while serialising, chiefly buffer pool
//!   exhaustion.

use std::io;

use thiserror::Error;

use crate::{frame::FrameType, pool::PoolError, stream::StreamId, varint::VarIntError};

/// Violations of the framing rules discoverable from the bytes alone.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MalformedError {
    /// A varint was over-long or out of range.
    #[error("invalid varint: {0}")]
    VarInt(#[from] VarIntError),

    /// Declared payload length exceeds the configured maximum.
    #[error("frame payload exceeds max length: {declared} > {max}")]
    FrameTooLarge {
        /// Wire tag of the offending frame.
        frame_type: u64,
        /// Declared payload length.
        declared: u64,
        /// Configured maximum.
        max: usize,
    },

    /// A frame type that only exists in HTTP/2.
    #[error("reserved frame type {frame_type:#x}")]
    ReservedFrameType {
        /// Wire tag of the offending frame.
        frame_type: u64,
    },

    /// A structured payload does not match its frame layout.
    #[error("invalid {frame_type} payload: {reason}")]
    InvalidPayload {
        /// Frame whose payload was rejected.
        frame_type: FrameType,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// The stream ended before a frame header was complete.
    #[error("stream ended inside a frame header")]
    TruncatedHeader,

    /// The stream ended before a frame payload was complete.
    #[error("stream ended inside a frame payload: {received} of {expected} bytes")]
    TruncatedPayload {
        /// Payload bytes received.
        received: usize,
        /// Declared payload length.
        expected: usize,
    },
}

/// Errors reported by [`MessageParser`](crate::parser::MessageParser).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The input violates the framing rules.
    #[error("malformed frame: {0}")]
    Malformed(#[from] MalformedError),

    /// A well-formed frame of an unrecognised type, rejected by the strict
    /// policy.
    #[error("unknown frame type {frame_type:#x}")]
    UnknownFrameType {
        /// Wire tag of the frame.
        frame_type: u64,
    },

    /// A known frame arrived on a stream that may not carry it.
    #[error("{frame_type} frame not permitted on stream {stream_id}")]
    UnexpectedFrame {
        /// Type of the frame.
        frame_type: FrameType,
        /// Stream it arrived on.
        stream_id: StreamId,
    },

    /// The parser already failed and its state cannot be trusted.
    #[error("parser used after a fatal error")]
    Poisoned,
}

impl ParseError {
    /// Error category as a static string for logging and metrics.
    ///
    /// One of `"malformed"`, `"unknown_type"`, `"unexpected_frame"` or
    /// `"poisoned"`.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::UnknownFrameType { .. } => "unknown_type",
            Self::UnexpectedFrame { .. } => "unexpected_frame",
            Self::Poisoned => "poisoned",
        }
    }

    /// Whether the stream ended part way through a frame.
    #[must_use]
    pub const fn is_truncation(&self) -> bool {
        matches!(
            self,
            Self::Malformed(
                MalformedError::TruncatedHeader | MalformedError::TruncatedPayload { .. }
            )
        )
    }
}

/// Errors reported by [`MessageGenerator`](crate::generator::MessageGenerator).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    /// The buffer pool could not supply a buffer.
    #[error("buffer pool error: {0}")]
    Pool(#[from] PoolError),

    /// The frame may not be sent on the target stream.
    #[error("{frame_type} frame not permitted on stream {stream_id}")]
    UnexpectedFrame {
        /// Type of the frame.
        frame_type: FrameType,
        /// Target stream.
        stream_id: StreamId,
    },
}

impl GenerateError {
    /// Error category as a static string for logging and metrics.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Pool(_) => "pool",
            Self::UnexpectedFrame { .. } => "unexpected_frame",
        }
    }
}

impl From<ParseError> for io::Error {
    fn from(err: ParseError) -> Self {
        let kind = if err.is_truncation() {
            io::ErrorKind::UnexpectedEof
        } else {
            io::ErrorKind::InvalidData
        };
        io::Error::new(kind, err)
    }
}

impl From<GenerateError> for io::Error {
    fn from(err: GenerateError) -> Self {
        let kind = match err {
            GenerateError::Pool(_) => io::ErrorKind::OutOfMemory,
            GenerateError::UnexpectedFrame { .. } => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use rstest::rstest;

    use super::{GenerateError, MalformedError, ParseError};
    use crate::{frame::FrameType, pool::PoolError, stream::StreamId, varint::VarIntError};

    #[rstest]
    #[case::malformed(
        ParseError::Malformed(MalformedError::ReservedFrameType { frame_type: 2 }),
        io::ErrorKind::InvalidData,
        "malformed"
    )]
    #[case::truncated(
        ParseError::Malformed(MalformedError::TruncatedPayload { received: 1, expected: 4 }),
        io::ErrorKind::UnexpectedEof,
        "malformed"
    )]
    #[case::unknown(
        ParseError::UnknownFrameType { frame_type: 0x21 },
        io::ErrorKind::InvalidData,
        "unknown_type"
    )]
    #[case::unexpected(
        ParseError::UnexpectedFrame {
            frame_type: FrameType::Settings,
            stream_id: StreamId::new(0),
        },
        io::ErrorKind::InvalidData,
        "unexpected_frame"
    )]
    #[case::poisoned(ParseError::Poisoned, io::ErrorKind::InvalidData, "poisoned")]
    fn parse_errors_map_to_io_kinds(
        #[case] err: ParseError,
        #[case] kind: io::ErrorKind,
        #[case] label: &str,
    ) {
        assert_eq!(err.error_type(), label);
        assert_eq!(io::Error::from(err).kind(), kind);
    }

    #[test]
    fn generate_errors_map_to_io_kinds() {
        let err = GenerateError::from(PoolError::Exhausted { limit: 2 });
        assert_eq!(err.error_type(), "pool");
        assert_eq!(io::Error::from(err).kind(), io::ErrorKind::OutOfMemory);
    }

    #[test]
    fn display_messages_are_descriptive() {
        let err = ParseError::from(MalformedError::from(VarIntError::NonMinimal {
            value: 1,
            len: 2,
        }));
        assert_eq!(
            err.to_string(),
            "malformed frame: invalid varint: non-minimal varint: 1 encoded in 2 bytes"
        );
        let err = ParseError::UnexpectedFrame {
            frame_type: FrameType::GoAway,
            stream_id: StreamId::new(4),
        };
        assert_eq!(err.to_string(), "GOAWAY frame not permitted on stream 4");
    }
}
