#![doc(html_root_url = "https://docs.rs/h3frame/latest")]
//! Public API for the `h3frame` library.
//!
//! This crate implements the frame layer of HTTP/3: a QUIC variable-length
//! integer codec, a typed frame model, stream-role classification, and a
//! generator/parser pair that move frames in and out of byte buffers without
//! touching the network. Transports hand the parser chunks in any size and
//! send the buffers the generator leaves in a [`pool::Lease`].

pub mod codec;
pub mod config;
pub mod error;
pub mod frame;
pub mod generator;
pub mod metrics;
pub mod parser;
pub mod pool;
pub mod stream;
pub mod varint;

pub use codec::FrameCodec;
pub use config::{GeneratorConfig, ParserConfig, UnknownFramePolicy};
pub use error::{GenerateError, MalformedError, ParseError};
pub use frame::{Frame, FrameType};
pub use generator::MessageGenerator;
pub use metrics::{Direction, ERRORS_TOTAL, FRAMES_TOTAL, POOL_OUTSTANDING};
pub use parser::MessageParser;
pub use pool::{BoundedBufferPool, BufferPool, Lease, LeaseEntry, NullBufferPool, PoolError};
pub use stream::{StreamId, StreamRole, role_of};
pub use varint::VarIntError;
