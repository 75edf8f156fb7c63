//! Generator and parser configuration.
//!
//! Both configurations are small `Copy` structs with chained setters. Sizes
//! are clamped on the way in so a generator can always fit a complete frame
//! header in one buffer.

use crate::varint;

/// Smallest accepted buffer capacity: room for the longest frame header
/// (two 8-byte varints).
pub const MIN_BUFFER_CAPACITY: usize = 2 * varint::MAX_LEN;

/// Largest accepted buffer capacity (16 MiB).
pub const MAX_BUFFER_CAPACITY: usize = 16 * 1024 * 1024;

/// Default buffer capacity used by the generator.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8192;

/// Default cap on a frame payload accepted by the parser (16 MiB).
pub const DEFAULT_MAX_FRAME_PAYLOAD: usize = 16 * 1024 * 1024;

pub(crate) fn clamp_buffer_capacity(value: usize) -> usize {
    value.clamp(MIN_BUFFER_CAPACITY, MAX_BUFFER_CAPACITY)
}

/// How the parser treats frames whose type it does not recognise.
///
/// Frames of HTTP/2-only types are rejected under either policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownFramePolicy {
    /// Fail with [`ParseError::UnknownFrameType`](crate::error::ParseError).
    #[default]
    Strict,
    /// Discard the frame using its declared length and keep parsing.
    Lenient,
}

impl UnknownFramePolicy {
    /// Policy name for logs and command-line parsing.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

/// Settings for [`MessageGenerator`](crate::generator::MessageGenerator).
///
/// # Examples
///
/// ```
/// use h3frame::config::{GeneratorConfig, MIN_BUFFER_CAPACITY};
///
/// let config = GeneratorConfig::default()
///     .max_buffer_capacity(1)
///     .zero_copy(false);
/// assert_eq!(config.buffer_capacity(), MIN_BUFFER_CAPACITY);
/// assert!(!config.uses_zero_copy());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    max_buffer_capacity: usize,
    zero_copy: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            zero_copy: true,
        }
    }
}

impl GeneratorConfig {
    /// Set the capacity of each pooled buffer, clamped to
    /// [`MIN_BUFFER_CAPACITY`]..=[`MAX_BUFFER_CAPACITY`].
    #[must_use]
    pub fn max_buffer_capacity(mut self, capacity: usize) -> Self {
        self.max_buffer_capacity = clamp_buffer_capacity(capacity);
        self
    }

    /// Reference large `DATA` payloads instead of copying them.
    #[must_use]
    pub fn zero_copy(mut self, enabled: bool) -> Self {
        self.zero_copy = enabled;
        self
    }

    /// Configured buffer capacity.
    #[must_use]
    pub const fn buffer_capacity(&self) -> usize { self.max_buffer_capacity }

    /// Whether zero-copy payloads are enabled.
    #[must_use]
    pub const fn uses_zero_copy(&self) -> bool { self.zero_copy }
}

/// Settings for [`MessageParser`](crate::parser::MessageParser).
///
/// # Examples
///
/// ```
/// use h3frame::config::{ParserConfig, UnknownFramePolicy};
///
/// let config = ParserConfig::default()
///     .max_frame_payload(4096)
///     .unknown_frame_policy(UnknownFramePolicy::Lenient);
/// assert_eq!(config.frame_payload_limit(), 4096);
/// assert_eq!(config.policy(), UnknownFramePolicy::Lenient);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    max_frame_payload: usize,
    unknown_frame_policy: UnknownFramePolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_frame_payload: DEFAULT_MAX_FRAME_PAYLOAD,
            unknown_frame_policy: UnknownFramePolicy::default(),
        }
    }
}

impl ParserConfig {
    /// Reject frames declaring a payload longer than `limit` bytes.
    #[must_use]
    pub fn max_frame_payload(mut self, limit: usize) -> Self {
        self.max_frame_payload = limit;
        self
    }

    /// Choose how unrecognised frame types are handled.
    #[must_use]
    pub fn unknown_frame_policy(mut self, policy: UnknownFramePolicy) -> Self {
        self.unknown_frame_policy = policy;
        self
    }

    /// Configured payload limit.
    #[must_use]
    pub const fn frame_payload_limit(&self) -> usize { self.max_frame_payload }

    /// Configured unknown-type policy.
    #[must_use]
    pub const fn policy(&self) -> UnknownFramePolicy { self.unknown_frame_policy }
}
