//! Variable-length integer codec.
//!
//! Integers are encoded with a self-describing length prefix: the two most
//! significant bits of the first byte select a 1, 2, 4 or 8 byte encoding,
//! leaving 6, 14, 30 or 62 bits for the value. The encoder always picks the
//! shortest class and the decoder rejects anything longer, so every value has
//! exactly one valid encoding.
//!
//! Decoding never fails for lack of input. [`decode`] reports
//! [`Decoded::Incomplete`] and [`VarIntDecoder`] keeps the partial bytes so a
//! varint split across several chunks is read exactly once.

use bytes::{Buf, BufMut};
use thiserror::Error;

/// Largest value representable by a varint (2^62 - 1).
pub const MAX_VALUE: u64 = (1 << 62) - 1;

/// Longest encoding in bytes.
pub const MAX_LEN: usize = 8;

const LEN_1_MAX: u64 = (1 << 6) - 1;
const LEN_2_MIN: u64 = LEN_1_MAX + 1;
const LEN_2_MAX: u64 = (1 << 14) - 1;
const LEN_4_MIN: u64 = LEN_2_MAX + 1;
const LEN_4_MAX: u64 = (1 << 30) - 1;
const LEN_8_MIN: u64 = LEN_4_MAX + 1;

/// Errors raised while encoding or decoding varints.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum VarIntError {
    /// The value does not fit in 62 bits.
    #[error("value {value} exceeds the varint range")]
    ValueTooLarge {
        /// Rejected value.
        value: u64,
    },
    /// The value was encoded with more bytes than necessary.
    #[error("non-minimal varint: {value} encoded in {len} bytes")]
    NonMinimal {
        /// Decoded value.
        value: u64,
        /// Length of the offending encoding.
        len: usize,
    },
}

/// Outcome of [`decode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decoded {
    /// A whole varint was available.
    Complete {
        /// Decoded value.
        value: u64,
        /// Bytes consumed from the input.
        consumed: usize,
    },
    /// The input ends before the varint does.
    Incomplete {
        /// Total encoded length announced by the first byte, or `1` when the
        /// input was empty.
        needed: usize,
    },
}

/// Number of bytes needed to encode `value`, or `None` above [`MAX_VALUE`].
///
/// # Examples
///
/// ```
/// use h3frame::varint::encoded_len;
///
/// assert_eq!(encoded_len(63), Some(1));
/// assert_eq!(encoded_len(64), Some(2));
/// assert_eq!(encoded_len(u64::MAX), None);
/// ```
#[must_use]
pub const fn encoded_len(value: u64) -> Option<usize> {
    match value {
        0..=LEN_1_MAX => Some(1),
        LEN_2_MIN..=LEN_2_MAX => Some(2),
        LEN_4_MIN..=LEN_4_MAX => Some(4),
        LEN_8_MIN..=MAX_VALUE => Some(8),
        _ => None,
    }
}

/// Encoded length announced by the first byte of a varint.
#[must_use]
pub const fn len_from_prefix(first: u8) -> usize { 1 << (first >> 6) }

/// Append the shortest encoding of `value` to `dst`.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns [`VarIntError::ValueTooLarge`] if `value` exceeds [`MAX_VALUE`].
///
/// # Examples
///
/// ```
/// use bytes::BytesMut;
/// use h3frame::varint::encode;
///
/// let mut buf = BytesMut::new();
/// assert_eq!(encode(16_384, &mut buf), Ok(4));
/// assert_eq!(&buf[..], &[0x80, 0x00, 0x40, 0x00]);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    reason = "the length class guarantees the value fits the narrower type"
)]
pub fn encode<B: BufMut>(value: u64, dst: &mut B) -> Result<usize, VarIntError> {
    let len = encoded_len(value).ok_or(VarIntError::ValueTooLarge { value })?;
    match len {
        1 => dst.put_u8(value as u8),
        2 => dst.put_u16(0x4000 | value as u16),
        4 => dst.put_u32(0x8000_0000 | value as u32),
        _ => dst.put_u64(0xc000_0000_0000_0000 | value),
    }
    Ok(len)
}

/// Decode a varint from the start of `src`.
///
/// # Errors
///
/// Returns [`VarIntError::NonMinimal`] when the value could have used a
/// shorter encoding. A short input is not an error; it yields
/// [`Decoded::Incomplete`].
///
/// # Examples
///
/// ```
/// use h3frame::varint::{Decoded, decode};
///
/// assert_eq!(
///     decode(&[0x40, 0x40, 0xff]),
///     Ok(Decoded::Complete { value: 64, consumed: 2 })
/// );
/// assert_eq!(decode(&[0x80, 0x00]), Ok(Decoded::Incomplete { needed: 4 }));
/// ```
pub fn decode(src: &[u8]) -> Result<Decoded, VarIntError> {
    let Some(&first) = src.first() else {
        return Ok(Decoded::Incomplete { needed: 1 });
    };
    let len = len_from_prefix(first);
    let Some(encoded) = src.get(..len) else {
        return Ok(Decoded::Incomplete { needed: len });
    };
    let value = read_value(encoded)?;
    Ok(Decoded::Complete {
        value,
        consumed: len,
    })
}

fn read_value(encoded: &[u8]) -> Result<u64, VarIntError> {
    let (first, rest) = encoded
        .split_first()
        .map_or((0, &[][..]), |(first, rest)| (*first, rest));
    let value = rest
        .iter()
        .fold(u64::from(first & 0x3f), |acc, byte| (acc << 8) | u64::from(*byte));
    if encoded_len(value) != Some(encoded.len()) {
        return Err(VarIntError::NonMinimal {
            value,
            len: encoded.len(),
        });
    }
    Ok(value)
}

/// Resumable varint reader.
///
/// Bytes are taken from successive buffers until the announced length has
/// been collected. The decoder resets itself after yielding a value.
#[derive(Clone, Debug, Default)]
pub struct VarIntDecoder {
    bytes: [u8; MAX_LEN],
    filled: usize,
}

impl VarIntDecoder {
    /// Create an empty decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0; MAX_LEN],
            filled: 0,
        }
    }

    /// Whether some bytes of a varint have been read but not all.
    #[must_use]
    pub const fn is_partial(&self) -> bool { self.filled > 0 }

    /// Consume bytes from `src` until a varint completes or `src` runs dry.
    ///
    /// Returns `Ok(None)` when more input is required. Only the bytes of the
    /// current varint are consumed.
    ///
    /// # Errors
    ///
    /// Returns [`VarIntError::NonMinimal`] for an over-long encoding.
    pub fn push<B: Buf>(&mut self, src: &mut B) -> Result<Option<u64>, VarIntError> {
        if self.filled == 0 {
            if !src.has_remaining() {
                return Ok(None);
            }
            self.bytes[0] = src.get_u8();
            self.filled = 1;
        }

        let len = len_from_prefix(self.bytes[0]);
        let take = (len - self.filled).min(src.remaining());
        src.copy_to_slice(&mut self.bytes[self.filled..self.filled + take]);
        self.filled += take;

        if self.filled < len {
            return Ok(None);
        }
        self.filled = 0;
        read_value(&self.bytes[..len]).map(Some)
    }

    /// Discard any partially read varint.
    pub fn reset(&mut self) { self.filled = 0; }
}

#[cfg(test)]
mod tests;
