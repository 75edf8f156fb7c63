//! Unit tests for the varint codec.

use bytes::BytesMut;
use proptest::prelude::*;
use rstest::rstest;

use super::{Decoded, MAX_VALUE, VarIntDecoder, VarIntError, decode, encode, encoded_len};

fn encode_to_vec(value: u64) -> Vec<u8> {
    let mut buf = BytesMut::new();
    encode(value, &mut buf).expect("value within range");
    buf.to_vec()
}

#[rstest]
#[case::zero(0, 1)]
#[case::one_byte_max(63, 1)]
#[case::two_byte_min(64, 2)]
#[case::two_byte_max(16_383, 2)]
#[case::four_byte_min(16_384, 4)]
#[case::four_byte_max(1_073_741_823, 4)]
#[case::eight_byte_min(1_073_741_824, 8)]
#[case::eight_byte_max(MAX_VALUE, 8)]
fn boundary_values_round_trip(#[case] value: u64, #[case] len: usize) {
    let bytes = encode_to_vec(value);
    assert_eq!(bytes.len(), len);
    assert_eq!(encoded_len(value), Some(len));
    assert_eq!(
        decode(&bytes),
        Ok(Decoded::Complete {
            value,
            consumed: len
        })
    );
}

#[test]
fn encodes_reference_vectors() {
    assert_eq!(encode_to_vec(37), vec![0x25]);
    assert_eq!(encode_to_vec(15_293), vec![0x7b, 0xbd]);
    assert_eq!(encode_to_vec(494_878_333), vec![0x9d, 0x7f, 0x3e, 0x7d]);
    assert_eq!(
        encode_to_vec(151_288_809_941_952_652),
        vec![0xc2, 0x19, 0x7c, 0x5e, 0xff, 0x14, 0xe8, 0x8c]
    );
}

#[test]
fn rejects_values_beyond_range() {
    let mut buf = BytesMut::new();
    assert_eq!(
        encode(MAX_VALUE + 1, &mut buf),
        Err(VarIntError::ValueTooLarge {
            value: MAX_VALUE + 1
        })
    );
    assert!(buf.is_empty());
}

#[rstest]
#[case::two_bytes(&[0x40, 0x25][..], 37, 2)]
#[case::four_bytes(&[0x80, 0x00, 0x00, 0x25][..], 37, 4)]
#[case::eight_bytes(&[0xc0, 0, 0, 0, 0, 0, 0x40, 0x00][..], 16_384, 8)]
fn rejects_over_long_encodings(#[case] bytes: &[u8], #[case] value: u64, #[case] len: usize) {
    assert_eq!(decode(bytes), Err(VarIntError::NonMinimal { value, len }));
}

#[rstest]
#[case::empty(&[][..], 1)]
#[case::two_byte_prefix_only(&[0x40][..], 2)]
#[case::four_byte_partial(&[0x80, 0x00, 0x01][..], 4)]
#[case::eight_byte_partial(&[0xc0, 0, 0, 0][..], 8)]
fn short_input_is_incomplete(#[case] bytes: &[u8], #[case] needed: usize) {
    assert_eq!(decode(bytes), Ok(Decoded::Incomplete { needed }));
}

#[test]
fn decoder_resumes_across_single_bytes() {
    let bytes = encode_to_vec(494_878_333);
    let mut decoder = VarIntDecoder::new();

    for (i, byte) in bytes.iter().enumerate() {
        let mut chunk = &[*byte][..];
        let result = decoder.push(&mut chunk).expect("valid encoding");
        assert!(chunk.is_empty());
        if i + 1 < bytes.len() {
            assert_eq!(result, None);
            assert!(decoder.is_partial());
        } else {
            assert_eq!(result, Some(494_878_333));
            assert!(!decoder.is_partial());
        }
    }
}

#[test]
fn decoder_leaves_trailing_bytes_untouched() {
    let mut decoder = VarIntDecoder::new();
    let mut chunk = &[0x40, 0x40, 0xaa, 0xbb][..];
    assert_eq!(decoder.push(&mut chunk), Ok(Some(64)));
    assert_eq!(chunk, &[0xaa, 0xbb]);
}

#[test]
fn decoder_ignores_empty_input() {
    let mut decoder = VarIntDecoder::new();
    let mut chunk: &[u8] = &[];
    assert_eq!(decoder.push(&mut chunk), Ok(None));
    assert!(!decoder.is_partial());
}

#[test]
fn decoder_rejects_over_long_encoding_after_resume() {
    let mut decoder = VarIntDecoder::new();
    let mut first = &[0x40][..];
    assert_eq!(decoder.push(&mut first), Ok(None));
    let mut second = &[0x01][..];
    assert_eq!(
        decoder.push(&mut second),
        Err(VarIntError::NonMinimal { value: 1, len: 2 })
    );
}

proptest! {
    #[test]
    fn any_value_round_trips(value in 0..=MAX_VALUE) {
        let bytes = encode_to_vec(value);
        prop_assert_eq!(
            decode(&bytes),
            Ok(Decoded::Complete { value, consumed: bytes.len() })
        );
    }

    #[test]
    fn split_point_does_not_change_result(value in 0..=MAX_VALUE, split in 0usize..8) {
        let bytes = encode_to_vec(value);
        let split = split.min(bytes.len());
        let mut decoder = VarIntDecoder::new();
        let mut head = &bytes[..split];
        let first = decoder.push(&mut head).expect("valid prefix");
        let result = match first {
            Some(value) => Some(value),
            None => {
                let mut tail = &bytes[split..];
                decoder.push(&mut tail).expect("valid suffix")
            }
        };
        prop_assert_eq!(result, Some(value));
    }
}
