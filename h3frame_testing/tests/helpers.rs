//! Tests for the chunking helpers themselves.

use bytes::Bytes;
use h3frame::{frame::{DataFrame, Frame}, stream::StreamId};
use h3frame_testing::{byte_chunks, feed_chunks, feed_open_chunks, raw_frame, split_at_sizes};
use rstest::rstest;

#[rstest]
#[case::exact(vec![2, 3], vec![&b"ab"[..], &b"cde"[..]])]
#[case::remainder(vec![1], vec![&b"a"[..], &b"bcde"[..]])]
#[case::overshoot(vec![4, 9, 9], vec![&b"abcd"[..], &b"e"[..]])]
#[case::leading_empty(vec![0, 5], vec![&b""[..], &b"abcde"[..]])]
fn splits_at_requested_sizes(#[case] sizes: Vec<usize>, #[case] expected: Vec<&[u8]>) {
    let chunks = split_at_sizes(&Bytes::from_static(b"abcde"), &sizes);
    let chunks: Vec<&[u8]> = chunks.iter().map(Bytes::as_ref).collect();
    assert_eq!(chunks, expected);
}

#[test]
fn byte_chunks_cover_input() {
    let chunks = byte_chunks(&Bytes::from_static(b"xyz"));
    assert_eq!(chunks.len(), 3);
    assert!(chunks.iter().all(|chunk| chunk.len() == 1));
}

#[test]
fn end_of_stream_controls_last_flag() {
    let wire = raw_frame(0x00, b"body");
    let closed = feed_chunks(StreamId::new(0), [wire.clone()]).expect("parse");
    let open = feed_open_chunks(StreamId::new(0), [wire]).expect("parse");
    assert_eq!(
        closed,
        vec![Frame::from(DataFrame::new(Bytes::from_static(b"body"), true))]
    );
    assert_eq!(
        open,
        vec![Frame::from(DataFrame::new(Bytes::from_static(b"body"), false))]
    );
}

#[test]
fn empty_input_parses_to_nothing() {
    assert_eq!(feed_chunks(StreamId::new(0), Vec::new()), Ok(Vec::new()));
}
