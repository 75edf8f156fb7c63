//! Unit tests for the frame model.

use bytes::{Bytes, BytesMut};
use rstest::rstest;

use super::{
    CancelPushFrame,
    DataFrame,
    Frame,
    FrameType,
    GoAwayFrame,
    HeadersFrame,
    MaxPushIdFrame,
    PushPromiseFrame,
    Setting,
    SettingsFrame,
    is_grease,
    is_reserved_http2,
};
use crate::{
    error::MalformedError,
    stream::StreamId,
    varint::{MAX_VALUE, VarIntError},
};

fn encode(frame: &Frame) -> Vec<u8> {
    let mut buf = BytesMut::new();
    frame.encode_header(&mut buf);
    frame.encode_payload(&mut buf);
    buf.to_vec()
}

fn settings(pairs: &[(u64, u64)]) -> Vec<Setting> {
    pairs
        .iter()
        .map(|&(id, value)| Setting { id, value })
        .collect()
}

#[test]
fn tags_round_trip_through_lookup() {
    for frame_type in FrameType::ALL {
        assert_eq!(FrameType::from_tag(frame_type.tag()), Some(frame_type));
    }
}

#[rstest]
#[case(0x02)]
#[case(0x06)]
#[case(0x08)]
#[case(0x09)]
fn reserved_http2_tags_are_not_known_types(#[case] tag: u64) {
    assert!(is_reserved_http2(tag));
    assert_eq!(FrameType::from_tag(tag), None);
}

#[rstest]
#[case(0x21, true)]
#[case(0x40, true)]
#[case(0x21 + 0x1f * 1000, true)]
#[case(0x20, false)]
#[case(0x22, false)]
#[case(0x00, false)]
fn grease_tags_follow_the_reserved_pattern(#[case] tag: u64, #[case] expected: bool) {
    assert_eq!(is_grease(tag), expected);
}

#[rstest]
#[case::data_on_request(FrameType::Data, 0, true)]
#[case::headers_on_request(FrameType::Headers, 4, true)]
#[case::push_promise_on_request(FrameType::PushPromise, 0, true)]
#[case::push_promise_on_control(FrameType::PushPromise, 2, false)]
#[case::settings_on_control(FrameType::Settings, 2, true)]
#[case::settings_on_server_uni(FrameType::Settings, 3, true)]
#[case::settings_on_request(FrameType::Settings, 0, false)]
#[case::goaway_on_request(FrameType::GoAway, 1, false)]
#[case::max_push_id_on_control(FrameType::MaxPushId, 2, true)]
#[case::cancel_push_on_request(FrameType::CancelPush, 0, false)]
fn placement_follows_stream_directionality(
    #[case] frame_type: FrameType,
    #[case] stream_id: u64,
    #[case] expected: bool,
) {
    assert_eq!(
        frame_type.permitted_on(StreamId::new(stream_id).role()),
        expected
    );
}

#[test]
fn display_uses_protocol_names() {
    assert_eq!(FrameType::PushPromise.to_string(), "PUSH_PROMISE");
    assert_eq!(FrameType::MaxPushId.to_string(), "MAX_PUSH_ID");
}

#[rstest]
#[case::empty_data(Frame::from(DataFrame::new(Bytes::new(), false)), vec![0x00, 0x00])]
#[case::data(
    Frame::from(DataFrame::new(Bytes::from_static(b"abc"), true)),
    vec![0x00, 0x03, b'a', b'b', b'c']
)]
#[case::headers(
    Frame::from(HeadersFrame::new(Bytes::from_static(&[0xd1, 0xd7]))),
    vec![0x01, 0x02, 0xd1, 0xd7]
)]
#[case::cancel_push(
    Frame::from(CancelPushFrame::new(3).expect("valid id")),
    vec![0x03, 0x01, 0x03]
)]
#[case::goaway(
    Frame::from(GoAwayFrame::new(16_384).expect("valid id")),
    vec![0x07, 0x04, 0x80, 0x00, 0x40, 0x00]
)]
#[case::max_push_id(
    Frame::from(MaxPushIdFrame::new(64).expect("valid id")),
    vec![0x0d, 0x02, 0x40, 0x40]
)]
#[case::push_promise(
    Frame::from(PushPromiseFrame::new(1, Bytes::from_static(b"hf")).expect("valid id")),
    vec![0x05, 0x03, 0x01, b'h', b'f']
)]
#[case::settings(
    Frame::from(SettingsFrame::new(settings(&[(0x06, 100)])).expect("valid settings")),
    vec![0x04, 0x03, 0x06, 0x40, 0x64]
)]
fn frames_encode_to_expected_bytes(#[case] frame: Frame, #[case] expected: Vec<u8>) {
    let bytes = encode(&frame);
    assert_eq!(bytes, expected);
    assert_eq!(frame.wire_len(), expected.len());
    assert_eq!(frame.header_len() + frame.payload_len(), expected.len());
}

#[test]
fn long_payload_uses_two_byte_length() {
    let frame = Frame::from(DataFrame::new(vec![0u8; 100], false));
    assert_eq!(frame.header_len(), 3);
    assert_eq!(&encode(&frame)[..3], &[0x00, 0x40, 0x64]);
}

#[test]
fn decoding_reproduces_structured_frames() {
    let frames = [
        Frame::from(CancelPushFrame::new(9).expect("valid id")),
        Frame::from(GoAwayFrame::new(MAX_VALUE).expect("valid id")),
        Frame::from(MaxPushIdFrame::new(0).expect("valid id")),
        Frame::from(PushPromiseFrame::new(300, Bytes::from_static(b"fields")).expect("valid id")),
        Frame::from(
            SettingsFrame::new(settings(&[(0x01, 4096), (0x07, 16), (0x21, 0)]))
                .expect("valid settings"),
        ),
    ];
    for frame in frames {
        let bytes = Bytes::from(encode(&frame));
        let payload = bytes.slice(frame.header_len()..);
        assert_eq!(
            Frame::decode_payload(frame.frame_type(), payload, false),
            Ok(frame)
        );
    }
}

#[test]
fn data_decoding_records_last_flag() {
    let frame = Frame::decode_payload(FrameType::Data, Bytes::from_static(b"x"), true)
        .expect("data payload is opaque");
    assert_eq!(frame, Frame::from(DataFrame::new(Bytes::from_static(b"x"), true)));
}

#[rstest]
#[case::empty(FrameType::GoAway, vec![], "truncated varint")]
#[case::partial_varint(FrameType::CancelPush, vec![0x40], "truncated varint")]
#[case::trailing(FrameType::MaxPushId, vec![0x01, 0x00], "trailing bytes")]
#[case::push_promise_without_id(FrameType::PushPromise, vec![], "truncated varint")]
#[case::settings_missing_value(FrameType::Settings, vec![0x06], "truncated varint")]
fn malformed_payloads_are_rejected(
    #[case] frame_type: FrameType,
    #[case] payload: Vec<u8>,
    #[case] reason: &'static str,
) {
    assert_eq!(
        Frame::decode_payload(frame_type, Bytes::from(payload), false),
        Err(MalformedError::InvalidPayload { frame_type, reason })
    );
}

#[rstest]
#[case::reserved_zero(&[(0x00, 1)], "reserved setting identifier")]
#[case::reserved_http2(&[(0x04, 1)], "reserved setting identifier")]
#[case::duplicate(&[(0x06, 1), (0x06, 2)], "duplicate setting identifier")]
fn invalid_settings_are_rejected_both_ways(
    #[case] pairs: &[(u64, u64)],
    #[case] reason: &'static str,
) {
    let expected = MalformedError::InvalidPayload {
        frame_type: FrameType::Settings,
        reason,
    };
    assert_eq!(SettingsFrame::new(settings(pairs)), Err(expected.clone()));

    let mut payload = BytesMut::new();
    for &(id, value) in pairs {
        crate::varint::encode(id, &mut payload).expect("id in range");
        crate::varint::encode(value, &mut payload).expect("value in range");
    }
    assert_eq!(
        Frame::decode_payload(FrameType::Settings, payload.freeze(), false),
        Err(expected)
    );
}

#[test]
fn settings_reject_out_of_range_values() {
    assert_eq!(
        SettingsFrame::new(settings(&[(0x06, MAX_VALUE + 1)])),
        Err(VarIntError::ValueTooLarge {
            value: MAX_VALUE + 1
        }
        .into())
    );
}

#[test]
fn settings_lookup_finds_values() {
    let frame = SettingsFrame::new(settings(&[(0x01, 0), (0x07, 100)])).expect("valid");
    assert_eq!(frame.get(SettingsFrame::QPACK_BLOCKED_STREAMS), Some(100));
    assert_eq!(frame.get(SettingsFrame::MAX_FIELD_SECTION_SIZE), None);
    assert_eq!(frame.settings().len(), 2);
}

#[test]
fn empty_settings_frame_is_valid() {
    let frame = Frame::from(SettingsFrame::default());
    assert_eq!(encode(&frame), vec![0x04, 0x00]);
}

#[test]
fn identifier_constructors_enforce_range() {
    assert!(GoAwayFrame::new(MAX_VALUE).is_ok());
    assert_eq!(
        CancelPushFrame::new(u64::MAX),
        Err(VarIntError::ValueTooLarge { value: u64::MAX })
    );
    assert!(PushPromiseFrame::new(MAX_VALUE + 1, Bytes::new()).is_err());
}

#[test]
fn large_settings_frame_decodes_in_linear_time() {
    let count: u64 = 200_000;
    let mut payload = BytesMut::new();
    for id in 0x21..0x21 + count {
        crate::varint::encode(id, &mut payload).expect("id in range");
        crate::varint::encode(1, &mut payload).expect("value in range");
    }
    let started = std::time::Instant::now();
    let frame = Frame::decode_payload(FrameType::Settings, payload.freeze(), false)
        .expect("unique identifiers");
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
    let Frame::Settings(settings) = frame else {
        panic!("expected SETTINGS frame");
    };
    assert_eq!(settings.settings().len(), 200_000);
    assert_eq!(settings.get(0x21 + count - 1), Some(1));
}

#[test]
fn duplicate_at_end_of_large_settings_frame_is_found() {
    let mut pairs: Vec<(u64, u64)> = (0x21..0x21 + 50_000).map(|id| (id, 0)).collect();
    pairs.push((0x21, 1));
    assert_eq!(
        SettingsFrame::new(settings(&pairs)),
        Err(MalformedError::InvalidPayload {
            frame_type: FrameType::Settings,
            reason: "duplicate setting identifier",
        })
    );
}
