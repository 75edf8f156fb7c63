//! Log output of the parser and pool, captured with `logtest`.

use h3frame::{
    config::{ParserConfig, UnknownFramePolicy},
    pool::{BoundedBufferPool, BufferPool},
    stream::StreamId,
};
use h3frame_testing::{LoggerHandle, feed_chunks_with_config, logger, raw_frame};
use rstest::rstest;

fn lenient() -> ParserConfig {
    ParserConfig::default().unknown_frame_policy(UnknownFramePolicy::Lenient)
}

#[rstest]
fn skipped_extension_frame_logs_warning(mut logger: LoggerHandle) {
    let frames = feed_chunks_with_config(StreamId::new(0), lenient(), [raw_frame(0x4242, b"ext")])
        .expect("lenient parse");
    assert!(frames.is_empty());

    let messages = logger.drain_messages();
    assert!(
        messages
            .iter()
            .any(|m| m.contains("skipping unknown frame") && m.contains("frame_type=0x4242")),
        "missing skip warning in {messages:?}"
    );
}

#[rstest]
fn skipped_grease_frame_is_silent(mut logger: LoggerHandle) {
    feed_chunks_with_config(StreamId::new(0), lenient(), [raw_frame(0x21, b"grease")])
        .expect("lenient parse");

    let messages = logger.drain_messages();
    assert!(
        !messages.iter().any(|m| m.contains("skipping unknown frame")),
        "grease frames should be skipped quietly: {messages:?}"
    );
}

#[rstest]
fn pool_exhaustion_logs_warning(mut logger: LoggerHandle) {
    let pool = BoundedBufferPool::new(1);
    let held = pool.acquire(32).expect("first buffer");
    assert!(pool.acquire(32).is_err());
    pool.release(held);

    let messages = logger.drain_messages();
    assert!(
        messages
            .iter()
            .any(|m| m.contains("buffer acquire failed") && m.contains("capacity=32")),
        "missing exhaustion warning in {messages:?}"
    );
}
