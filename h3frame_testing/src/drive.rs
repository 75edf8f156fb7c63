//! In-memory async driving helpers.

use std::io;

use futures::{SinkExt, StreamExt};
use h3frame::{codec::FrameCodec, frame::Frame, stream::StreamId};
use tokio::io::duplex;
use tokio_util::codec::{FramedRead, FramedWrite};

/// Duplex buffer size used when none is given.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Write `frames` through a [`FrameCodec`] into one half of a
/// `tokio::io::duplex` pipe and read them back from the other half.
///
/// The writer is closed after the last frame. `FramedRead` decodes frames as
/// soon as their bytes arrive, before it sees end of stream, so `DATA` frames
/// come back with `last` unset.
///
/// ```rust
/// use bytes::Bytes;
/// use h3frame::{frame::{DataFrame, Frame}, stream::StreamId};
/// use h3frame_testing::round_trip_over_duplex;
///
/// # async fn demo() -> std::io::Result<()> {
/// let frames = vec![Frame::from(DataFrame::new(Bytes::from_static(b"x"), false))];
/// let read = round_trip_over_duplex(StreamId::new(0), frames.clone(), 64).await?;
/// assert_eq!(read, frames);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns the first encoding or decoding error.
pub async fn round_trip_over_duplex(
    stream_id: StreamId,
    frames: Vec<Frame>,
    capacity: usize,
) -> io::Result<Vec<Frame>> {
    let (client, server) = duplex(capacity);

    let write = async move {
        let mut writer = FramedWrite::new(client, FrameCodec::new(stream_id));
        for frame in frames {
            writer.send(frame).await?;
        }
        writer.close().await?;
        io::Result::Ok(())
    };

    let read = async move {
        let mut reader = FramedRead::new(server, FrameCodec::new(stream_id));
        let mut received = Vec::new();
        while let Some(frame) = reader.next().await {
            received.push(frame?);
        }
        io::Result::Ok(received)
    };

    let ((), received) = tokio::try_join!(write, read)?;
    Ok(received)
}
