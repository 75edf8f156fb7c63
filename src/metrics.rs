//! Metric helpers for `h3frame`.
//!
//! Metric names and thin wrappers around the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! every helper compiles to nothing.

#[cfg(feature = "metrics")]
use metrics::{counter, gauge};

/// Name of the counter tracking generated and parsed frames.
pub const FRAMES_TOTAL: &str = "h3frame_frames_total";
/// Name of the counter tracking errors, labelled by category.
pub const ERRORS_TOTAL: &str = "h3frame_errors_total";
/// Name of the gauge tracking buffers lent by a bounded pool.
pub const POOL_OUTSTANDING: &str = "h3frame_pool_outstanding";

/// Direction of frame processing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Frames reconstructed by a parser.
    Inbound,
    /// Frames serialised by a generator.
    Outbound,
}

impl Direction {
    /// Label value for this direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

/// Record a processed frame.
#[cfg_attr(not(feature = "metrics"), expect(unused_variables, reason = "metrics disabled"))]
pub fn inc_frames(direction: Direction, frame_type: &'static str) {
    #[cfg(feature = "metrics")]
    counter!(FRAMES_TOTAL, "direction" => direction.as_str(), "type" => frame_type).increment(1);
}

/// Record an error of the given category.
#[cfg_attr(not(feature = "metrics"), expect(unused_variables, reason = "metrics disabled"))]
pub fn inc_errors(error_type: &'static str) {
    #[cfg(feature = "metrics")]
    counter!(ERRORS_TOTAL, "type" => error_type).increment(1);
}

/// Publish the number of buffers a pool has lent out.
#[cfg_attr(not(feature = "metrics"), expect(unused_variables, reason = "metrics disabled"))]
pub fn set_pool_outstanding(outstanding: usize) {
    #[cfg(feature = "metrics")]
    {
        #[expect(
            clippy::cast_precision_loss,
            reason = "gauge values are approximate above 2^52"
        )]
        let value = outstanding as f64;
        gauge!(POOL_OUTSTANDING).set(value);
    }
}
