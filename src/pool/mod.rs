//! Transmit buffer pools and the leases that borrow from them.
//!
//! A [`BufferPool`] hands out [`BytesMut`] buffers and takes them back. A
//! [`Lease`] collects every buffer produced by one generation call and gives
//! them all back to the pool when it is released or dropped, so a buffer can
//! never be returned twice or touched after it went back.
//!
//! [`NullBufferPool`] allocates fresh buffers and drops returned ones; it is
//! enough for tests and one-off encodings. [`BoundedBufferPool`] reuses
//! buffers, caps the number outstanding and is safe to share between
//! connections.

use std::fmt;

use bytes::BytesMut;
use thiserror::Error;

mod bounded;
mod lease;

pub use bounded::{BoundedBufferPool, BoundedBufferPoolBuilder};
pub use lease::{Lease, LeaseEntry};

/// Errors raised when a pool cannot supply a buffer.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// Every buffer the pool may lend is already out.
    #[error("buffer pool exhausted: {limit} buffers outstanding")]
    Exhausted {
        /// Configured outstanding-buffer limit.
        limit: usize,
    },
}

/// Source of reusable transmit buffers.
///
/// Implementations must tolerate concurrent `acquire` and `release` calls
/// from different connections.
pub trait BufferPool: Send + Sync + fmt::Debug {
    /// Borrow an empty buffer with at least `capacity` bytes of space.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Exhausted`] if no buffer can be lent.
    fn acquire(&self, capacity: usize) -> Result<BytesMut, PoolError>;

    /// Return a buffer previously obtained from [`acquire`](Self::acquire).
    fn release(&self, buffer: BytesMut);

    /// Number of buffers currently lent out.
    fn outstanding(&self) -> usize { 0 }
}

/// Pool that allocates on every acquire and frees on every release.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullBufferPool;

impl BufferPool for NullBufferPool {
    fn acquire(&self, capacity: usize) -> Result<BytesMut, PoolError> {
        Ok(BytesMut::with_capacity(capacity))
    }

    fn release(&self, buffer: BytesMut) { drop(buffer); }
}
