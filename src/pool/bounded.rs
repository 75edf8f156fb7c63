//! Reusing pool with a cap on outstanding buffers.

#[cfg(not(loom))]
use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::sync::PoisonError;

use bytes::BytesMut;
#[cfg(loom)]
use loom::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};
use log::warn;

use super::{BufferPool, PoolError};
use crate::metrics;

const DEFAULT_MAX_OUTSTANDING: usize = 1024;
const DEFAULT_MAX_RETAINED: usize = 64;

/// Builder for [`BoundedBufferPool`].
///
/// Defaults allow 1024 outstanding buffers and keep up to 64 idle buffers
/// for reuse.
///
/// # Examples
///
/// ```
/// use h3frame::pool::{BoundedBufferPool, BufferPool};
///
/// let pool = BoundedBufferPool::builder()
///     .max_outstanding(2)
///     .max_retained(1)
///     .build();
/// let buffer = pool.acquire(16).expect("buffer available");
/// assert_eq!(pool.outstanding(), 1);
/// pool.release(buffer);
/// assert_eq!(pool.outstanding(), 0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct BoundedBufferPoolBuilder {
    max_outstanding: usize,
    max_retained: usize,
}

impl Default for BoundedBufferPoolBuilder {
    fn default() -> Self {
        Self {
            max_outstanding: DEFAULT_MAX_OUTSTANDING,
            max_retained: DEFAULT_MAX_RETAINED,
        }
    }
}

impl BoundedBufferPoolBuilder {
    /// Set the number of buffers that may be lent at once.
    #[must_use]
    pub fn max_outstanding(mut self, limit: usize) -> Self {
        debug_assert!(limit > 0, "limit must be greater than zero");
        self.max_outstanding = limit;
        self
    }

    /// Set how many idle buffers are kept for reuse.
    #[must_use]
    pub fn max_retained(mut self, limit: usize) -> Self {
        self.max_retained = limit;
        self
    }

    /// Build the pool.
    #[must_use]
    pub fn build(self) -> BoundedBufferPool {
        BoundedBufferPool {
            free: Mutex::new(Vec::new()),
            outstanding: AtomicUsize::new(0),
            max_outstanding: self.max_outstanding,
            max_retained: self.max_retained,
        }
    }
}

/// Thread-safe pool that recycles released buffers.
#[derive(Debug)]
pub struct BoundedBufferPool {
    free: Mutex<Vec<BytesMut>>,
    outstanding: AtomicUsize,
    max_outstanding: usize,
    max_retained: usize,
}

impl BoundedBufferPool {
    /// Start configuring a pool.
    #[must_use]
    pub fn builder() -> BoundedBufferPoolBuilder { BoundedBufferPoolBuilder::default() }

    /// Create a pool lending at most `max_outstanding` buffers.
    #[must_use]
    pub fn new(max_outstanding: usize) -> Self {
        Self::builder().max_outstanding(max_outstanding).build()
    }

    /// Number of idle buffers held for reuse.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn reserve(&self) -> Result<usize, PoolError> {
        self.outstanding
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current < self.max_outstanding).then_some(current + 1)
            })
            .map(|previous| previous + 1)
            .map_err(|_| PoolError::Exhausted {
                limit: self.max_outstanding,
            })
    }
}

impl Default for BoundedBufferPool {
    fn default() -> Self { Self::builder().build() }
}

impl BufferPool for BoundedBufferPool {
    fn acquire(&self, capacity: usize) -> Result<BytesMut, PoolError> {
        let outstanding = self.reserve().inspect_err(|err| {
            warn!("buffer acquire failed: capacity={capacity}, error={err}");
            metrics::inc_errors("pool");
        })?;
        metrics::set_pool_outstanding(outstanding);

        let recycled = {
            let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
            free.iter()
                .position(|buffer| buffer.capacity() >= capacity)
                .map(|index| free.swap_remove(index))
        };
        Ok(recycled.unwrap_or_else(|| BytesMut::with_capacity(capacity)))
    }

    fn release(&self, mut buffer: BytesMut) {
        let released = self
            .outstanding
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                current.checked_sub(1)
            });
        debug_assert!(released.is_ok(), "buffer released with none outstanding");
        let Ok(previous) = released else {
            warn!(
                "buffer released with none outstanding: capacity={}",
                buffer.capacity()
            );
            metrics::inc_errors("pool");
            return;
        };
        metrics::set_pool_outstanding(previous - 1);

        buffer.clear();
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        if free.len() < self.max_retained {
            free.push(buffer);
        }
    }

    fn outstanding(&self) -> usize { self.outstanding.load(Ordering::Acquire) }
}
