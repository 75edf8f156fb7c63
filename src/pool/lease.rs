//! Scoped ownership of the buffers produced by one generation call.

use std::sync::Arc;

use bytes::{Bytes, BytesMut};

use super::{BufferPool, PoolError};

/// View of one buffer held by a [`Lease`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeaseEntry<'a> {
    /// Buffer borrowed from the lease's pool; returned on release.
    Pooled(&'a [u8]),
    /// Caller-owned bytes referenced without copying.
    ///
    /// The reference count keeps the memory alive until the lease lets go of
    /// it, and `Bytes` is immutable, so the payload cannot be changed or
    /// freed while the lease is open.
    Shared(&'a Bytes),
}

impl<'a> LeaseEntry<'a> {
    /// View the entry's bytes.
    #[must_use]
    pub fn as_slice(self) -> &'a [u8] {
        match self {
            Self::Pooled(buffer) => buffer,
            Self::Shared(bytes) => &bytes[..],
        }
    }

    /// Whether the entry belongs to the pool.
    #[must_use]
    pub const fn is_pooled(self) -> bool { matches!(self, Self::Pooled(_)) }
}

#[derive(Debug)]
enum Slot {
    /// Index into `Lease::pooled`.
    Pooled(usize),
    Shared(Bytes),
}

/// Ordered set of buffers acquired during one generation call.
///
/// Pooled buffers go back to the pool exactly once: when [`release`] is
/// called, or when the lease is dropped. `release` takes the lease by value,
/// so no buffer can be reached through it afterwards.
///
/// [`release`]: Lease::release
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use bytes::{BufMut, Bytes};
/// use h3frame::pool::{BoundedBufferPool, BufferPool, Lease};
///
/// let pool = Arc::new(BoundedBufferPool::new(4));
/// let mut lease = Lease::new(pool.clone());
/// lease.acquire(8).expect("buffer").put_slice(b"head");
/// lease.append(Bytes::from_static(b"body"));
///
/// assert_eq!(lease.buffers().collect::<Vec<_>>(), vec![&b"head"[..], &b"body"[..]]);
/// assert_eq!(pool.outstanding(), 1);
/// lease.release();
/// assert_eq!(pool.outstanding(), 0);
/// ```
#[derive(Debug)]
pub struct Lease {
    pool: Arc<dyn BufferPool>,
    pooled: Vec<BytesMut>,
    order: Vec<Slot>,
}

impl Lease {
    /// Open an empty lease on `pool`.
    #[must_use]
    pub fn new(pool: Arc<dyn BufferPool>) -> Self {
        Self {
            pool,
            pooled: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Borrow a buffer from the pool, append it, and return it for filling.
    ///
    /// # Errors
    ///
    /// Propagates [`PoolError`] from the pool; the lease is left unchanged.
    pub fn acquire(&mut self, capacity: usize) -> Result<&mut BytesMut, PoolError> {
        let buffer = self.pool.acquire(capacity)?;
        let index = self.pooled.len();
        self.pooled.push(buffer);
        self.order.push(Slot::Pooled(index));
        Ok(&mut self.pooled[index])
    }

    /// Append caller-owned bytes without copying them.
    ///
    /// Only [`acquire`](Self::acquire) adds pooled buffers, so everything the
    /// lease hands back to its pool came from that pool.
    pub fn append(&mut self, bytes: Bytes) { self.order.push(Slot::Shared(bytes)); }

    /// Buffers in transmission order.
    pub fn buffers(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.entries().map(LeaseEntry::as_slice)
    }

    /// Entries in transmission order.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = LeaseEntry<'_>> + '_ {
        self.order.iter().map(move |slot| match slot {
            Slot::Pooled(index) => LeaseEntry::Pooled(&self.pooled[*index][..]),
            Slot::Shared(bytes) => LeaseEntry::Shared(bytes),
        })
    }

    /// Number of buffers held.
    #[must_use]
    pub fn len(&self) -> usize { self.order.len() }

    /// Whether the lease holds no buffers.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.order.is_empty() }

    /// Total bytes across all buffers.
    #[must_use]
    pub fn total_len(&self) -> usize { self.buffers().map(<[u8]>::len).sum() }

    /// Copy every buffer into one contiguous [`Bytes`].
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.total_len());
        for buffer in self.buffers() {
            out.extend_from_slice(buffer);
        }
        out.freeze()
    }

    /// Return every pooled buffer to the pool and close the lease.
    pub fn release(mut self) { self.release_entries_from(0); }

    /// Give back the entries past the first `len`.
    pub(crate) fn truncate(&mut self, len: usize) { self.release_entries_from(len); }

    fn release_entries_from(&mut self, start: usize) {
        if start >= self.order.len() {
            return;
        }
        // Pooled indices grow with position, so the kept slots own a prefix.
        let kept = self.order[..start]
            .iter()
            .filter(|slot| matches!(slot, Slot::Pooled(_)))
            .count();
        self.order.truncate(start);
        for buffer in self.pooled.drain(kept..) {
            self.pool.release(buffer);
        }
    }
}

impl Drop for Lease {
    fn drop(&mut self) { self.release_entries_from(0); }
}
