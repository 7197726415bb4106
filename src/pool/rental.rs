use bytes::BytesMut;
use std::fmt;
use std::ops::{Deref, DerefMut};

use super::buffer::BufferPool;

/// RAII guard that returns its buffer to the owning pool on drop.
///
/// The buffer goes back exactly once: on drop, on an explicit
/// [`release`](Rental::release), or never if [`detach`](Rental::detach)ed.
/// Unwinding through the owning scope still returns it.
pub struct Rental<'a> {
    pool: &'a BufferPool,
    // Some until released or detached
    buf: Option<BytesMut>,
}

impl<'a> Rental<'a> {
    pub(crate) fn new(pool: &'a BufferPool, buf: BytesMut) -> Self {
        Self {
            pool,
            buf: Some(buf),
        }
    }

    /// Pool this buffer returns to.
    pub fn pool(&self) -> &'a BufferPool {
        self.pool
    }

    /// Return the buffer now instead of at end of scope.
    pub fn release(mut self) {
        self.give_back();
    }

    /// Take the buffer, preventing return to pool.
    ///
    /// Its bytes stay counted as outstanding until the caller hands it to
    /// [`BufferPool::return_buffer`] or drops it.
    pub fn detach(mut self) -> BytesMut {
        self.buf.take().unwrap_or_default()
    }

    fn give_back(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.return_buffer(buf);
        }
    }
}

impl Deref for Rental<'_> {
    type Target = BytesMut;

    fn deref(&self) -> &Self::Target {
        self.buf.as_ref().expect("rental buffer is present until drop")
    }
}

impl DerefMut for Rental<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.buf.as_mut().expect("rental buffer is present until drop")
    }
}

impl Drop for Rental<'_> {
    fn drop(&mut self) {
        self.give_back();
    }
}

impl fmt::Debug for Rental<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rental")
            .field("len", &self.buf.as_ref().map(BytesMut::len))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::PoolConfig;
    use crate::metrics::OutstandingBytes;
    use crate::pool::BufferPool;

    fn create_pool() -> BufferPool {
        BufferPool::with_counter(PoolConfig::new(5), OutstandingBytes::new()).unwrap()
    }

    #[test]
    fn test_returns_on_drop() {
        let pool = create_pool();
        let ptr = {
            let rental = pool.rent_scoped(200);
            assert_eq!(pool.outstanding_bytes(), 256);
            rental.as_ptr()
        };

        assert_eq!(pool.outstanding_bytes(), 0);
        assert_eq!(pool.stats().recycled, 1);
        assert_eq!(pool.rent(200).as_ptr(), ptr);
    }

    #[test]
    fn test_buffer_is_writable() {
        let pool = create_pool();
        let mut rental = pool.rent_scoped(4);
        rental[..4].copy_from_slice(b"data");
        assert_eq!(&rental[..4], b"data");
        assert_eq!(rental.len(), 16);
    }

    #[test]
    fn test_release_returns_once() {
        let pool = create_pool();
        let rental = pool.rent_scoped(64);
        rental.release();

        let stats = pool.stats();
        assert_eq!(stats.recycled, 1);
        assert_eq!(stats.discarded, 0);
        assert_eq!(stats.outstanding_bytes, 0);
        assert_eq!(stats.buckets.iter().map(|b| b.spares).sum::<usize>(), 1);
    }

    #[test]
    fn test_detach_skips_return() {
        let pool = create_pool();
        let buf = pool.rent_scoped(64).detach();

        assert_eq!(buf.len(), 64);
        assert_eq!(pool.outstanding_bytes(), 64);
        assert_eq!(pool.stats().recycled, 0);

        pool.return_buffer(buf);
        assert_eq!(pool.outstanding_bytes(), 0);
    }

    #[test]
    fn test_returns_on_unwind() {
        use std::panic::{catch_unwind, AssertUnwindSafe};

        let pool = create_pool();
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _rental = pool.rent_scoped(1000);
            panic!("caller failed mid-use");
        }));

        assert!(result.is_err());
        assert_eq!(pool.outstanding_bytes(), 0);
        assert_eq!(pool.stats().recycled, 1);
    }

    #[test]
    fn test_oversized_rental_discarded_on_drop() {
        let pool = create_pool();
        {
            let _rental = pool.rent_scoped(2 * 1024 * 1024);
        }
        assert_eq!(pool.discarded_bytes(), 2 * 1024 * 1024);
        assert_eq!(pool.outstanding_bytes(), 2 * 1024 * 1024);
    }

    #[test]
    fn test_rentals_are_distinct() {
        let pool = create_pool();
        let a = pool.rent_scoped(123);
        let b = pool.rent_scoped(123);
        assert_ne!(a.as_ptr(), b.as_ptr());
        assert!(std::ptr::eq(a.pool(), &pool));
    }
}
