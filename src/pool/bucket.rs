use bytes::BytesMut;
use crossbeam::utils::CachePadded;
use parking_lot::Mutex;

/// Bounded LIFO stack of spare buffers, all exactly `size` bytes long.
///
/// The most recently returned buffer is handed out first. The lock is held
/// only for a single push or pop.
pub(crate) struct Bucket {
    size: usize,
    capacity: usize,
    spares: CachePadded<Mutex<Vec<BytesMut>>>,
}

impl Bucket {
    pub(crate) fn new(size: usize, capacity: usize) -> Self {
        Self {
            size,
            capacity,
            spares: CachePadded::new(Mutex::new(Vec::new())),
        }
    }

    /// Buffer length served by this bucket.
    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub(crate) fn pop(&self) -> Option<BytesMut> {
        self.spares.lock().pop()
    }

    /// Push a spare, handing it back if the bucket is already full.
    #[inline]
    pub(crate) fn push(&self, buf: BytesMut) -> Result<(), BytesMut> {
        debug_assert_eq!(buf.len(), self.size);
        let mut spares = self.spares.lock();
        if spares.len() >= self.capacity {
            return Err(buf);
        }
        spares.push(buf);
        Ok(())
    }

    /// Current number of spares.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.spares.lock().len()
    }
}
