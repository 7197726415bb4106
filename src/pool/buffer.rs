//! Size-class bucketed pool of `BytesMut` buffers.
//!
//! Reduces allocation overhead in hot paths by reusing buffers of a
//! fixed set of lengths. Requests above the largest class are served
//! unpooled and never retained.

use bytes::BytesMut;
use std::sync::atomic::AtomicUsize;
use tracing::{debug, trace};

use super::bucket::Bucket;
use super::rental::Rental;
use super::size_class::{SizeClass, SizeClasses};
use crate::config::PoolConfig;
use crate::error::{Error, Result};
use crate::metrics::{BucketStats, OutstandingBytes, PoolStats, RELAXED};

/// Largest request `try_rent` accepts; Rust allocations cannot exceed it.
pub const MAX_RENT_SIZE: usize = isize::MAX as usize;

/// Pool of reusable byte buffers bucketed by power-of-two size class.
///
/// Every rented buffer has `len()` equal to its class size (or to the
/// requested size when oversized). Contents are not cleared between rentals.
///
/// Returning a buffer that did not come from this pool, or returning the
/// same buffer twice without renting it again, is a caller bug the pool
/// does not detect.
pub struct BufferPool {
    classes: SizeClasses,
    buckets: Box<[Bucket]>,
    max_buffers_per_bucket: usize,
    /// Shared across the pool family
    outstanding: OutstandingBytes,
    /// Statistics: rents served from a bucket
    hits: AtomicUsize,
    /// Statistics: rents that allocated
    misses: AtomicUsize,
    /// Statistics: returns pushed into a bucket
    recycled: AtomicUsize,
    /// Statistics: returns dropped
    discarded: AtomicUsize,
    discarded_bytes: AtomicUsize,
}

impl BufferPool {
    /// Pool with default size classes and the process-wide outstanding counter.
    pub fn new(max_buffers_per_bucket: usize) -> Result<Self> {
        Self::with_config(PoolConfig::new(max_buffers_per_bucket))
    }

    /// Pool from an explicit config, sharing the process-wide counter.
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        Self::with_counter(config, OutstandingBytes::global())
    }

    /// Pool reporting into the given outstanding-bytes counter.
    pub fn with_counter(config: PoolConfig, outstanding: OutstandingBytes) -> Result<Self> {
        config.validate()?;

        let classes = SizeClasses::new(config.min_buffer_size, config.max_buffer_size);
        let buckets = classes
            .sizes()
            .map(|size| Bucket::new(size, config.max_buffers_per_bucket))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        debug!(
            "Buffer pool created: {} size classes ({}..={} bytes), {} buffers per bucket",
            classes.len(),
            classes.min_size(),
            classes.max_size(),
            config.max_buffers_per_bucket
        );

        Ok(Self {
            classes,
            buckets,
            max_buffers_per_bucket: config.max_buffers_per_bucket,
            outstanding,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            recycled: AtomicUsize::new(0),
            discarded: AtomicUsize::new(0),
            discarded_bytes: AtomicUsize::new(0),
        })
    }

    /// Rent a buffer with `len() >= minimum_size`.
    ///
    /// Pops the most recently returned spare of the matching class, or
    /// allocates a zero-filled one. Allocation failure is not handled here.
    pub fn rent(&self, minimum_size: usize) -> BytesMut {
        let buf = match self.classes.resolve(minimum_size) {
            SizeClass::Bucketed { index, size } => match self.buckets[index].pop() {
                Some(buf) => {
                    self.hits.fetch_add(1, RELAXED);
                    trace!("Rent hit: {} bytes from class {}", size, index);
                    buf
                }
                None => {
                    self.misses.fetch_add(1, RELAXED);
                    trace!("Rent miss: allocating {} bytes for class {}", size, index);
                    BytesMut::zeroed(size)
                }
            },
            SizeClass::Unbucketed(len) => {
                self.misses.fetch_add(1, RELAXED);
                trace!("Rent oversized: allocating {} bytes unpooled", len);
                BytesMut::zeroed(len)
            }
        };

        self.outstanding.add(buf.len());
        buf
    }

    /// Like [`rent`](Self::rent), but rejects sizes no allocation can satisfy.
    pub fn try_rent(&self, minimum_size: usize) -> Result<BytesMut> {
        if minimum_size > MAX_RENT_SIZE {
            return Err(Error::InvalidArgument(format!(
                "requested buffer size {} exceeds the maximum of {}",
                minimum_size, MAX_RENT_SIZE
            )));
        }
        Ok(self.rent(minimum_size))
    }

    /// Rent a buffer that returns itself to this pool when dropped.
    pub fn rent_scoped(&self, minimum_size: usize) -> Rental<'_> {
        Rental::new(self, self.rent(minimum_size))
    }

    /// Return a rented buffer.
    ///
    /// The buffer is recycled if its length matches a size class and that
    /// bucket has room; only then does the outstanding counter go down.
    /// Otherwise it is dropped and its length added to the discarded bytes.
    pub fn return_buffer(&self, buf: BytesMut) {
        let len = buf.len();
        match self.classes.classify(len) {
            SizeClass::Bucketed { index, .. } => match self.buckets[index].push(buf) {
                Ok(()) => {
                    self.recycled.fetch_add(1, RELAXED);
                    self.outstanding.sub(len);
                    trace!("Recycled {} bytes into class {}", len, index);
                }
                Err(buf) => {
                    debug!("Discarding {} byte buffer: bucket {} is full", len, index);
                    self.discard(buf);
                }
            },
            SizeClass::Unbucketed(_) => {
                debug!("Discarding {} byte buffer: no matching size class", len);
                self.discard(buf);
            }
        }
    }

    fn discard(&self, buf: BytesMut) {
        self.discarded.fetch_add(1, RELAXED);
        self.discarded_bytes.fetch_add(buf.len(), RELAXED);
    }

    /// Family-wide bytes rented and not yet recycled.
    #[inline]
    pub fn outstanding_bytes(&self) -> usize {
        self.outstanding.get()
    }

    /// Handle to the counter this pool reports into.
    pub fn outstanding(&self) -> &OutstandingBytes {
        &self.outstanding
    }

    /// Bytes this pool dropped instead of recycling.
    #[inline]
    pub fn discarded_bytes(&self) -> usize {
        self.discarded_bytes.load(RELAXED)
    }

    pub fn size_classes(&self) -> &SizeClasses {
        &self.classes
    }

    pub fn max_buffers_per_bucket(&self) -> usize {
        self.max_buffers_per_bucket
    }

    /// Get pool statistics.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            hits: self.hits.load(RELAXED),
            misses: self.misses.load(RELAXED),
            recycled: self.recycled.load(RELAXED),
            discarded: self.discarded.load(RELAXED),
            discarded_bytes: self.discarded_bytes.load(RELAXED),
            outstanding_bytes: self.outstanding.get(),
            buckets: self
                .buckets
                .iter()
                .map(|bucket| BucketStats {
                    size: bucket.size(),
                    spares: bucket.len(),
                })
                .collect(),
        }
    }
}
