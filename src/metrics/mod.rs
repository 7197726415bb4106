//! Byte accounting for buffer pools.
//!
//! `OutstandingBytes` is shared by every pool of one family, so it lives
//! behind a cloneable handle instead of inside a pool instance.

mod stats;

pub use stats::{BucketStats, PoolStats};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

/// Relaxed ordering for counters (eventual visibility is fine for metrics).
pub(crate) const RELAXED: Ordering = Ordering::Relaxed;

/// Process-wide counter used by pools built without an explicit counter.
static GLOBAL_OUTSTANDING: OnceLock<OutstandingBytes> = OnceLock::new();

/// Shared count of bytes handed out by a pool family and not yet recycled.
///
/// Incremented on every rent, decremented only when a returned buffer is
/// pushed back into a bucket. Discarded buffers stay counted.
#[derive(Debug, Clone, Default)]
pub struct OutstandingBytes {
    bytes: Arc<AtomicUsize>,
}

impl OutstandingBytes {
    /// Create an isolated counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the process-wide counter.
    pub fn global() -> Self {
        GLOBAL_OUTSTANDING.get_or_init(Self::new).clone()
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> usize {
        self.bytes.load(RELAXED)
    }

    /// Reset to zero. Intended for tests that own an isolated counter.
    pub fn reset(&self) {
        self.bytes.store(0, RELAXED);
    }

    /// Whether two handles point at the same counter.
    pub fn same_counter(&self, other: &OutstandingBytes) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }

    #[inline]
    pub(crate) fn add(&self, len: usize) {
        self.bytes.fetch_add(len, RELAXED);
    }

    /// Saturating: a foreign buffer returned without a matching rent
    /// must not wrap the counter.
    #[inline]
    pub(crate) fn sub(&self, len: usize) {
        let _ = self
            .bytes
            .fetch_update(RELAXED, RELAXED, |current| Some(current.saturating_sub(len)));
    }
}
