/// Spare-buffer occupancy of one size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketStats {
    /// Buffer length served by this bucket
    pub size: usize,
    /// Spare buffers currently held
    pub spares: usize,
}

/// Pool statistics for monitoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    /// Rents served from a bucket (cache hits)
    pub hits: usize,
    /// Rents that allocated a fresh buffer, including oversized ones
    pub misses: usize,
    /// Returned buffers pushed back into a bucket
    pub recycled: usize,
    /// Returned buffers dropped (bucket full or oversized)
    pub discarded: usize,
    /// Total length of discarded buffers for this pool
    pub discarded_bytes: usize,
    /// Family-wide outstanding bytes at snapshot time
    pub outstanding_bytes: usize,
    /// Per-size-class occupancy, smallest class first
    pub buckets: Vec<BucketStats>,
}

impl PoolStats {
    /// Calculate hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Bytes currently parked in buckets, ready for reuse.
    pub fn spare_bytes(&self) -> usize {
        self.buckets.iter().map(|b| b.size * b.spares).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(hits: usize, misses: usize) -> PoolStats {
        PoolStats {
            hits,
            misses,
            recycled: 0,
            discarded: 0,
            discarded_bytes: 0,
            outstanding_bytes: 0,
            buckets: vec![
                BucketStats { size: 16, spares: 3 },
                BucketStats { size: 32, spares: 1 },
            ],
        }
    }

    #[test]
    fn test_hit_rate() {
        assert!((stats(75, 25).hit_rate() - 0.75).abs() < 0.001);
        assert_eq!(stats(0, 0).hit_rate(), 0.0);
    }

    #[test]
    fn test_spare_bytes() {
        assert_eq!(stats(0, 0).spare_bytes(), 16 * 3 + 32);
    }
}
