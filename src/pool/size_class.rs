//! Power-of-two size classes.
//!
//! Classes double from a floor to a ceiling, both powers of two. Resolving
//! a request is a `next_power_of_two` plus a shift, independent of pool state.

/// Where a request or a returned buffer lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    /// Served by the bucket at `index`, whose buffers are exactly `size` long.
    Bucketed { index: usize, size: usize },
    /// Above the ceiling, or a length matching no class. Never pooled.
    Unbucketed(usize),
}

impl SizeClass {
    /// Length of the buffer this class hands out.
    #[inline]
    pub fn buffer_len(&self) -> usize {
        match *self {
            SizeClass::Bucketed { size, .. } => size,
            SizeClass::Unbucketed(len) => len,
        }
    }

    #[inline]
    pub fn is_bucketed(&self) -> bool {
        matches!(self, SizeClass::Bucketed { .. })
    }
}

/// Ordered, immutable set of size classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeClasses {
    min: usize,
    max: usize,
    min_shift: u32,
    count: usize,
}

impl SizeClasses {
    /// Both bounds must be powers of two with `min <= max`
    /// (checked by `PoolConfig::validate`).
    pub(crate) fn new(min: usize, max: usize) -> Self {
        debug_assert!(min.is_power_of_two() && max.is_power_of_two() && min <= max);
        let min_shift = min.trailing_zeros();
        let count = (max.trailing_zeros() - min_shift) as usize + 1;
        Self {
            min,
            max,
            min_shift,
            count,
        }
    }

    /// Number of classes (and therefore buckets).
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Smallest class.
    #[inline]
    pub fn min_size(&self) -> usize {
        self.min
    }

    /// Largest class.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.max
    }

    /// Buffer length of the class at `index`.
    #[inline]
    pub fn size_of(&self, index: usize) -> usize {
        self.min << index
    }

    /// All class sizes, smallest first.
    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.count).map(move |i| self.size_of(i))
    }

    /// Smallest class able to hold `minimum_size` bytes.
    ///
    /// Zero maps to the floor so that no zero-length buffer is ever pooled.
    #[inline]
    pub fn resolve(&self, minimum_size: usize) -> SizeClass {
        if minimum_size > self.max {
            return SizeClass::Unbucketed(minimum_size);
        }
        // Cannot overflow: minimum_size <= max, which is a power of two.
        let size = minimum_size.max(self.min).next_power_of_two();
        SizeClass::Bucketed {
            index: (size.trailing_zeros() - self.min_shift) as usize,
            size,
        }
    }

    /// Class of a returned buffer, by exact length.
    #[inline]
    pub fn classify(&self, len: usize) -> SizeClass {
        if len.is_power_of_two() && len >= self.min && len <= self.max {
            SizeClass::Bucketed {
                index: (len.trailing_zeros() - self.min_shift) as usize,
                size: len,
            }
        } else {
            SizeClass::Unbucketed(len)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes() -> SizeClasses {
        SizeClasses::new(16, 1024 * 1024)
    }

    #[test]
    fn test_class_count() {
        // 16, 32, ..., 1 MiB
        assert_eq!(classes().len(), 17);
        assert_eq!(SizeClasses::new(64, 64).len(), 1);
    }

    #[test]
    fn test_sizes_strictly_increasing() {
        let sizes: Vec<usize> = classes().sizes().collect();
        assert_eq!(sizes.first(), Some(&16));
        assert_eq!(sizes.last(), Some(&(1024 * 1024)));
        assert!(sizes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_resolve_zero_to_floor() {
        assert_eq!(
            classes().resolve(0),
            SizeClass::Bucketed { index: 0, size: 16 }
        );
    }

    #[test]
    fn test_resolve_rounds_up() {
        let c = classes();
        assert_eq!(c.resolve(1).buffer_len(), 16);
        assert_eq!(c.resolve(16).buffer_len(), 16);
        assert_eq!(c.resolve(17).buffer_len(), 32);
        assert_eq!(c.resolve(123), SizeClass::Bucketed { index: 3, size: 128 });
        assert_eq!(c.resolve(1023).buffer_len(), 1024);
        assert_eq!(c.resolve(1024).buffer_len(), 1024);
        assert_eq!(c.resolve(1151).buffer_len(), 2048);
    }

    #[test]
    fn test_resolve_at_and_past_ceiling() {
        let c = classes();
        assert_eq!(
            c.resolve(1024 * 1024),
            SizeClass::Bucketed {
                index: 16,
                size: 1024 * 1024
            }
        );
        assert_eq!(
            c.resolve(1024 * 1024 + 1),
            SizeClass::Unbucketed(1024 * 1024 + 1)
        );
        assert_eq!(c.resolve(usize::MAX), SizeClass::Unbucketed(usize::MAX));
    }

    #[test]
    fn test_resolve_is_minimal() {
        let c = classes();
        for request in [0usize, 1, 3, 100, 5345, 64564, 1024 * 1024 - 1] {
            let len = c.resolve(request).buffer_len();
            assert!(len >= request);
            // The next smaller class would not fit.
            assert!(len == c.min_size() || len / 2 < request);
        }
    }

    #[test]
    fn test_classify_exact_lengths() {
        let c = classes();
        assert_eq!(c.classify(16), SizeClass::Bucketed { index: 0, size: 16 });
        assert_eq!(c.classify(4096), c.resolve(4096));
        assert_eq!(c.classify(123), SizeClass::Unbucketed(123));
        assert_eq!(c.classify(8), SizeClass::Unbucketed(8));
        assert_eq!(c.classify(0), SizeClass::Unbucketed(0));
        assert_eq!(
            c.classify(2 * 1024 * 1024),
            SizeClass::Unbucketed(2 * 1024 * 1024)
        );
    }
}
