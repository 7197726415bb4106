use crate::error::{Error, Result};

/// Default number of spare buffers kept per size class.
pub const DEFAULT_MAX_BUFFERS_PER_BUCKET: usize = 50;

/// Default smallest size class.
pub const DEFAULT_MIN_BUFFER_SIZE: usize = 16;

/// Default largest size class (1 MiB). Larger requests are served unpooled.
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 1024 * 1024;

/// Construction parameters for a [`BufferPool`](crate::BufferPool).
///
/// Size classes double from `min_buffer_size` up to `max_buffer_size`,
/// so both bounds must be powers of two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum spare buffers retained by each bucket
    pub max_buffers_per_bucket: usize,

    /// Smallest size class (floor)
    pub min_buffer_size: usize,

    /// Largest size class (ceiling)
    pub max_buffer_size: usize,
}

impl PoolConfig {
    /// Config with the given bucket capacity and default size classes.
    pub fn new(max_buffers_per_bucket: usize) -> Self {
        Self {
            max_buffers_per_bucket,
            ..Default::default()
        }
    }

    /// Override the smallest size class.
    pub fn with_min_buffer_size(mut self, size: usize) -> Self {
        self.min_buffer_size = size;
        self
    }

    /// Override the largest size class.
    pub fn with_max_buffer_size(mut self, size: usize) -> Self {
        self.max_buffer_size = size;
        self
    }

    /// Check the invariants the pool relies on.
    pub fn validate(&self) -> Result<()> {
        if self.max_buffers_per_bucket == 0 {
            return Err(Error::InvalidArgument(
                "max_buffers_per_bucket must be greater than zero".into(),
            ));
        }
        if !self.min_buffer_size.is_power_of_two() {
            return Err(Error::InvalidArgument(format!(
                "min_buffer_size must be a non-zero power of two, got {}",
                self.min_buffer_size
            )));
        }
        if !self.max_buffer_size.is_power_of_two() {
            return Err(Error::InvalidArgument(format!(
                "max_buffer_size must be a non-zero power of two, got {}",
                self.max_buffer_size
            )));
        }
        if self.max_buffer_size < self.min_buffer_size {
            return Err(Error::InvalidArgument(format!(
                "max_buffer_size ({}) is below min_buffer_size ({})",
                self.max_buffer_size, self.min_buffer_size
            )));
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_buffers_per_bucket: DEFAULT_MAX_BUFFERS_PER_BUCKET,
            min_buffer_size: DEFAULT_MIN_BUFFER_SIZE,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
        }
    }
}
