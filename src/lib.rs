//! Reusable byte buffers bucketed by size class.
//!
//! ```
//! use buffer_rental::BufferPool;
//!
//! let pool = BufferPool::new(5).unwrap();
//! let buf = pool.rent(123);
//! assert_eq!(buf.len(), 128);
//! pool.return_buffer(buf);
//!
//! {
//!     let mut scoped = pool.rent_scoped(64);
//!     scoped[0] = 1;
//! } // returned here
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod pool;

pub use config::PoolConfig;
pub use error::{Error, Result};
pub use metrics::{BucketStats, OutstandingBytes, PoolStats};
pub use pool::{BufferPool, Rental, SizeClass, SizeClasses};
