//! Memory pooling for reducing allocation overhead.
//!
//! Buffers are grouped into power-of-two size classes, each backed by a
//! bounded bucket of spares. Requests above the largest class bypass the
//! buckets entirely.

mod bucket;
mod buffer;
mod rental;
mod size_class;

pub use buffer::{BufferPool, MAX_RENT_SIZE};
pub use rental::Rental;
pub use size_class::{SizeClass, SizeClasses};
