use std::fmt;

/// Unified error type for buffer pool operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid pool configuration or rent request
    InvalidArgument(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Result type alias for buffer pool operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::InvalidArgument("max_buffers_per_bucket must be > 0".into());
        assert_eq!(
            err.to_string(),
            "Invalid argument: max_buffers_per_bucket must be > 0"
        );
    }
}
