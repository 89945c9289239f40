//! Error types.
//!
//! Lookups never fail: a missing key is reported as `None`. The only
//! failure is rejecting an invalid configuration when a cache is built.

use thiserror::Error;

/// Errors returned when constructing a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The requested capacity was zero.
    #[error("cache capacity must be greater than zero")]
    ZeroCapacity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CacheError::ZeroCapacity.to_string(),
            "cache capacity must be greater than zero"
        );
    }
}
