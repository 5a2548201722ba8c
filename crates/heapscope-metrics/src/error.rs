//! Error types for metric computation.
//!
//! Missing or degenerate data is never an error here; see
//! [`crate::MetricOutcome`]. These variants are contract violations.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    /// Cumulative memory only knows how to sign allocations and deallocations.
    #[error("cannot sign net memory change for operation '{operation}' (allocation id '{allocation_id}')")]
    UnknownOperation {
        operation: String,
        allocation_id: String,
    },

    /// The observed time span needs more buckets than the configured limit.
    #[error("rate grid of {buckets} buckets exceeds the limit of {limit}")]
    GridTooLarge { buckets: u128, limit: usize },

    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Result type for metric operations.
pub type Result<T> = std::result::Result<T, MetricError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MetricError::UnknownOperation {
            operation: "Compaction".to_string(),
            allocation_id: "17".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot sign net memory change for operation 'Compaction' (allocation id '17')"
        );
    }
}
