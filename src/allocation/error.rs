//! Allocation error types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a single allocation evaluation.
///
/// An empty catalog or an unreachable supply band are not errors; they
/// are reported through [`AllocationOutcome`](super::AllocationOutcome).
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AllocationError {
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("state table needs {required} cells, limit is {limit}")]
    TableTooLarge { required: usize, limit: usize },

    /// A predecessor chain broke during backtrace. This is an engine bug,
    /// never a consequence of the input.
    #[error("corrupt trace at resource_index={resource_index}, cumulative={cumulative}")]
    CorruptTrace {
        resource_index: usize,
        cumulative: u32,
    },
}

impl AllocationError {
    /// Returns `true` for internal invariant violations.
    pub fn is_defect(&self) -> bool {
        matches!(self, AllocationError::CorruptTrace { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = AllocationError::TableTooLarge {
            required: 200,
            limit: 100,
        };
        assert_eq!(err.to_string(), "state table needs 200 cells, limit is 100");

        let err = AllocationError::CorruptTrace {
            resource_index: 2,
            cumulative: 17,
        };
        assert_eq!(
            err.to_string(),
            "corrupt trace at resource_index=2, cumulative=17"
        );
    }

    #[test]
    fn test_is_defect() {
        assert!(AllocationError::CorruptTrace {
            resource_index: 1,
            cumulative: 0
        }
        .is_defect());
        assert!(!AllocationError::InvalidConfig("x".into()).is_defect());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_keeps_variant() {
        let err = AllocationError::TableTooLarge {
            required: 200,
            limit: 100,
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: AllocationError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
