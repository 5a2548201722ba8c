//! Operation tags carried in the `Operation` column of allocator logs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label written by log producers for periodic benchmark summary rows.
pub const SUMMARY_LABEL: &str = "Summary";

/// Operation recorded by a block-level (non-summary) log row.
///
/// Producers only write `Allocation` and `Deallocation` today. Anything else is
/// kept as an opaque category so a single unexpected label never fails a load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operation {
    /// A block was handed out by the allocator.
    Allocation,
    /// A block was returned to the allocator.
    Deallocation,
    /// Unrecognized label, preserved verbatim (trimmed).
    Other(String),
}

impl Operation {
    /// Returns the label as it appears in the log.
    pub fn as_str(&self) -> &str {
        match self {
            Operation::Allocation => "Allocation",
            Operation::Deallocation => "Deallocation",
            Operation::Other(label) => label,
        }
    }

    /// Classifies a raw operation label.
    ///
    /// Returns `None` for the summary label, which is not a block operation.
    pub fn classify(raw: &str) -> Option<Self> {
        match raw.trim() {
            SUMMARY_LABEL => None,
            "Allocation" => Some(Operation::Allocation),
            "Deallocation" => Some(Operation::Deallocation),
            other => Some(Operation::Other(other.to_string())),
        }
    }

    pub fn is_allocation(&self) -> bool {
        matches!(self, Operation::Allocation)
    }

    pub fn is_deallocation(&self) -> bool {
        matches!(self, Operation::Deallocation)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    /// Parses a block operation label; the summary label is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::classify(s).ok_or_else(|| format!("'{SUMMARY_LABEL}' is not a block operation"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_labels() {
        assert_eq!(Operation::classify("Allocation"), Some(Operation::Allocation));
        assert_eq!(
            Operation::classify(" Deallocation "),
            Some(Operation::Deallocation)
        );
        assert_eq!(Operation::classify("Summary"), None);
    }

    #[test]
    fn keeps_unknown_labels_opaque() {
        let op = Operation::classify("Reallocation").unwrap();
        assert_eq!(op, Operation::Other("Reallocation".to_string()));
        assert_eq!(op.to_string(), "Reallocation");
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(
            Operation::classify("allocation"),
            Some(Operation::Other("allocation".to_string()))
        );
    }

    #[test]
    fn from_str_rejects_summary() {
        assert!("Summary".parse::<Operation>().is_err());
        assert_eq!("Allocation".parse::<Operation>(), Ok(Operation::Allocation));
    }
}
