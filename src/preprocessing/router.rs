//! Static routing of engineered columns to the numeric or one-hot branch

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Numeric vs. categorical split of the engineered columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnPartition {
    /// Standardized columns, in engineered table order
    pub numeric: Vec<String>,
    /// One-hot columns: categorical names followed by ordinal names
    pub categorical: Vec<String>,
}

impl ColumnPartition {
    /// Total number of routed input columns
    pub fn len(&self) -> usize {
        self.numeric.len() + self.categorical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Union equals `columns` minus `label`, with no column in both groups
    pub fn is_complete(&self, columns: &[String], label: &str) -> bool {
        let numeric: HashSet<&str> = self.numeric.iter().map(String::as_str).collect();
        let categorical: HashSet<&str> = self.categorical.iter().map(String::as_str).collect();
        if numeric.len() != self.numeric.len()
            || categorical.len() != self.categorical.len()
            || !numeric.is_disjoint(&categorical)
        {
            return false;
        }

        let expected: HashSet<&str> = columns
            .iter()
            .map(String::as_str)
            .filter(|c| *c != label)
            .collect();
        let routed: HashSet<&str> = numeric.union(&categorical).copied().collect();
        routed == expected
    }
}

/// Routes columns by name only: anything not listed as categorical or
/// ordinal is numeric, whatever its dtype
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRouter {
    categorical: Vec<String>,
    ordinal: Vec<String>,
}

impl ColumnRouter {
    pub fn new<S: AsRef<str>>(categorical: &[S], ordinal: &[S]) -> Self {
        Self {
            categorical: categorical.iter().map(|s| s.as_ref().to_string()).collect(),
            ordinal: ordinal.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// Split `columns` (the engineered table's names, label included)
    pub fn route(&self, columns: &[String], label: &str) -> ColumnPartition {
        let mut seen = HashSet::new();
        let categorical: Vec<String> = self
            .categorical
            .iter()
            .chain(self.ordinal.iter())
            .filter(|c| seen.insert(c.as_str()))
            .cloned()
            .collect();

        let numeric = columns
            .iter()
            .filter(|c| c.as_str() != label && !seen.contains(c.as_str()))
            .cloned()
            .collect();

        ColumnPartition { numeric, categorical }
    }
}
