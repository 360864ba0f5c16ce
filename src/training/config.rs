//! Model configuration

use serde::{Deserialize, Serialize};

/// Seed of the base tree, fixed so split tie-breaking is repeatable
pub const DEFAULT_TREE_SEED: u64 = 42;

/// Impurity criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Criterion {
    /// Gini impurity
    #[default]
    Gini,
    /// Shannon entropy
    Entropy,
}

/// Base learner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub criterion: Criterion,
    /// Seed for the feature scan order; `None` draws one per fit
    pub random_state: Option<u64>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            criterion: Criterion::Gini,
            random_state: Some(DEFAULT_TREE_SEED),
        }
    }
}

/// AdaBoost (SAMME) settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaBoostConfig {
    pub n_estimators: usize,
    pub learning_rate: f64,
    /// Ensemble-level seed. Only used to seed base trees that have no
    /// `random_state` of their own.
    pub random_state: Option<u64>,
    pub tree: TreeConfig,
}

impl Default for AdaBoostConfig {
    fn default() -> Self {
        Self {
            n_estimators: 50,
            learning_rate: 1.0,
            random_state: None,
            tree: TreeConfig::default(),
        }
    }
}

impl AdaBoostConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn with_tree(mut self, tree: TreeConfig) -> Self {
        self.tree = tree;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdaBoostConfig::default();
        assert_eq!(config.n_estimators, 50);
        assert_eq!(config.learning_rate, 1.0);
        assert_eq!(config.random_state, None);
        assert_eq!(config.tree.random_state, Some(42));
        assert_eq!(config.tree.max_depth, None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AdaBoostConfig = serde_json::from_str(r#"{"n_estimators": 10}"#).unwrap();
        assert_eq!(config.n_estimators, 10);
        assert_eq!(config.tree, TreeConfig::default());
    }
}
