//! Model training module
//!
//! - Weighted CART decision trees (Gini or entropy)
//! - AdaBoost (SAMME) ensembles over those trees

mod config;
pub mod adaboost;
pub mod decision_tree;

pub use adaboost::AdaBoostClassifier;
pub use config::{AdaBoostConfig, Criterion, TreeConfig, DEFAULT_TREE_SEED};
pub use decision_tree::{DecisionTree, TreeNode};
