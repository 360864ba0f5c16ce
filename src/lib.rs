//! Attrition Pipeline - employee attrition classifier training
//!
//! Reads a raw HR table, engineers features, standardizes and one-hot
//! encodes them, fits an AdaBoost ensemble of decision trees and
//! persists the fitted pipeline.
//!
//! # Modules
//!
//! - [`feature_engineering`] - Label coding, ordinal labels, derived ratios, bins
//! - [`preprocessing`] - Column routing, scaling, one-hot encoding
//! - [`training`] - Decision trees and AdaBoost (SAMME)
//! - [`pipeline`] - Configuration, fit and the training entry point
//! - [`export`] - Saving and loading fitted pipelines
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

pub mod feature_engineering;
pub mod preprocessing;
pub mod training;
pub mod pipeline;
pub mod export;

pub mod utils;

// Services
pub mod cli;

pub use error::{PipelineError, Result};
pub use pipeline::{run_training, AttritionPipeline, FittedPipeline, PipelineConfig, TrainingSummary};

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{PipelineError, Result};
    pub use crate::export::{load_pipeline, save_pipeline};
    pub use crate::feature_engineering::{extract_label, FeatureEngineer, RatePolicy};
    pub use crate::pipeline::{run_training, AttritionPipeline, FittedPipeline, PipelineConfig, TrainingSummary};
    pub use crate::preprocessing::{ColumnPartition, ColumnRouter, HandleUnknown, Preprocessor};
    pub use crate::training::{AdaBoostClassifier, AdaBoostConfig, Criterion, DecisionTree, TreeConfig};
    pub use crate::utils::DataLoader;
}
