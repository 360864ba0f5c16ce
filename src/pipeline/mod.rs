//! End-to-end attrition training pipeline
//!
//! [`AttritionPipeline`] holds configuration only. [`AttritionPipeline::fit`]
//! consumes it and returns a [`FittedPipeline`], the only form that can
//! predict or be written to disk.

mod config;

pub use config::{PipelineConfig, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH};

use crate::error::{PipelineError, Result};
use crate::export::save_pipeline;
use crate::feature_engineering::schema::{
    raw_position, AGE_GROUP_COLUMN, DERIVED_COLUMNS, DISTANCE_GROUP_COLUMN,
};
use crate::feature_engineering::{extract_label, FeatureEngineer};
use crate::preprocessing::{ColumnPartition, ColumnRouter, Preprocessor};
use crate::training::AdaBoostClassifier;
use crate::utils::{column_names, has_column, DataLoader};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Columns created by the engineer and therefore never expected in raw input
const ENGINEERED_CATEGORICALS: [&str; 2] = [AGE_GROUP_COLUMN, DISTANCE_GROUP_COLUMN];

/// Unfitted pipeline
#[derive(Debug, Clone)]
pub struct AttritionPipeline {
    config: PipelineConfig,
}

impl AttritionPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn engineer(&self) -> FeatureEngineer {
        FeatureEngineer::new()
            .with_label_column(self.config.label_column.clone())
            .with_rate_policy(self.config.rate_policy)
    }

    /// Report every raw column the run needs but `df` lacks, in file order
    pub fn validate_schema(&self, df: &DataFrame) -> Result<()> {
        let mut missing = self.engineer().missing_inputs(df);

        let configured = std::iter::once(&self.config.label_column)
            .chain(self.config.categorical_columns.iter())
            .chain(self.config.ordinal_columns.iter());
        for name in configured {
            if ENGINEERED_CATEGORICALS.contains(&name.as_str()) || has_column(df, name) {
                continue;
            }
            if !missing.contains(name) {
                missing.push(name.clone());
            }
        }

        if missing.is_empty() {
            return Ok(());
        }
        missing.sort_by_key(|name| raw_position(name));
        Err(PipelineError::MissingColumns(missing))
    }

    /// Engineer, route, preprocess and boost on the raw table
    pub fn fit(self, df: &DataFrame) -> Result<FittedPipeline> {
        let start = Instant::now();
        self.validate_schema(df)?;

        let label = self.config.label_column.as_str();
        let y = extract_label(df, label)?;

        let engineer = self.engineer();
        let engineered = engineer.transform(df)?;
        let columns = column_names(&engineered);

        let router = ColumnRouter::new(&self.config.categorical_columns, &self.config.ordinal_columns);
        let partition = router.route(&columns, label);
        if !partition.is_complete(&columns, label) {
            return Err(PipelineError::DataError(format!(
                "column partition does not cover the engineered table: {:?}",
                partition
            )));
        }
        debug!(
            numeric = partition.numeric.len(),
            categorical = partition.categorical.len(),
            "Routed engineered columns"
        );

        let mut preprocessor = Preprocessor::with_handle_unknown(self.config.handle_unknown);
        let x = preprocessor.fit_transform(&engineered, &partition)?;

        let mut model = AdaBoostClassifier::new(self.config.model.clone());
        model.fit(&x, &y)?;

        info!(
            rows = x.nrows(),
            features = x.ncols(),
            estimators = model.n_estimators_fitted(),
            elapsed_secs = start.elapsed().as_secs_f64(),
            "Fitted attrition pipeline"
        );

        Ok(FittedPipeline {
            engineer,
            preprocessor,
            model,
        })
    }
}

/// Fitted feature engineer, preprocessor and classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedPipeline {
    engineer: FeatureEngineer,
    preprocessor: Preprocessor,
    model: AdaBoostClassifier,
}

impl FittedPipeline {
    /// Report every raw column the fitted pipeline reads but `df` lacks, in
    /// file order. The label column is not required.
    pub fn validate_input(&self, df: &DataFrame) -> Result<()> {
        let mut missing = self.engineer.missing_inputs(df);

        if let Some(partition) = self.preprocessor.partition() {
            let routed = partition.numeric.iter().chain(partition.categorical.iter());
            for name in routed {
                let engineered = DERIVED_COLUMNS.contains(&name.as_str())
                    || ENGINEERED_CATEGORICALS.contains(&name.as_str());
                if engineered || has_column(df, name) || missing.contains(name) {
                    continue;
                }
                missing.push(name.clone());
            }
        }

        if missing.is_empty() {
            return Ok(());
        }
        missing.sort_by_key(|name| raw_position(name));
        Err(PipelineError::MissingColumns(missing))
    }

    /// Raw table to model matrix using the frozen statistics
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        self.validate_input(df)?;
        let engineered = self.engineer.transform(df)?;
        self.preprocessor.transform(&engineered)
    }

    /// Predicted label (1 = leaves, 0 = stays) per raw row
    pub fn predict(&self, df: &DataFrame) -> Result<Array1<f64>> {
        let x = self.transform(df)?;
        self.model.predict(&x)
    }

    /// Class probabilities, one column per class in ascending label order
    pub fn predict_proba(&self, df: &DataFrame) -> Result<Array2<f64>> {
        let x = self.transform(df)?;
        self.model.predict_proba(&x)
    }

    /// Accuracy against the table's own label column
    pub fn score(&self, df: &DataFrame) -> Result<f64> {
        let y = extract_label(df, self.engineer.label_column())?;
        let x = self.transform(df)?;
        self.model.score(&x, &y)
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.preprocessor.feature_names()
    }

    pub fn partition(&self) -> Option<&ColumnPartition> {
        self.preprocessor.partition()
    }

    pub fn engineer(&self) -> &FeatureEngineer {
        &self.engineer
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn model(&self) -> &AdaBoostClassifier {
        &self.model
    }
}

/// Outcome of [`run_training`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub n_rows: usize,
    pub n_features: usize,
    pub n_estimators: usize,
    pub output_path: PathBuf,
    pub elapsed_secs: f64,
}

/// Load the raw table, fit the pipeline and write the artifact
pub fn run_training(config: &PipelineConfig) -> Result<TrainingSummary> {
    let start = Instant::now();
    config.validate()?;

    let df = DataLoader::new()
        .with_delimiter(config.delimiter_byte()?)
        .load_auto(&config.input_path)?;
    info!(rows = df.height(), cols = df.width(), path = %config.input_path.display(), "Loaded raw table");

    let fitted = AttritionPipeline::new(config.clone()).fit(&df)?;
    save_pipeline(&fitted, &config.output_path)?;
    info!(path = %config.output_path.display(), "Wrote pipeline artifact");

    Ok(TrainingSummary {
        n_rows: df.height(),
        n_features: fitted.preprocessor.n_output_features(),
        n_estimators: fitted.model.n_estimators_fitted(),
        output_path: config.output_path.clone(),
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}
