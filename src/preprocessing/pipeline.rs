//! Column-wise preprocessing: scaled numeric block next to a one-hot block

use super::{
    encoder::{HandleUnknown, OneHotEncoder},
    router::ColumnPartition,
    scaler::StandardScaler,
};
use crate::error::{PipelineError, Result};
use ndarray::{concatenate, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Applies [`StandardScaler`] to the numeric columns and [`OneHotEncoder`]
/// to the categorical ones, then stacks the results horizontally.
///
/// Columns outside the partition are dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    partition: Option<ColumnPartition>,
    scaler: StandardScaler,
    encoder: OneHotEncoder,
    is_fitted: bool,
    /// Timing: seconds spent in last fit call
    fit_time: Option<f64>,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::with_handle_unknown(HandleUnknown::Ignore)
    }

    pub fn with_handle_unknown(handle_unknown: HandleUnknown) -> Self {
        Self {
            partition: None,
            scaler: StandardScaler::new(),
            encoder: OneHotEncoder::new(handle_unknown),
            is_fitted: false,
            fit_time: None,
        }
    }

    /// Learn scaling statistics and category sets from the training table
    pub fn fit(&mut self, df: &DataFrame, partition: &ColumnPartition) -> Result<&mut Self> {
        let start = Instant::now();

        self.scaler.fit(df, &partition.numeric)?;
        self.encoder.fit(df, &partition.categorical)?;
        self.partition = Some(partition.clone());
        self.is_fitted = true;

        let elapsed = start.elapsed().as_secs_f64();
        self.fit_time = Some(elapsed);
        debug!(
            numeric = partition.numeric.len(),
            categorical = partition.categorical.len(),
            output_features = self.n_output_features(),
            elapsed_secs = elapsed,
            "Fitted preprocessor"
        );
        Ok(self)
    }

    /// Build the model matrix with the frozen statistics
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(PipelineError::ModelNotFitted);
        }

        let numeric = self.scaler.transform(df)?;
        let categorical = self.encoder.transform(df)?;
        let matrix = concatenate(Axis(1), &[numeric.view(), categorical.view()])?;
        Ok(matrix)
    }

    pub fn fit_transform(&mut self, df: &DataFrame, partition: &ColumnPartition) -> Result<Array2<f64>> {
        self.fit(df, partition)?;
        self.transform(df)
    }

    /// Output column names: numeric names, then `<column>_<category>`
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self.scaler.columns();
        names.extend(self.encoder.feature_names());
        names
    }

    pub fn n_output_features(&self) -> usize {
        self.scaler.columns().len() + self.encoder.n_output_features()
    }

    pub fn partition(&self) -> Option<&ColumnPartition> {
        self.partition.as_ref()
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    pub fn fit_time(&self) -> Option<f64> {
        self.fit_time
    }
}
