//! One-hot encoding of categorical columns

use crate::error::{PipelineError, Result};
use crate::utils::string_values;
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Suffix used for the indicator of a missing value
pub const MISSING_CATEGORY: &str = "nan";

/// What to do with a category not seen during fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandleUnknown {
    /// Emit an all-zero indicator block
    #[default]
    Ignore,
    /// Fail the transform
    Error,
}

/// Categories learned for one column. Sorted, with missing (`None`) last
/// when it occurred in the training data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ColumnCategories {
    column: String,
    categories: Vec<Option<String>>,
}

impl ColumnCategories {
    fn position(&self, value: &Option<String>) -> Option<usize> {
        self.categories.iter().position(|c| c == value)
    }
}

/// One-hot encoder: one indicator column per observed category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    handle_unknown: HandleUnknown,
    columns: Vec<ColumnCategories>,
    is_fitted: bool,
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::new(HandleUnknown::Ignore)
    }
}

impl OneHotEncoder {
    pub fn new(handle_unknown: HandleUnknown) -> Self {
        Self {
            handle_unknown,
            columns: Vec::new(),
            is_fitted: false,
        }
    }

    /// Learn the categories of each column
    pub fn fit<S: AsRef<str>>(&mut self, df: &DataFrame, columns: &[S]) -> Result<&mut Self> {
        let learned = columns
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let values = string_values(df, name)?;
                let seen_missing = values.iter().any(Option::is_none);
                let distinct: BTreeSet<String> = values.into_iter().flatten().collect();

                let mut categories: Vec<Option<String>> = distinct.into_iter().map(Some).collect();
                if seen_missing {
                    categories.push(None);
                }
                Ok(ColumnCategories {
                    column: name.to_string(),
                    categories,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.columns = learned;
        self.is_fitted = true;
        Ok(self)
    }

    /// Encode into an `n_rows x n_output_features` block of 0/1 values
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(PipelineError::ModelNotFitted);
        }

        let mut out = Array2::zeros((df.height(), self.n_output_features()));
        let mut offset = 0;
        for col in &self.columns {
            let values = string_values(df, &col.column)?;
            for (i, value) in values.iter().enumerate() {
                match col.position(value) {
                    Some(k) => out[[i, offset + k]] = 1.0,
                    None if self.handle_unknown == HandleUnknown::Error => {
                        return Err(PipelineError::DataError(format!(
                            "Unknown category {:?} in column {} at row {}",
                            value, col.column, i
                        )));
                    }
                    None => {}
                }
            }
            offset += col.categories.len();
        }
        Ok(out)
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, df: &DataFrame, columns: &[S]) -> Result<Array2<f64>> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Width of the encoded block
    pub fn n_output_features(&self) -> usize {
        self.columns.iter().map(|c| c.categories.len()).sum()
    }

    /// `<column>_<category>` for every indicator, in output order
    pub fn feature_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .flat_map(|col| {
                col.categories.iter().map(move |c| {
                    format!("{}_{}", col.column, c.as_deref().unwrap_or(MISSING_CATEGORY))
                })
            })
            .collect()
    }

    /// Learned categories of a column, missing rendered as `None`
    pub fn categories(&self, column: &str) -> Option<&[Option<String>]> {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.categories.as_slice())
    }
}
