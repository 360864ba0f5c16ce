//! Utility functions and types

pub mod data_loader;

pub use data_loader::DataLoader;

use crate::error::{PipelineError, Result};
use polars::prelude::*;

/// Whether the frame has a column with this exact name
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// Column names in table order
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|c| c.to_string()).collect()
}

/// Whether a dtype is a primitive integer or float
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Read a numeric column as `f64` values, missing entries as `None`.
///
/// Errors with [`PipelineError::FeatureNotFound`] when absent and
/// [`PipelineError::TypeMismatch`] when the column is not numeric.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .map_err(|_| PipelineError::FeatureNotFound(name.to_string()))?;
    let series = column.as_materialized_series();

    if !is_numeric_dtype(series.dtype()) {
        return Err(PipelineError::TypeMismatch {
            column: name.to_string(),
            expected: "numeric".to_string(),
            actual: series.dtype().to_string(),
        });
    }

    let casted = series.cast(&DataType::Float64)?;
    let values = casted.f64()?.into_iter().collect();
    Ok(values)
}

/// Read a column as strings. Non-string columns are cast, so integer codes
/// routed to a categorical encoder still work.
pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| PipelineError::FeatureNotFound(name.to_string()))?;
    let series = column.as_materialized_series();

    let casted = if series.dtype() == &DataType::String {
        series.clone()
    } else {
        series.cast(&DataType::String)?
    };

    let values = casted
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect();
    Ok(values)
}
