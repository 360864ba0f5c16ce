//! Standard scaling with statistics frozen at fit time

use crate::error::{PipelineError, Result};
use crate::utils::numeric_values;
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Parameters for one fitted column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ScalerParams {
    center: f64, // mean
    scale: f64,  // population std, 1.0 when zero
}

/// Z-score scaler: `(x - mean) / std`.
///
/// Missing values are ignored when fitting and come out as NaN. Infinite
/// values are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    params: Vec<(String, ScalerParams)>,
    is_fitted: bool,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    pub fn new() -> Self {
        Self {
            params: Vec::new(),
            is_fitted: false,
        }
    }

    /// Fit on the given columns; refitting discards earlier statistics
    pub fn fit<S: AsRef<str>>(&mut self, df: &DataFrame, columns: &[S]) -> Result<&mut Self> {
        let params = columns
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let values = finite_values(df, name)?;
                Ok((name.to_string(), compute_params(&values)))
            })
            .collect::<Result<Vec<_>>>()?;

        self.params = params;
        self.is_fitted = true;
        Ok(self)
    }

    /// Scale the fitted columns into an `n_rows x n_columns` block
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(PipelineError::ModelNotFitted);
        }

        let mut out = Array2::zeros((df.height(), self.params.len()));
        for (j, (name, params)) in self.params.iter().enumerate() {
            let values = finite_values(df, name)?;
            for (i, v) in values.into_iter().enumerate() {
                out[[i, j]] = v.map_or(f64::NAN, |x| (x - params.center) / params.scale);
            }
        }
        Ok(out)
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, df: &DataFrame, columns: &[S]) -> Result<Array2<f64>> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Column names in output order
    pub fn columns(&self) -> Vec<String> {
        self.params.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Fitted `(mean, scale)` for a column
    pub fn params(&self, column: &str) -> Option<(f64, f64)> {
        self.params
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, p)| (p.center, p.scale))
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}

/// Column values with NaN folded into missing; infinities are an error
fn finite_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    numeric_values(df, name)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| match v {
            Some(x) if x.is_infinite() => Err(PipelineError::NonFiniteValue {
                column: name.to_string(),
                row,
            }),
            Some(x) if x.is_nan() => Ok(None),
            other => Ok(other),
        })
        .collect()
}

fn compute_params(values: &[Option<f64>]) -> ScalerParams {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return ScalerParams { center: 0.0, scale: 1.0 };
    }

    let n = present.len() as f64;
    let mean = present.iter().sum::<f64>() / n;
    let var = present.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();

    ScalerParams {
        center: mean,
        scale: if std == 0.0 { 1.0 } else { std },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scaler_zero_mean_unit_variance() {
        let df = df!("a" => &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        let mut scaler = StandardScaler::new();
        let out = scaler.fit_transform(&df, &["a"]).unwrap();

        let col = out.column(0);
        let mean = col.sum() / 5.0;
        let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 5.0;
        assert!(mean.abs() < 1e-10);
        assert!((var - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_constant_column_scale_is_one() {
        let df = df!("c" => &[5i64, 5, 5]).unwrap();
        let mut scaler = StandardScaler::new();
        let out = scaler.fit_transform(&df, &["c"]).unwrap();
        assert_eq!(scaler.params("c"), Some((5.0, 1.0)));
        assert!(out.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_missing_values_ignored_and_passed_through() {
        let df = df!("a" => &[Some(1.0), None, Some(3.0)]).unwrap();
        let mut scaler = StandardScaler::new();
        let out = scaler.fit_transform(&df, &["a"]).unwrap();
        assert_eq!(scaler.params("a"), Some((2.0, 1.0)));
        assert!(out[[1, 0]].is_nan());
    }

    #[test]
    fn test_infinite_value_rejected() {
        let df = df!("r" => &[0.5, f64::INFINITY]).unwrap();
        let err = StandardScaler::new().fit(&df, &["r"]).unwrap_err();
        assert!(matches!(err, PipelineError::NonFiniteValue { row: 1, .. }));
    }

    #[test]
    fn test_statistics_frozen_after_fit() {
        let train = df!("a" => &[0.0, 10.0]).unwrap();
        let other = df!("a" => &[100.0, 200.0]).unwrap();

        let mut scaler = StandardScaler::new();
        scaler.fit(&train, &["a"]).unwrap();
        let out = scaler.transform(&other).unwrap();

        assert_eq!(out[[0, 0]], (100.0 - 5.0) / 5.0);
        assert_eq!(scaler.params("a"), Some((5.0, 5.0)));
    }

    #[test]
    fn test_transform_before_fit() {
        let df = df!("a" => &[1.0]).unwrap();
        assert!(matches!(
            StandardScaler::new().transform(&df),
            Err(PipelineError::ModelNotFitted)
        ));
    }
}
