//! Attrition feature engineering: label coding, ordinal labels, derived
//! ratios, age/distance bins and column pruning.

use super::schema::*;
use crate::error::{PipelineError, Result};
use crate::utils::{has_column, is_numeric_dtype, numeric_values, string_values};
use ndarray::Array1;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How the two rate ratios treat a zero `MonthlyRate`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum RatePolicy {
    /// Plain division: `x / 0` is infinite and `0 / 0` is missing
    #[default]
    Unguarded,
    /// Add the same 0.001 guard the tenure ratios use
    Epsilon,
    /// Replace non-finite results with a fixed value
    Impute(f64),
    /// Fail with [`PipelineError::NonFiniteValue`]
    Reject,
}

/// Stateless table-to-table transformation applied before preprocessing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureEngineer {
    label_column: String,
    rate_policy: RatePolicy,
}

impl Default for FeatureEngineer {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureEngineer {
    pub fn new() -> Self {
        Self {
            label_column: LABEL_COLUMN.to_string(),
            rate_policy: RatePolicy::default(),
        }
    }

    pub fn with_label_column(mut self, label: impl Into<String>) -> Self {
        self.label_column = label.into();
        self
    }

    pub fn with_rate_policy(mut self, policy: RatePolicy) -> Self {
        self.rate_policy = policy;
        self
    }

    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    pub fn rate_policy(&self) -> RatePolicy {
        self.rate_policy
    }

    /// Raw columns that [`transform`](Self::transform) reads but `df` lacks
    pub fn missing_inputs(&self, df: &DataFrame) -> Vec<String> {
        DERIVATION_INPUTS
            .iter()
            .filter(|name| !has_column(df, name))
            .map(|name| name.to_string())
            .collect()
    }

    /// Check every referenced raw column at once
    pub fn validate(&self, df: &DataFrame) -> Result<()> {
        let missing = self.missing_inputs(df);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::MissingColumns(missing))
        }
    }

    /// Return an engineered copy of `df`; the input is never modified
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut out = df.clone();

        if has_column(&out, &self.label_column) {
            let label = encode_label(&out, &self.label_column)?;
            out.with_column(Series::new(self.label_column.as_str().into(), label))?;
        }

        self.map_ordinals(&mut out)?;
        self.add_derived(&mut out)?;
        self.add_bins(&mut out)?;

        for name in DROP_COLUMNS {
            if has_column(&out, name) {
                out = out.drop(name)?;
            }
        }

        debug!(
            rows = out.height(),
            cols_in = df.width(),
            cols_out = out.width(),
            "Engineered features"
        );
        Ok(out)
    }

    fn map_ordinals(&self, out: &mut DataFrame) -> Result<()> {
        for (name, labels) in ORDINAL_MAPPINGS.iter() {
            if !has_column(out, name) {
                continue;
            }
            // Already labelled on an earlier pass
            if out.column(name)?.dtype() == &DataType::String {
                continue;
            }
            let mapped: Vec<Option<&str>> = numeric_values(out, name)?
                .into_iter()
                .map(|v| v.and_then(|code| ordinal_label(labels, code)))
                .collect();
            out.with_column(Series::new((*name).into(), mapped))?;
        }
        Ok(())
    }

    fn add_derived(&self, out: &mut DataFrame) -> Result<()> {
        let col = |name: &str| numeric_values(out, name);

        let monthly_income = col("MonthlyIncome")?;
        let daily_rate = col("DailyRate")?;
        let hourly_rate = col("HourlyRate")?;
        let monthly_rate = col("MonthlyRate")?;
        let total_years = col("TotalWorkingYears")?;
        let num_companies = col("NumCompaniesWorked")?;
        let since_promotion = col("YearsSinceLastPromotion")?;
        let at_company = col("YearsAtCompany")?;
        let in_role = col("YearsInCurrentRole")?;
        let job_level = col("JobLevel")?;
        let with_manager = col("YearsWithCurrManager")?;
        let trainings = col("TrainingTimesLastYear")?;

        let income_per_year: Vec<Option<f64>> =
            monthly_income.iter().map(|v| v.map(|m| m * 12.0)).collect();

        let derived: [(&str, Vec<Option<f64>>); 9] = [
            ("IncomePerYear", income_per_year),
            (
                "DailyRateToMonthlyRateRatio",
                self.rate_ratio("DailyRateToMonthlyRateRatio", &daily_rate, &monthly_rate)?,
            ),
            (
                "HourlyRateToMonthlyRateRatio",
                self.rate_ratio("HourlyRateToMonthlyRateRatio", &hourly_rate, &monthly_rate)?,
            ),
            ("AvgYearsPerCompany", guarded_ratio(&total_years, &num_companies, 1.0)),
            ("PromotionRate", guarded_ratio(&since_promotion, &at_company, DENOMINATOR_EPSILON)),
            ("RoleStability", guarded_ratio(&in_role, &at_company, DENOMINATOR_EPSILON)),
            ("CareerGrowth", guarded_ratio(&job_level, &total_years, DENOMINATOR_EPSILON)),
            ("ManagerStability", guarded_ratio(&with_manager, &at_company, DENOMINATOR_EPSILON)),
            ("TrainingPerYear", guarded_ratio(&trainings, &at_company, DENOMINATOR_EPSILON)),
        ];

        for (name, values) in derived {
            out.with_column(Series::new(name.into(), values))?;
        }
        Ok(())
    }

    fn rate_ratio(
        &self,
        column: &str,
        numerator: &[Option<f64>],
        denominator: &[Option<f64>],
    ) -> Result<Vec<Option<f64>>> {
        let mut non_finite = 0usize;
        let values = numerator
            .iter()
            .zip(denominator)
            .enumerate()
            .map(|(row, (n, d))| {
                let (Some(n), Some(d)) = (n, d) else {
                    return Ok(None);
                };
                let value = match self.rate_policy {
                    RatePolicy::Epsilon => n / (d + DENOMINATOR_EPSILON),
                    _ => n / d,
                };
                if value.is_finite() {
                    return Ok(Some(value));
                }
                non_finite += 1;
                match self.rate_policy {
                    RatePolicy::Unguarded | RatePolicy::Epsilon => Ok(nan_to_missing(value)),
                    RatePolicy::Impute(fill) => Ok(Some(fill)),
                    RatePolicy::Reject => Err(PipelineError::NonFiniteValue {
                        column: column.to_string(),
                        row,
                    }),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        if non_finite > 0 {
            warn!(
                column,
                rows = non_finite,
                policy = ?self.rate_policy,
                "Zero divisor in rate ratio"
            );
        }
        Ok(values)
    }

    fn add_bins(&self, out: &mut DataFrame) -> Result<()> {
        let age: Vec<Option<&str>> = numeric_values(out, "Age")?
            .into_iter()
            .map(|v| v.and_then(|a| bin_label(a, &AGE_BIN_EDGES, &AGE_BIN_LABELS)))
            .collect();
        let distance: Vec<Option<&str>> = numeric_values(out, "DistanceFromHome")?
            .into_iter()
            .map(|v| v.and_then(|d| bin_label(d, &DISTANCE_BIN_EDGES, &DISTANCE_BIN_LABELS)))
            .collect();

        out.with_column(Series::new(AGE_GROUP_COLUMN.into(), age))?;
        out.with_column(Series::new(DISTANCE_GROUP_COLUMN.into(), distance))?;
        Ok(())
    }
}

/// `numerator / (denominator + offset)`; a NaN result is stored as missing
fn guarded_ratio(numerator: &[Option<f64>], denominator: &[Option<f64>], offset: f64) -> Vec<Option<f64>> {
    numerator
        .iter()
        .zip(denominator)
        .map(|(n, d)| match (n, d) {
            (Some(n), Some(d)) => nan_to_missing(n / (d + offset)),
            _ => None,
        })
        .collect()
}

fn nan_to_missing(value: f64) -> Option<f64> {
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

/// 1 for the positive label, 0 for anything else including missing.
///
/// A column that is already integer-coded keeps 1 and maps the rest to 0.
fn encode_label(df: &DataFrame, label: &str) -> Result<Vec<i64>> {
    let dtype = df
        .column(label)
        .map_err(|_| PipelineError::FeatureNotFound(label.to_string()))?
        .dtype()
        .clone();

    let coded = if is_numeric_dtype(&dtype) {
        numeric_values(df, label)?
            .into_iter()
            .map(|v| i64::from(v == Some(1.0)))
            .collect()
    } else {
        string_values(df, label)?
            .into_iter()
            .map(|v| i64::from(v.as_deref() == Some(POSITIVE_LABEL)))
            .collect()
    };
    Ok(coded)
}

/// Binary target taken from the raw table before engineering
pub fn extract_label(df: &DataFrame, label: &str) -> Result<Array1<f64>> {
    let coded = encode_label(df, label)?;
    Ok(coded.into_iter().map(|v| v as f64).collect())
}
