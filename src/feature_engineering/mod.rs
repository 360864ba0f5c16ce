//! Feature engineering for raw HR records
//!
//! Turns a raw employee table into the engineered table consumed by the
//! preprocessor:
//! - Attrition label coded as 1/0
//! - Ordinal satisfaction codes replaced by labels
//! - Nine derived income/tenure ratios
//! - Age and commute-distance groups
//! - Constant and identifier columns dropped

mod engineer;
pub mod schema;

pub use engineer::{extract_label, FeatureEngineer, RatePolicy};
pub use schema::{
    DEFAULT_CATEGORICAL_COLUMNS, DEFAULT_ORDINAL_COLUMNS, DERIVED_COLUMNS, LABEL_COLUMN, RAW_COLUMNS,
};
