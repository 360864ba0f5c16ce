//! Pipeline configuration

use crate::error::{PipelineError, Result};
use crate::feature_engineering::{
    RatePolicy, DEFAULT_CATEGORICAL_COLUMNS, DEFAULT_ORDINAL_COLUMNS, LABEL_COLUMN,
};
use crate::preprocessing::HandleUnknown;
use crate::training::AdaBoostConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_PATH: &str = "WA_Fn-UseC_-HR-Employee-Attrition.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "adaboost_pipeline.bin";

/// Everything a training run needs. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw employee table
    pub input_path: PathBuf,

    /// Where the fitted pipeline is written
    pub output_path: PathBuf,

    /// Field separator of the input file; must be a single ASCII character
    pub delimiter: char,

    pub label_column: String,

    /// Nominal columns routed to the one-hot branch
    pub categorical_columns: Vec<String>,

    /// Ordinal label columns, also one-hot encoded
    pub ordinal_columns: Vec<String>,

    /// Treatment of a zero `MonthlyRate` in the rate ratios
    pub rate_policy: RatePolicy,

    /// Categories not seen during fit
    pub handle_unknown: HandleUnknown,

    pub model: AdaBoostConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            delimiter: ',',
            label_column: LABEL_COLUMN.to_string(),
            categorical_columns: DEFAULT_CATEGORICAL_COLUMNS.iter().map(|s| s.to_string()).collect(),
            ordinal_columns: DEFAULT_ORDINAL_COLUMNS.iter().map(|s| s.to_string()).collect(),
            rate_policy: RatePolicy::default(),
            handle_unknown: HandleUnknown::default(),
            model: AdaBoostConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON config file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(PipelineError::MissingFile(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| PipelineError::ConfigError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_label_column(mut self, label: impl Into<String>) -> Self {
        self.label_column = label.into();
        self
    }

    pub fn with_rate_policy(mut self, policy: RatePolicy) -> Self {
        self.rate_policy = policy;
        self
    }

    pub fn with_handle_unknown(mut self, handle_unknown: HandleUnknown) -> Self {
        self.handle_unknown = handle_unknown;
        self
    }

    pub fn with_model(mut self, model: AdaBoostConfig) -> Self {
        self.model = model;
        self
    }

    /// Delimiter as the byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(PipelineError::ConfigError(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )))
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;
        if self.label_column.is_empty() {
            return Err(PipelineError::ConfigError("label_column must not be empty".to_string()));
        }
        if self.model.n_estimators == 0 {
            return Err(PipelineError::ConfigError("model.n_estimators must be > 0".to_string()));
        }
        if self.model.learning_rate.is_nan() || self.model.learning_rate <= 0.0 {
            return Err(PipelineError::ConfigError(format!(
                "model.learning_rate must be > 0, got {}",
                self.model.learning_rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_cli_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.input_path, PathBuf::from("WA_Fn-UseC_-HR-Employee-Attrition.csv"));
        assert_eq!(config.output_path, PathBuf::from("adaboost_pipeline.bin"));
        assert_eq!(config.delimiter_byte().unwrap(), b',');
        assert_eq!(config.categorical_columns.len(), 9);
        assert_eq!(config.ordinal_columns.len(), 6);
        assert_eq!(config.rate_policy, RatePolicy::Unguarded);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"output_path": "model.bin", "rate_policy": {{"Impute": 0.0}}, "model": {{"n_estimators": 5}}}}"#
        )
        .unwrap();

        let config = PipelineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.output_path, PathBuf::from("model.bin"));
        assert_eq!(config.rate_policy, RatePolicy::Impute(0.0));
        assert_eq!(config.model.n_estimators, 5);
        assert_eq!(config.model.learning_rate, 1.0);
        assert_eq!(config.label_column, "Attrition");
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(
            PipelineConfig::from_json_file(file.path()),
            Err(PipelineError::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_config_file() {
        assert!(matches!(
            PipelineConfig::from_json_file(Path::new("/nonexistent/config.json")),
            Err(PipelineError::MissingFile(_))
        ));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let config = PipelineConfig::default().with_delimiter('§');
        assert!(matches!(config.validate(), Err(PipelineError::ConfigError(_))));
    }
}
