//! Cleaning run configuration.
//!
//! A [`CleaningConfig`] selects which pipeline steps run and with what
//! parameters. Defaults mirror a conservative interactive session:
//! deduplication on, mean imputation on, everything else off.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Strategy for filling missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingStrategy {
    Mean,
    Median,
    Mode,
    Constant,
}

/// Outlier detection method for numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    Iqr,
    ZScore,
}

/// Categorical encoding applied to text columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    OneHot,
    Label,
}

/// Numeric scaling applied after imputation and outlier removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scaling {
    MinMax,
    Standard,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigValidationError {
    #[error("Outlier threshold must be positive, got {0}")]
    NonPositiveThreshold(f64),

    #[error("Constant fill strategy requires a fill value")]
    MissingFillValue,
}

/// Configuration for a single cleaning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Normalize column names (trim, lowercase, underscores).
    pub normalize_columns: bool,
    /// Columns to parse as dates. Empty means the step is skipped.
    pub parse_dates: Vec<String>,
    /// Missing value strategy. `None` leaves nulls in place.
    pub missing_strategy: Option<MissingStrategy>,
    /// Fill value used by [`MissingStrategy::Constant`].
    pub fill_value: Option<String>,
    /// Outlier removal method. `None` skips the step.
    pub outlier_method: Option<OutlierMethod>,
    /// IQR multiplier or z-score cutoff, depending on the method.
    pub outlier_threshold: f64,
    /// Remove duplicate rows, keeping the first occurrence.
    pub dedupe: bool,
    /// Categorical encoding. `None` skips the step.
    pub encoding: Option<Encoding>,
    /// Numeric scaling. `None` skips the step.
    pub scaling: Option<Scaling>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            normalize_columns: false,
            parse_dates: Vec::new(),
            missing_strategy: Some(MissingStrategy::Mean),
            fill_value: None,
            outlier_method: None,
            outlier_threshold: 1.5,
            dedupe: true,
            encoding: None,
            scaling: None,
        }
    }
}

impl CleaningConfig {
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Check parameter consistency before a run.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.outlier_method.is_some() && self.outlier_threshold <= 0.0 {
            return Err(ConfigValidationError::NonPositiveThreshold(
                self.outlier_threshold,
            ));
        }
        if self.missing_strategy == Some(MissingStrategy::Constant)
            && self.fill_value.is_none()
        {
            return Err(ConfigValidationError::MissingFillValue);
        }
        Ok(())
    }
}

/// Builder for [`CleaningConfig`].
#[derive(Debug, Clone, Default)]
pub struct CleaningConfigBuilder {
    config: Option<CleaningConfig>,
}

impl CleaningConfigBuilder {
    fn config_mut(&mut self) -> &mut CleaningConfig {
        self.config.get_or_insert_with(CleaningConfig::default)
    }

    pub fn normalize_columns(mut self, enabled: bool) -> Self {
        self.config_mut().normalize_columns = enabled;
        self
    }

    pub fn parse_dates(mut self, columns: Vec<String>) -> Self {
        self.config_mut().parse_dates = columns;
        self
    }

    pub fn missing_strategy(mut self, strategy: Option<MissingStrategy>) -> Self {
        self.config_mut().missing_strategy = strategy;
        self
    }

    pub fn fill_value(mut self, value: impl Into<String>) -> Self {
        self.config_mut().fill_value = Some(value.into());
        self
    }

    pub fn outlier_method(mut self, method: Option<OutlierMethod>) -> Self {
        self.config_mut().outlier_method = method;
        self
    }

    pub fn outlier_threshold(mut self, threshold: f64) -> Self {
        self.config_mut().outlier_threshold = threshold;
        self
    }

    pub fn dedupe(mut self, enabled: bool) -> Self {
        self.config_mut().dedupe = enabled;
        self
    }

    pub fn encoding(mut self, encoding: Option<Encoding>) -> Self {
        self.config_mut().encoding = encoding;
        self
    }

    pub fn scaling(mut self, scaling: Option<Scaling>) -> Self {
        self.config_mut().scaling = scaling;
        self
    }

    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }
}
