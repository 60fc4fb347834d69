//! The cleaning pipeline.
//!
//! Runs the configured steps in a fixed order over a copy of the input
//! table and reports every applied change. Step order never varies:
//! name normalization, date parsing, imputation, outlier removal,
//! deduplication, encoding, scaling.

mod dates;
mod encoding;
mod names;
mod outliers;
mod scaling;

use polars::prelude::*;
use serde::Serialize;
use static_assertions::assert_impl_all;
use tracing::info;

use crate::config::CleaningConfig;
use crate::error::{CleaningError, CleaningFailure};
use crate::imputers::StatisticalImputer;
use crate::types::CleanedTable;

/// Identifies a pipeline step in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStep {
    NormalizeNames,
    ParseDates,
    Impute,
    Outliers,
    Dedupe,
    Encode,
    Scale,
}

impl std::fmt::Display for CleaningStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NormalizeNames => "normalize_names",
            Self::ParseDates => "parse_dates",
            Self::Impute => "impute",
            Self::Outliers => "outliers",
            Self::Dedupe => "dedupe",
            Self::Encode => "encode",
            Self::Scale => "scale",
        };
        write!(f, "{name}")
    }
}

/// Fixed-order cleaning pipeline.
pub struct CleaningPipeline;

assert_impl_all!(CleaningPipeline: Send, Sync);

impl CleaningPipeline {
    /// Run every enabled step over a copy of `df`.
    ///
    /// The input table is never modified. On failure the returned
    /// [`CleaningFailure`] carries the table as it stood when the step
    /// failed, together with the changes applied up to that point.
    pub fn clean(
        df: &DataFrame,
        config: &CleaningConfig,
    ) -> Result<CleanedTable, CleaningFailure> {
        let mut table = df.clone();
        let mut changes: Vec<String> = Vec::new();
        let original_shape = table.shape();
        let original_nulls: usize = table.get_columns().iter().map(|c| c.null_count()).sum();

        if let Err(e) = config.validate() {
            let step = match e {
                crate::config::ConfigValidationError::NonPositiveThreshold(_) => {
                    CleaningStep::Outliers
                }
                crate::config::ConfigValidationError::MissingFillValue => CleaningStep::Impute,
            };
            return Err(failure(
                CleaningError::new(step, "", e.to_string()),
                table,
                changes,
            ));
        }

        if config.normalize_columns {
            names::normalize_columns(&mut table, &mut changes).map_err(|e| {
                failure(
                    CleaningError::new(CleaningStep::NormalizeNames, "", e.to_string()),
                    table.clone(),
                    changes.clone(),
                )
            })?;
        }

        if !config.parse_dates.is_empty() {
            dates::parse_date_columns(&mut table, &config.parse_dates, &mut changes)
                .map_err(|e| failure(e, table.clone(), changes.clone()))?;
        }

        if let Some(strategy) = config.missing_strategy {
            StatisticalImputer::apply(
                &mut table,
                strategy,
                config.fill_value.as_deref(),
                &mut changes,
            )
            .map_err(|e| failure(e, table.clone(), changes.clone()))?;
        }

        if let Some(method) = config.outlier_method {
            outliers::remove_outliers(&mut table, method, config.outlier_threshold, &mut changes)
                .map_err(|e| failure(e, table.clone(), changes.clone()))?;
        }

        if config.dedupe {
            let before = table.height();
            table = table
                .unique_stable(None, UniqueKeepStrategy::First, None)
                .map_err(|e| {
                    failure(
                        CleaningError::new(CleaningStep::Dedupe, "", e.to_string()),
                        table.clone(),
                        changes.clone(),
                    )
                })?;
            let removed = before - table.height();
            if removed > 0 {
                changes.push(format!("Removed {removed} duplicate rows"));
            }
        }

        if let Some(encoding) = config.encoding {
            encoding::encode_text_columns(&mut table, encoding, &mut changes).map_err(|e| {
                failure(
                    CleaningError::new(CleaningStep::Encode, "", e.to_string()),
                    table.clone(),
                    changes.clone(),
                )
            })?;
        }

        if let Some(scaling) = config.scaling {
            scaling::scale_numeric_columns(&mut table, scaling, &mut changes)
                .map_err(|e| failure(e, table.clone(), changes.clone()))?;
        }

        if table.shape() != original_shape {
            changes.push(format!(
                "Dataset shape changed from ({}, {}) to ({}, {})",
                original_shape.0,
                original_shape.1,
                table.shape().0,
                table.shape().1
            ));
        }
        let remaining_nulls: usize = table.get_columns().iter().map(|c| c.null_count()).sum();
        if remaining_nulls < original_nulls {
            changes.push(format!(
                "Total missing values reduced from {original_nulls} to {remaining_nulls}"
            ));
        }

        info!(
            steps = changes.len(),
            rows = table.height(),
            columns = table.width(),
            "cleaning run finished"
        );

        Ok(CleanedTable { table, changes })
    }
}

fn failure(error: CleaningError, partial: DataFrame, changes: Vec<String>) -> CleaningFailure {
    CleaningFailure {
        error,
        partial,
        changes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MissingStrategy, Scaling};

    #[test]
    fn test_input_table_is_never_modified() {
        let df = df![
            "age" => [Some(25i64), None, Some(25)],
            "city" => ["NY", "LA", "LA"],
        ]
        .unwrap();
        let before = df.clone();

        let _ = CleaningPipeline::clean(&df, &CleaningConfig::default()).unwrap();

        assert!(df.equals_missing(&before));
    }

    #[test]
    fn test_default_run_imputes_then_dedupes() {
        let df = df![
            "age" => [Some(25i64), None, Some(25)],
            "city" => ["NY", "LA", "LA"],
        ]
        .unwrap();

        let cleaned = CleaningPipeline::clean(&df, &CleaningConfig::default()).unwrap();

        // mean imputation widens age to Float64, then the second and third
        // rows collide and dedupe keeps the first occurrence
        assert_eq!(cleaned.table.shape(), (2, 2));
        let ages: Vec<f64> = cleaned
            .table
            .column("age")
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        let cities: Vec<&str> = cleaned
            .table
            .column("city")
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(ages, vec![25.0, 25.0]);
        assert_eq!(cities, vec!["NY", "LA"]);

        assert_eq!(
            cleaned.changes,
            vec![
                "Filled 1 missing values in 'age' using Mean",
                "Removed 1 duplicate rows",
                "Dataset shape changed from (3, 2) to (2, 2)",
                "Total missing values reduced from 1 to 0",
            ]
        );
    }

    #[test]
    fn test_cleaning_is_idempotent_for_dedupe() {
        let df = df![
            "a" => [1i64, 1, 2],
        ]
        .unwrap();
        let config = CleaningConfig::builder()
            .missing_strategy(None)
            .build()
            .unwrap();

        let once = CleaningPipeline::clean(&df, &config).unwrap();
        let twice = CleaningPipeline::clean(&once.table, &config).unwrap();

        assert!(once.table.equals_missing(&twice.table));
        assert!(twice.changes.is_empty());
    }

    #[test]
    fn test_missing_reduction_reported_without_shape_change() {
        let df = df![
            "age" => [Some(10.0), None, Some(30.0)],
        ]
        .unwrap();
        let config = CleaningConfig::builder().dedupe(false).build().unwrap();

        let cleaned = CleaningPipeline::clean(&df, &config).unwrap();

        assert_eq!(
            cleaned.changes,
            vec![
                "Filled 1 missing values in 'age' using Mean",
                "Total missing values reduced from 1 to 0",
            ]
        );
    }

    #[test]
    fn test_failure_carries_partial_state_and_changes() {
        let df = df![
            "constant" => [Some(4.0), None, Some(4.0)],
        ]
        .unwrap();
        let config = CleaningConfig::builder()
            .dedupe(false)
            .scaling(Some(Scaling::Standard))
            .build()
            .unwrap();

        let failure = CleaningPipeline::clean(&df, &config).unwrap_err();

        assert_eq!(failure.error.step, CleaningStep::Scale);
        assert_eq!(failure.error.column, "constant");
        // imputation had already run when scaling failed
        assert_eq!(failure.partial.column("constant").unwrap().null_count(), 0);
        assert_eq!(
            failure.changes,
            vec!["Filled 1 missing values in 'constant' using Mean"]
        );
    }

    #[test]
    fn test_invalid_config_fails_before_any_step() {
        let df = df!["a" => [1i64]].unwrap();
        let config = CleaningConfig {
            missing_strategy: Some(MissingStrategy::Constant),
            fill_value: None,
            ..CleaningConfig::default()
        };

        let failure = CleaningPipeline::clean(&df, &config).unwrap_err();

        assert_eq!(failure.error.step, CleaningStep::Impute);
        assert!(failure.changes.is_empty());
        assert!(failure.partial.equals(&df));
    }

    #[test]
    fn test_everything_disabled_returns_copy() {
        let df = df![
            "a" => [Some(1i64), None, Some(1)],
        ]
        .unwrap();
        let config = CleaningConfig::builder()
            .missing_strategy(None)
            .dedupe(false)
            .build()
            .unwrap();

        let cleaned = CleaningPipeline::clean(&df, &config).unwrap();

        assert!(cleaned.table.equals_missing(&df));
        assert!(cleaned.changes.is_empty());
    }
}
