//! Statistical imputation methods.
//!
//! Mean, median, mode, and constant strategies. Mean and median apply to
//! numeric columns and widen them to Float64; mode also covers text.
//! Columns without nulls are left untouched and produce no log line.

use polars::prelude::*;
use tracing::warn;

use crate::config::MissingStrategy;
use crate::error::CleaningError;
use crate::pipeline::CleaningStep;
use crate::utils::{
    fill_numeric_nulls, fill_string_nulls, is_numeric, numeric_mode, numeric_values,
    string_mode,
};

/// Statistical imputation over whole tables.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill missing values in every applicable column.
    ///
    /// Appends one change line per filled column, phrased for end users.
    /// Errors name the column that was being filled when they occurred.
    pub fn apply(
        df: &mut DataFrame,
        strategy: MissingStrategy,
        fill_value: Option<&str>,
        changes: &mut Vec<String>,
    ) -> Result<(), CleaningError> {
        let col_names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();

        for col_name in col_names {
            let wrap =
                |e: PolarsError| CleaningError::new(CleaningStep::Impute, &col_name, e.to_string());
            let null_count = df.column(&col_name).map_err(wrap)?.null_count();
            if null_count == 0 {
                continue;
            }
            match strategy {
                MissingStrategy::Mean => {
                    Self::fill_numeric_with(df, &col_name, null_count, "Mean", changes, |v| {
                        let n = v.len();
                        if n == 0 {
                            None
                        } else {
                            Some(v.iter().sum::<f64>() / n as f64)
                        }
                    })
                    .map_err(wrap)?;
                }
                MissingStrategy::Median => {
                    Self::fill_numeric_with(df, &col_name, null_count, "Median", changes, |v| {
                        let mut sorted = v.to_vec();
                        sorted.sort_by(|a, b| a.total_cmp(b));
                        crate::utils::quantile_sorted(&sorted, 0.5)
                    })
                    .map_err(wrap)?;
                }
                MissingStrategy::Mode => {
                    Self::fill_mode(df, &col_name, null_count, changes).map_err(wrap)?;
                }
                MissingStrategy::Constant => {
                    Self::fill_constant(df, &col_name, null_count, fill_value, changes)
                        .map_err(wrap)?;
                }
            }
        }
        Ok(())
    }

    fn fill_numeric_with(
        df: &mut DataFrame,
        col_name: &str,
        null_count: usize,
        label: &str,
        changes: &mut Vec<String>,
        statistic: impl Fn(&[f64]) -> Option<f64>,
    ) -> PolarsResult<()> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        if !is_numeric(series.dtype()) {
            return Ok(());
        }
        let values: Vec<f64> = numeric_values(&series)?.into_iter().flatten().collect();
        if let Some(fill) = statistic(&values) {
            let filled = fill_numeric_nulls(&series, fill)?;
            df.replace(col_name, filled)?;
            changes.push(format!(
                "Filled {null_count} missing values in '{col_name}' using {label}"
            ));
        }
        Ok(())
    }

    fn fill_mode(
        df: &mut DataFrame,
        col_name: &str,
        null_count: usize,
        changes: &mut Vec<String>,
    ) -> PolarsResult<()> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let filled = if is_numeric(series.dtype()) {
            let values: Vec<f64> = numeric_values(&series)?.into_iter().flatten().collect();
            match numeric_mode(&values) {
                Some(mode) => fill_numeric_nulls(&series, mode)?,
                None => return Ok(()),
            }
        } else if series.dtype() == &DataType::String {
            match string_mode(series.str()?) {
                Some(mode) => fill_string_nulls(&series, &mode)?,
                None => return Ok(()),
            }
        } else {
            return Ok(());
        };
        df.replace(col_name, filled)?;
        changes.push(format!(
            "Filled {null_count} missing values in '{col_name}' using Mode"
        ));
        Ok(())
    }

    fn fill_constant(
        df: &mut DataFrame,
        col_name: &str,
        null_count: usize,
        fill_value: Option<&str>,
        changes: &mut Vec<String>,
    ) -> PolarsResult<()> {
        let value = match fill_value {
            Some(v) => v,
            None => return Ok(()),
        };
        let series = df.column(col_name)?.as_materialized_series().clone();
        if is_numeric(series.dtype()) {
            match value.trim().parse::<f64>() {
                Ok(parsed) => {
                    let filled = fill_numeric_nulls(&series, parsed)?;
                    df.replace(col_name, filled)?;
                    changes.push(format!(
                        "Filled {null_count} missing values in '{col_name}' using Constant"
                    ));
                }
                Err(_) => {
                    warn!(column = col_name, value, "constant is not numeric, column skipped");
                    changes.push(format!(
                        "Skipped '{col_name}': constant '{value}' is not numeric"
                    ));
                }
            }
        } else if series.dtype() == &DataType::String {
            let filled = fill_string_nulls(&series, value)?;
            df.replace(col_name, filled)?;
            changes.push(format!(
                "Filled {null_count} missing values in '{col_name}' using Constant"
            ));
        }
        Ok(())
    }
}
