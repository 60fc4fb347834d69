//! Outlier row removal for numeric columns.

use polars::prelude::*;
use tracing::debug;

use crate::config::OutlierMethod;
use crate::error::CleaningError;
use crate::pipeline::CleaningStep;
use crate::utils::{is_numeric, mean_std, numeric_values, quantile_sorted};

/// Drop every row holding an outlier in any numeric column.
///
/// Nulls never count as outliers. A constant column produces no outliers
/// under either method. Errors name the column under inspection.
pub(crate) fn remove_outliers(
    df: &mut DataFrame,
    method: OutlierMethod,
    threshold: f64,
    changes: &mut Vec<String>,
) -> Result<(), CleaningError> {
    let height = df.height();
    let mut keep = vec![true; height];
    let mut flagged: Vec<String> = Vec::new();

    for column in df.get_columns() {
        let series = column.as_materialized_series();
        if !is_numeric(series.dtype()) {
            continue;
        }
        let values = numeric_values(series).map_err(|e| {
            CleaningError::new(CleaningStep::Outliers, series.name().as_str(), e.to_string())
        })?;
        let non_null: Vec<f64> = values.iter().copied().flatten().collect();
        if non_null.is_empty() {
            continue;
        }

        let mut hit = false;
        match method {
            OutlierMethod::Iqr => {
                let mut sorted = non_null;
                sorted.sort_by(|a, b| a.total_cmp(b));
                let (q1, q3) = match (
                    quantile_sorted(&sorted, 0.25),
                    quantile_sorted(&sorted, 0.75),
                ) {
                    (Some(q1), Some(q3)) => (q1, q3),
                    _ => continue,
                };
                let iqr = q3 - q1;
                let lower = q1 - threshold * iqr;
                let upper = q3 + threshold * iqr;
                debug!(column = %series.name(), lower, upper, "IQR bounds");
                for (idx, value) in values.iter().enumerate() {
                    if let Some(v) = value {
                        if *v < lower || *v > upper {
                            keep[idx] = false;
                            hit = true;
                        }
                    }
                }
            }
            OutlierMethod::ZScore => {
                let (mean, std) = match mean_std(&non_null, 0) {
                    Some(pair) => pair,
                    None => continue,
                };
                if std == 0.0 {
                    continue;
                }
                for (idx, value) in values.iter().enumerate() {
                    if let Some(v) = value {
                        if ((v - mean) / std).abs() > threshold {
                            keep[idx] = false;
                            hit = true;
                        }
                    }
                }
            }
        }
        if hit {
            flagged.push(series.name().to_string());
        }
    }

    let removed = keep.iter().filter(|k| !**k).count();
    if removed > 0 {
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        *df = df.filter(&mask).map_err(|e| {
            CleaningError::new(CleaningStep::Outliers, flagged.join(", "), e.to_string())
        })?;
        let label = match method {
            OutlierMethod::Iqr => "IQR",
            OutlierMethod::ZScore => "Z-score",
        };
        changes.push(format!("Removed {removed} outlier rows using {label} method"));
    }
    Ok(())
}
