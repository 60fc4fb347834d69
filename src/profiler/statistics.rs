//! Numeric column summaries.

use anyhow::Result;
use polars::prelude::*;

use crate::types::NumericSummary;
use crate::utils::{is_numeric, mean_std, numeric_values, quantile_sorted};

/// Describe-style summary for a numeric series, `None` for other types
/// or when the column holds no non-null values.
///
/// Standard deviation uses one delta degree of freedom; quantiles use
/// linear interpolation.
pub(crate) fn numeric_summary(series: &Series) -> Result<Option<NumericSummary>> {
    if !is_numeric(series.dtype()) {
        return Ok(None);
    }

    let mut values: Vec<f64> = numeric_values(series)?.into_iter().flatten().collect();
    if values.is_empty() {
        return Ok(None);
    }
    values.sort_by(|a, b| a.total_cmp(b));

    let (mean, std) = match mean_std(&values, 1) {
        Some(pair) => pair,
        // single value, no spread to estimate
        None => (values[0], 0.0),
    };
    let min = values[0];
    let max = values[values.len() - 1];
    let q1 = quantile_sorted(&values, 0.25).unwrap_or(min);
    let median = quantile_sorted(&values, 0.5).unwrap_or(min);
    let q3 = quantile_sorted(&values, 0.75).unwrap_or(max);

    Ok(Some(NumericSummary {
        column: series.name().to_string(),
        mean,
        std,
        min,
        q1,
        median,
        q3,
        max,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_five_numbers() {
        let series = Series::new("v".into(), &[10.0f64, 12.0, 11.0, 1000.0]);
        let summary = numeric_summary(&series).unwrap().unwrap();
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.q1, 10.75);
        assert_eq!(summary.median, 11.5);
        assert_eq!(summary.q3, 259.0);
        assert_eq!(summary.max, 1000.0);
        assert_eq!(summary.mean, 258.25);
    }

    #[test]
    fn test_summary_skips_nulls() {
        let series = Series::new("v".into(), &[Some(1i64), None, Some(3)]);
        let summary = numeric_summary(&series).unwrap().unwrap();
        assert_eq!(summary.mean, 2.0);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 3.0);
    }

    #[test]
    fn test_summary_none_for_text() {
        let series = Series::new("v".into(), &["a", "b"]);
        assert!(numeric_summary(&series).unwrap().is_none());
    }

    #[test]
    fn test_summary_none_for_all_null() {
        let series = Series::new("v".into(), &[None::<i64>, None]);
        assert!(numeric_summary(&series).unwrap().is_none());
    }

    #[test]
    fn test_summary_single_value() {
        let series = Series::new("v".into(), &[7.0f64]);
        let summary = numeric_summary(&series).unwrap().unwrap();
        assert_eq!(summary.std, 0.0);
        assert_eq!(summary.q1, 7.0);
    }
}
