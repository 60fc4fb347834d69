//! Numeric scaling.

use polars::prelude::*;

use crate::config::Scaling;
use crate::error::CleaningError;
use crate::pipeline::CleaningStep;
use crate::utils::{is_numeric, mean_std, numeric_values};

/// Scale every numeric column, preserving null positions.
///
/// Min-max maps a constant column to all zeros; standard scaling instead
/// fails on zero variance since the transform is undefined there.
pub(crate) fn scale_numeric_columns(
    df: &mut DataFrame,
    scaling: Scaling,
    changes: &mut Vec<String>,
) -> Result<(), CleaningError> {
    let numeric_columns: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| is_numeric(c.dtype()))
        .map(|c| c.name().to_string())
        .collect();
    if numeric_columns.is_empty() {
        return Ok(());
    }

    let mut scaled_count = 0usize;
    for col_name in &numeric_columns {
        let series = df
            .column(col_name)
            .map_err(|e| CleaningError::new(CleaningStep::Scale, col_name, e.to_string()))?
            .as_materialized_series()
            .clone();
        let values = numeric_values(&series)
            .map_err(|e| CleaningError::new(CleaningStep::Scale, col_name, e.to_string()))?;
        let non_null: Vec<f64> = values.iter().copied().flatten().collect();
        if non_null.is_empty() {
            continue;
        }

        let scaled: Vec<Option<f64>> = match scaling {
            Scaling::MinMax => {
                let min = non_null.iter().copied().fold(f64::INFINITY, f64::min);
                let max = non_null.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let range = max - min;
                values
                    .iter()
                    .map(|v| {
                        v.map(|v| if range == 0.0 { 0.0 } else { (v - min) / range })
                    })
                    .collect()
            }
            Scaling::Standard => {
                let (mean, std) = match mean_std(&non_null, 0) {
                    Some(pair) => pair,
                    None => continue,
                };
                if std == 0.0 {
                    return Err(CleaningError::new(
                        CleaningStep::Scale,
                        col_name,
                        "column has zero variance",
                    ));
                }
                values.iter().map(|v| v.map(|v| (v - mean) / std)).collect()
            }
        };

        df.replace(col_name, Series::new(col_name.as_str().into(), scaled))
            .map_err(|e| CleaningError::new(CleaningStep::Scale, col_name, e.to_string()))?;
        scaled_count += 1;
    }

    if scaled_count > 0 {
        let label = match scaling {
            Scaling::MinMax => "Min-Max",
            Scaling::Standard => "Standard",
        };
        changes.push(format!(
            "Applied {label} scaling to {scaled_count} numeric columns"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minmax_maps_to_unit_interval() {
        let mut df = df![
            "v" => [10.0, 20.0, 30.0],
        ]
        .unwrap();
        let mut changes = Vec::new();

        scale_numeric_columns(&mut df, Scaling::MinMax, &mut changes).unwrap();

        let values: Vec<f64> = df
            .column("v")
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(values, vec![0.0, 0.5, 1.0]);
        assert_eq!(changes, vec!["Applied Min-Max scaling to 1 numeric columns"]);
    }

    #[test]
    fn test_minmax_constant_column_becomes_zero() {
        let mut df = df!["v" => [4.0, 4.0]].unwrap();
        let mut changes = Vec::new();

        scale_numeric_columns(&mut df, Scaling::MinMax, &mut changes).unwrap();

        let values: Vec<f64> = df
            .column("v")
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(values, vec![0.0, 0.0]);
    }

    #[test]
    fn test_standard_scaling_centers_and_normalizes() {
        let mut df = df!["v" => [2.0, 4.0, 6.0]].unwrap();
        let mut changes = Vec::new();

        scale_numeric_columns(&mut df, Scaling::Standard, &mut changes).unwrap();

        let values: Vec<f64> = df
            .column("v")
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        let std = (8.0f64 / 3.0).sqrt();
        assert!((values[0] - (-2.0 / std)).abs() < 1e-12);
        assert!((values[1]).abs() < 1e-12);
        assert!((values[2] - (2.0 / std)).abs() < 1e-12);
    }

    #[test]
    fn test_standard_scaling_zero_variance_errors() {
        let mut df = df!["v" => [4.0, 4.0]].unwrap();
        let mut changes = Vec::new();

        let err = scale_numeric_columns(&mut df, Scaling::Standard, &mut changes).unwrap_err();
        assert_eq!(err.step, CleaningStep::Scale);
        assert_eq!(err.column, "v");
        assert!(err.reason.contains("zero variance"));
    }

    #[test]
    fn test_nulls_preserved_through_scaling() {
        let mut df = df!["v" => [Some(0.0), None, Some(10.0)]].unwrap();
        let mut changes = Vec::new();

        scale_numeric_columns(&mut df, Scaling::MinMax, &mut changes).unwrap();

        let v = df.column("v").unwrap();
        assert_eq!(v.null_count(), 1);
        assert_eq!(v.f64().unwrap().get(2), Some(1.0));
    }

    #[test]
    fn test_all_null_columns_not_counted() {
        let mut df = df![
            "empty" => [None::<f64>, None],
            "v" => [1.0, 2.0],
        ]
        .unwrap();
        let mut changes = Vec::new();

        scale_numeric_columns(&mut df, Scaling::MinMax, &mut changes).unwrap();

        assert_eq!(changes, vec!["Applied Min-Max scaling to 1 numeric columns"]);
    }

    #[test]
    fn test_no_change_line_when_nothing_rescaled() {
        let mut df = df!["empty" => [None::<f64>, None]].unwrap();
        let mut changes = Vec::new();

        scale_numeric_columns(&mut df, Scaling::MinMax, &mut changes).unwrap();

        assert!(changes.is_empty());
    }

    #[test]
    fn test_boolean_columns_not_scaled() {
        let mut df = df![
            "flag" => [true, false],
            "v" => [1.0, 2.0],
        ]
        .unwrap();
        let mut changes = Vec::new();

        scale_numeric_columns(&mut df, Scaling::MinMax, &mut changes).unwrap();

        assert_eq!(df.column("flag").unwrap().dtype(), &DataType::Boolean);
        assert!(changes[0].contains("1 numeric columns"));
    }
}
