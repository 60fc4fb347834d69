//! Small numeric and series helpers shared across the crate.

use std::collections::HashMap;

use polars::prelude::*;

use crate::types::ColumnKind;

/// Classify a storage type into a broad column kind.
pub fn column_kind(dtype: &DataType) -> ColumnKind {
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32
        | DataType::Float64 => ColumnKind::Numeric,
        DataType::String => ColumnKind::Text,
        DataType::Boolean => ColumnKind::Boolean,
        DataType::Date | DataType::Datetime(_, _) | DataType::Time | DataType::Duration(_) => {
            ColumnKind::Temporal
        }
        _ => ColumnKind::Other,
    }
}

pub fn is_numeric(dtype: &DataType) -> bool {
    column_kind(dtype) == ColumnKind::Numeric
}

/// Extract a numeric series as f64 values, preserving null positions.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let casted = series.cast(&DataType::Float64)?;
    Ok(casted.f64()?.into_iter().collect())
}

/// Mean and standard deviation with the given delta degrees of freedom.
///
/// Returns `None` when there are fewer than `ddof + 1` values.
pub fn mean_std(values: &[f64], ddof: usize) -> Option<(f64, f64)> {
    let n = values.len();
    if n == 0 || n <= ddof {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    let std = (sum_sq / (n - ddof) as f64).sqrt();
    Some((mean, std))
}

/// Linear-interpolation quantile over an already sorted slice.
///
/// Matches the interpolation used by most describe-style summaries:
/// position `(n - 1) * q`, interpolated between neighbours.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let n = sorted.len();
    if n == 1 {
        return Some(sorted[0]);
    }
    let pos = (n - 1) as f64 * q;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let weight = pos - lower as f64;
    Some(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
}

/// Fill nulls in a numeric series with `value`, widening to Float64.
pub fn fill_numeric_nulls(series: &Series, value: f64) -> PolarsResult<Series> {
    let casted = series.cast(&DataType::Float64)?;
    let filled: Vec<Option<f64>> = casted
        .f64()?
        .into_iter()
        .map(|v| v.or(Some(value)))
        .collect();
    Ok(Series::new(series.name().clone(), filled))
}

/// Fill nulls in a string series with `value`.
pub fn fill_string_nulls(series: &Series, value: &str) -> PolarsResult<Series> {
    let filled: Vec<Option<String>> = series
        .str()?
        .into_iter()
        .map(|v| Some(v.unwrap_or(value).to_string()))
        .collect();
    Ok(Series::new(series.name().clone(), filled))
}

/// Most frequent non-null string, first occurrence winning ties.
pub fn string_mode(chunked: &StringChunked) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for value in chunked.into_iter().flatten() {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }
    // strictly-greater comparison so the first occurrence wins ties
    let mut best: Option<(&str, usize)> = None;
    for value in order {
        let count = counts[value];
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
}

/// Most frequent value, first occurrence winning ties.
pub fn numeric_mode(values: &[f64]) -> Option<f64> {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    let mut order: Vec<f64> = Vec::new();
    for &value in values {
        let count = counts.entry(value.to_bits()).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }
    let mut best: Option<(f64, usize)> = None;
    for value in order {
        let count = counts[&value.to_bits()];
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_kind_classification() {
        assert_eq!(column_kind(&DataType::Int64), ColumnKind::Numeric);
        assert_eq!(column_kind(&DataType::Float64), ColumnKind::Numeric);
        assert_eq!(column_kind(&DataType::String), ColumnKind::Text);
        assert_eq!(column_kind(&DataType::Boolean), ColumnKind::Boolean);
        assert_eq!(column_kind(&DataType::Date), ColumnKind::Temporal);
    }

    #[test]
    fn test_mean_std() {
        let (mean, std) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 0).unwrap();
        assert_eq!(mean, 5.0);
        assert_eq!(std, 2.0);
        assert!(mean_std(&[], 0).is_none());
        assert!(mean_std(&[1.0], 1).is_none());
    }

    #[test]
    fn test_quantile_interpolation() {
        let sorted = [10.0, 11.0, 12.0, 1000.0];
        assert_eq!(quantile_sorted(&sorted, 0.25), Some(10.75));
        assert_eq!(quantile_sorted(&sorted, 0.5), Some(11.5));
        assert_eq!(quantile_sorted(&sorted, 0.75), Some(259.0));
        assert_eq!(quantile_sorted(&sorted, 0.0), Some(10.0));
        assert_eq!(quantile_sorted(&sorted, 1.0), Some(1000.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
        assert_eq!(quantile_sorted(&[7.0], 0.75), Some(7.0));
    }

    #[test]
    fn test_fill_numeric_nulls_widens_to_float() {
        let series = Series::new("age".into(), &[Some(25i64), None, Some(30)]);
        let filled = fill_numeric_nulls(&series, 27.5).unwrap();
        assert_eq!(filled.dtype(), &DataType::Float64);
        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.f64().unwrap().get(1), Some(27.5));
    }

    #[test]
    fn test_fill_string_nulls() {
        let series = Series::new("city".into(), &[Some("NY"), None]);
        let filled = fill_string_nulls(&series, "Unknown").unwrap();
        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.str().unwrap().get(1), Some("Unknown"));
    }

    #[test]
    fn test_string_mode_first_seen_tie_break() {
        let chunked = StringChunked::new(
            "city".into(),
            &[Some("NY"), Some("LA"), None, Some("LA"), Some("NY")],
        );
        assert_eq!(string_mode(&chunked), Some("NY".to_string()));
    }

    #[test]
    fn test_numeric_mode() {
        assert_eq!(numeric_mode(&[1.0, 2.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(numeric_mode(&[5.0, 3.0, 5.0, 3.0]), Some(5.0));
        assert_eq!(numeric_mode(&[]), None);
    }
}
