//! Chart-ready summaries.
//!
//! Produces plain serializable structures a frontend can hand straight
//! to a plotting layer: missing-value bars, numeric histograms, and
//! before/after comparisons. Nothing here renders pixels.

use polars::prelude::*;
use serde::Serialize;

use crate::types::TableProfile;
use crate::utils::{is_numeric, numeric_values};

pub const DEFAULT_HISTOGRAM_BUCKETS: usize = 20;

/// One bar per column: how many values are missing.
#[derive(Debug, Clone, Serialize)]
pub struct MissingBars {
    pub columns: Vec<String>,
    pub null_counts: Vec<usize>,
    pub null_percentages: Vec<f64>,
}

/// Equal-width histogram over a numeric column's non-null values.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    pub column: String,
    pub buckets: Vec<HistogramBucket>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistogramBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Shape and null totals before and after a cleaning run.
#[derive(Debug, Clone, Serialize)]
pub struct BeforeAfter {
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    pub nulls_before: usize,
    pub nulls_after: usize,
    pub duplicates_before: usize,
    pub duplicates_after: usize,
    /// Per-column missing counts, keyed by name. A `None` side means the
    /// column only exists in the other table (renamed, encoded, dropped).
    pub column_nulls: Vec<ColumnNullsPair>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnNullsPair {
    pub column: String,
    pub nulls_before: Option<usize>,
    pub nulls_after: Option<usize>,
}

/// Builds chart data from tables and profiles.
pub struct ChartBuilder;

impl ChartBuilder {
    /// Missing-value bars for every column, in table order.
    pub fn missing_bars(profile: &TableProfile) -> MissingBars {
        MissingBars {
            columns: profile.columns.iter().map(|c| c.name.clone()).collect(),
            null_counts: profile.columns.iter().map(|c| c.null_count).collect(),
            null_percentages: profile.columns.iter().map(|c| c.null_percentage).collect(),
        }
    }

    /// Histogram for one numeric column. Nulls are excluded; an all-null
    /// or non-numeric column yields no buckets.
    pub fn histogram(
        df: &DataFrame,
        column: &str,
        bucket_count: usize,
    ) -> PolarsResult<Histogram> {
        let series = df.column(column)?.as_materialized_series();
        let mut histogram = Histogram {
            column: column.to_string(),
            buckets: Vec::new(),
        };
        if !is_numeric(series.dtype()) || bucket_count == 0 {
            return Ok(histogram);
        }
        let values: Vec<f64> = numeric_values(series)?.into_iter().flatten().collect();
        if values.is_empty() {
            return Ok(histogram);
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            histogram.buckets.push(HistogramBucket {
                lower: min,
                upper: max,
                count: values.len(),
            });
            return Ok(histogram);
        }

        let width = (max - min) / bucket_count as f64;
        let mut counts = vec![0usize; bucket_count];
        for value in &values {
            let mut idx = ((value - min) / width) as usize;
            // the maximum lands in the last bucket, not one past it
            if idx >= bucket_count {
                idx = bucket_count - 1;
            }
            counts[idx] += 1;
        }
        histogram.buckets = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBucket {
                lower: min + i as f64 * width,
                upper: min + (i + 1) as f64 * width,
                count,
            })
            .collect();
        Ok(histogram)
    }

    /// Histograms for every numeric column.
    pub fn numeric_histograms(
        df: &DataFrame,
        bucket_count: usize,
    ) -> PolarsResult<Vec<Histogram>> {
        let mut histograms = Vec::new();
        for column in df.get_columns() {
            if is_numeric(column.dtype()) {
                histograms.push(Self::histogram(df, column.name().as_str(), bucket_count)?);
            }
        }
        Ok(histograms)
    }

    /// Compare a table's profile before and after cleaning.
    pub fn compare(before: &TableProfile, after: &TableProfile) -> BeforeAfter {
        let mut column_nulls: Vec<ColumnNullsPair> = before
            .columns
            .iter()
            .map(|c| ColumnNullsPair {
                column: c.name.clone(),
                nulls_before: Some(c.null_count),
                nulls_after: after.column(&c.name).map(|a| a.null_count),
            })
            .collect();
        for col in &after.columns {
            if before.column(&col.name).is_none() {
                column_nulls.push(ColumnNullsPair {
                    column: col.name.clone(),
                    nulls_before: None,
                    nulls_after: Some(col.null_count),
                });
            }
        }

        BeforeAfter {
            rows_before: before.shape.0,
            rows_after: after.shape.0,
            columns_before: before.shape.1,
            columns_after: after.shape.1,
            nulls_before: before.total_nulls(),
            nulls_after: after.total_nulls(),
            duplicates_before: before.duplicate_count,
            duplicates_after: after.duplicate_count,
            column_nulls,
        }
    }
}
