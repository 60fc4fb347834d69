//! Data quality assessment.
//!
//! Builds a [`TableProfile`] for a loaded table: per-column null and
//! cardinality counts, broad type classification, sampled values,
//! whole-table duplicate counts and numeric summaries.

mod statistics;

use anyhow::Result;
use polars::prelude::*;
use rand::prelude::*;
use tracing::debug;

pub(crate) use statistics::numeric_summary;

use crate::types::{ColumnProfile, TableProfile};
use crate::utils::column_kind;

const SAMPLE_SIZE: usize = 5;

/// Read-only quality assessor for tables.
pub struct QualityAssessor;

impl QualityAssessor {
    /// Profile a table without modifying it.
    pub fn profile(df: &DataFrame) -> Result<TableProfile> {
        let mut columns = Vec::new();
        let mut numeric_summaries = Vec::new();

        for col_name in df.get_column_names() {
            let profile = Self::profile_column(df, col_name)?;
            let series = df.column(col_name)?.as_materialized_series();
            if let Some(summary) = numeric_summary(series)? {
                numeric_summaries.push(summary);
            }
            columns.push(profile);
        }

        let duplicate_count = df.height()
            - df.unique_stable(None, UniqueKeepStrategy::First, None)?
                .height();
        let duplicate_percentage = if df.height() > 0 {
            (duplicate_count as f64 / df.height() as f64) * 100.0
        } else {
            0.0
        };

        debug!(
            rows = df.height(),
            columns = df.width(),
            duplicates = duplicate_count,
            "profiled table"
        );

        Ok(TableProfile {
            shape: (df.height(), df.width()),
            columns,
            duplicate_count,
            duplicate_percentage,
            numeric_summaries,
        })
    }

    fn profile_column(df: &DataFrame, col_name: &str) -> Result<ColumnProfile> {
        let col = df.column(col_name)?;
        let series = col.as_materialized_series();
        let dtype = format!("{}", series.dtype());
        let kind = column_kind(series.dtype());
        let unique_count = series.n_unique()?;
        let null_count = series.null_count();
        let null_percentage = if df.height() > 0 {
            (null_count as f64 / df.height() as f64) * 100.0
        } else {
            0.0
        };

        // Deterministic sample so repeated profiles of the same table agree.
        let mut sample_values = Vec::new();
        let non_null = series.drop_nulls();
        if !non_null.is_empty() {
            let sample_size = std::cmp::min(SAMPLE_SIZE, non_null.len());
            let mut rng = StdRng::seed_from_u64(42);
            let indices: Vec<usize> = (0..non_null.len()).collect();
            let mut sampled: Vec<usize> = indices
                .choose_multiple(&mut rng, sample_size)
                .copied()
                .collect();
            sampled.sort_unstable();

            for idx in sampled {
                if let Ok(val) = non_null.get(idx) {
                    sample_values.push(render_value(&val));
                }
            }
        }

        Ok(ColumnProfile {
            name: col_name.to_string(),
            dtype,
            kind,
            null_count,
            null_percentage,
            unique_count,
            sample_values,
        })
    }
}

fn render_value(value: &AnyValue) -> String {
    match value {
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => format!("{other}"),
    }
}
