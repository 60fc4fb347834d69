//! Shared data types describing tables and cleaning results.

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Broad classification of a column's data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Text,
    Boolean,
    Temporal,
    Other,
}

/// Per-column quality summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Underlying storage type, e.g. "i64" or "str".
    pub dtype: String,
    pub kind: ColumnKind,
    pub null_count: usize,
    pub null_percentage: f64,
    pub unique_count: usize,
    /// Up to five sampled non-null values, rendered as strings.
    pub sample_values: Vec<String>,
}

/// Five-number summary plus mean and standard deviation for a numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericSummary {
    pub column: String,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Whole-table quality report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableProfile {
    /// (rows, columns).
    pub shape: (usize, usize),
    pub columns: Vec<ColumnProfile>,
    pub duplicate_count: usize,
    pub duplicate_percentage: f64,
    pub numeric_summaries: Vec<NumericSummary>,
}

impl TableProfile {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Total missing cells across all columns.
    pub fn total_nulls(&self) -> usize {
        self.columns.iter().map(|c| c.null_count).sum()
    }
}

/// Result of a successful cleaning run.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub table: DataFrame,
    /// Human-readable change log, one line per applied action.
    pub changes: Vec<String>,
}
