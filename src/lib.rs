//! Interactive Tabular Data Cleaning Library
//!
//! A data cleaning library built with Rust and Polars for single-user,
//! interactive sessions: load a file, inspect its quality, run a
//! configurable cleaning pipeline, and export the result.
//!
//! # Overview
//!
//! The library is organized around five operations:
//!
//! - **Loading**: CSV, XLSX, and delimited text files parsed from raw bytes
//! - **Quality Assessment**: per-column null counts, type classification,
//!   duplicate detection, and numeric summaries
//! - **Cleaning**: a fixed-order pipeline of name normalization, date
//!   parsing, imputation, outlier removal, deduplication, encoding,
//!   and scaling
//! - **Charts**: serializable missing-value bars, histograms, and
//!   before/after comparisons for a plotting frontend
//! - **Export**: CSV bytes ready for download
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use scour::{CleaningConfig, CleaningPipeline, Exporter, FileFormat, Loader, QualityAssessor};
//!
//! let bytes = std::fs::read("data.csv")?;
//! let table = Loader::load(&bytes, FileFormat::Csv)?;
//!
//! let profile = QualityAssessor::profile(&table)?;
//! println!("{} rows, {} duplicates", profile.shape.0, profile.duplicate_count);
//!
//! let config = CleaningConfig::builder()
//!     .normalize_columns(true)
//!     .outlier_method(Some(scour::OutlierMethod::Iqr))
//!     .build()?;
//!
//! let cleaned = CleaningPipeline::clean(&table, &config)?;
//! for change in &cleaned.changes {
//!     println!("- {change}");
//! }
//!
//! std::fs::write("cleaned.csv", Exporter::to_csv(&cleaned.table)?)?;
//! ```
//!
//! # Error Handling
//!
//! Each operation has its own error type so a hosting shell can show the
//! user exactly what failed: [`ParseError`] for loading,
//! [`CleaningFailure`] (wrapping a [`CleaningError`]) for pipeline runs,
//! and [`ExportError`] for export. A failed cleaning run never modifies
//! the caller's table; the failure carries a diagnostic partial copy.

pub mod charts;
pub mod config;
pub mod error;
pub mod exporter;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod types;
pub mod utils;

pub use charts::{
    BeforeAfter, ChartBuilder, ColumnNullsPair, Histogram, HistogramBucket, MissingBars,
};
pub use config::{
    CleaningConfig, CleaningConfigBuilder, ConfigValidationError, Encoding, MissingStrategy,
    OutlierMethod, Scaling,
};
pub use error::{CleaningError, CleaningFailure, ExportError, ParseError};
pub use exporter::Exporter;
pub use imputers::StatisticalImputer;
pub use loader::{FileFormat, Loader};
pub use pipeline::{CleaningPipeline, CleaningStep};
pub use profiler::QualityAssessor;
pub use types::{CleanedTable, ColumnKind, ColumnProfile, NumericSummary, TableProfile};
