//! Table export for download.

use polars::prelude::*;
use tracing::info;

use crate::error::ExportError;

/// Serializes tables into downloadable bytes.
pub struct Exporter;

impl Exporter {
    /// Render `df` as UTF-8 CSV with a header row and comma separators.
    ///
    /// Works on a copy; the input table is untouched. An empty table
    /// still yields its header row.
    pub fn to_csv(df: &DataFrame) -> Result<Vec<u8>, ExportError> {
        let mut buffer = Vec::new();
        let mut copy = df.clone();
        CsvWriter::new(&mut buffer)
            .include_header(true)
            .with_separator(b',')
            .finish(&mut copy)
            .map_err(|e| ExportError::Write(e.to_string()))?;
        info!(bytes = buffer.len(), rows = df.height(), "exported CSV");
        Ok(buffer)
    }
}
