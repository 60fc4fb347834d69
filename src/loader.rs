//! File ingestion.
//!
//! Turns uploaded bytes into a [`DataFrame`]. CSV and TXT go through the
//! polars CSV reader with schema inference; XLSX goes through calamine
//! with per-column type inference since spreadsheet cells carry no schema.

use std::io::Cursor;

use calamine::{Data, DataType as CellType, Reader, Xlsx};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions};
use polars::prelude::*;
use tracing::{debug, info};

use crate::error::ParseError;

const INFER_SCHEMA_ROWS: usize = 1000;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    /// Delimited text, tab or comma sniffed from the first line.
    Txt,
}

impl FileFormat {
    /// Map a file extension (case-insensitive) to a format.
    pub fn from_extension(ext: &str) -> Result<Self, ParseError> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            "txt" | "tsv" => Ok(Self::Txt),
            other => Err(ParseError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Txt => "txt",
        };
        write!(f, "{name}")
    }
}

/// Reads uploaded bytes into tables.
pub struct Loader;

impl Loader {
    /// Parse `bytes` according to `format`.
    ///
    /// Fails with [`ParseError::Empty`] when the input holds no data rows.
    pub fn load(bytes: &[u8], format: FileFormat) -> Result<DataFrame, ParseError> {
        if bytes.is_empty() {
            return Err(ParseError::Empty);
        }
        let df = match format {
            FileFormat::Csv => read_delimited(bytes, b',')?,
            FileFormat::Txt => {
                let separator = sniff_separator(bytes)?;
                debug!(separator = %(separator as char), "sniffed text separator");
                read_delimited(bytes, separator)?
            }
            FileFormat::Xlsx => read_xlsx(bytes)?,
        };
        if df.height() == 0 {
            return Err(ParseError::Empty);
        }
        info!(
            rows = df.height(),
            columns = df.width(),
            %format,
            "loaded table"
        );
        Ok(df)
    }
}

fn read_delimited(bytes: &[u8], separator: u8) -> Result<DataFrame, ParseError> {
    let parse_options = CsvParseOptions::default().with_separator(separator);
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_parse_options(parse_options)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| ParseError::Malformed {
            format: "csv".to_string(),
            reason: e.to_string(),
        })
}

/// Pick tab when the first line contains one, otherwise comma.
fn sniff_separator(bytes: &[u8]) -> Result<u8, ParseError> {
    let first_line = bytes.split(|&b| b == b'\n').next().unwrap_or(bytes);
    std::str::from_utf8(first_line)
        .map_err(|e| ParseError::Encoding(e.to_string()))?;
    if first_line.contains(&b'\t') {
        Ok(b'\t')
    } else {
        Ok(b',')
    }
}

fn read_xlsx(bytes: &[u8]) -> Result<DataFrame, ParseError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| ParseError::Malformed {
            format: "xlsx".to_string(),
            reason: e.to_string(),
        })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ParseError::Empty)?
        .map_err(|e| ParseError::Malformed {
            format: "xlsx".to_string(),
            reason: e.to_string(),
        })?;

    let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
    if rows.len() < 2 {
        return Err(ParseError::Empty);
    }

    let headers: Vec<String> = rows[0]
        .iter()
        .map(|cell| cell.as_string().unwrap_or_else(|| cell.to_string()))
        .collect();

    let mut df = DataFrame::default();
    for (idx, header) in headers.iter().enumerate() {
        let cells: Vec<Option<&Data>> = rows[1..].iter().map(|row| row.get(idx)).collect();
        df.with_column(build_sheet_column(header, &cells))
            .map_err(|e| ParseError::Malformed {
                format: "xlsx".to_string(),
                reason: e.to_string(),
            })?;
    }
    Ok(df)
}

#[derive(PartialEq)]
enum SheetColType {
    Int,
    Float,
    Bool,
    DateTime,
    Text,
}

/// Infer one column's type from its cells, then materialize it.
///
/// Int narrows to Float on mixed numerics; any string or mixed types fall
/// back to Text. Date cells render as ISO strings so the date parsing step
/// can pick them up later.
fn build_sheet_column(name: &str, cells: &[Option<&Data>]) -> Series {
    let mut inferred: Option<SheetColType> = None;
    for cell in cells.iter().flatten() {
        let cell_type = match cell {
            Data::Empty => continue,
            Data::Int(_) => SheetColType::Int,
            Data::Float(v) => {
                if v.fract() == 0.0 {
                    SheetColType::Int
                } else {
                    SheetColType::Float
                }
            }
            Data::Bool(_) => SheetColType::Bool,
            Data::DateTime(_) | Data::DateTimeIso(_) => SheetColType::DateTime,
            _ => SheetColType::Text,
        };
        inferred = Some(match (inferred, cell_type) {
            (None, t) => t,
            (Some(SheetColType::Int), SheetColType::Float)
            | (Some(SheetColType::Float), SheetColType::Int) => SheetColType::Float,
            (Some(prev), t) if prev == t => t,
            _ => SheetColType::Text,
        });
    }

    match inferred {
        Some(SheetColType::Int) => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|c| c.and_then(|d| d.as_i64()))
                .collect();
            Series::new(name.into(), values)
        }
        Some(SheetColType::Float) => {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|c| c.and_then(|d| d.as_f64()))
                .collect();
            Series::new(name.into(), values)
        }
        Some(SheetColType::Bool) => {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|c| c.and_then(|d| d.get_bool()))
                .collect();
            Series::new(name.into(), values)
        }
        Some(SheetColType::DateTime) => {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|c| {
                    c.and_then(|d| {
                        d.as_datetime()
                            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                    })
                })
                .collect();
            Series::new(name.into(), values)
        }
        Some(SheetColType::Text) | None => {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|c| {
                    c.and_then(|d| {
                        if d.is_empty() {
                            None
                        } else {
                            Some(d.as_string().unwrap_or_else(|| d.to_string()))
                        }
                    })
                })
                .collect();
            Series::new(name.into(), values)
        }
    }
}
