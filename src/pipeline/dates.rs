//! Date parsing for declared text columns.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::debug;

use crate::error::CleaningError;
use crate::pipeline::CleaningStep;
use crate::types::ColumnKind;
use crate::utils::column_kind;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Convert each declared column to the Date type.
///
/// Unparseable values coerce to null, but a column where nothing parses
/// at all fails the step. Columns already holding a temporal type pass
/// through untouched.
pub(crate) fn parse_date_columns(
    df: &mut DataFrame,
    columns: &[String],
    changes: &mut Vec<String>,
) -> Result<(), CleaningError> {
    for col_name in columns {
        let series = df
            .column(col_name)
            .map_err(|_| {
                CleaningError::new(CleaningStep::ParseDates, col_name, "column not found")
            })?
            .as_materialized_series()
            .clone();

        if column_kind(series.dtype()) == ColumnKind::Temporal {
            debug!(column = %col_name, "column is already temporal");
            continue;
        }
        let chunked = series.str().map_err(|_| {
            CleaningError::new(
                CleaningStep::ParseDates,
                col_name,
                format!("cannot parse dates from {} column", series.dtype()),
            )
        })?;

        let mut parsed_count = 0usize;
        let mut non_null_count = 0usize;
        let days: Vec<Option<i32>> = chunked
            .into_iter()
            .map(|opt| {
                let value = opt?;
                non_null_count += 1;
                let date = parse_date(value)?;
                parsed_count += 1;
                // days since the Unix epoch, which is NaiveDate's default
                Some(date.signed_duration_since(NaiveDate::default()).num_days() as i32)
            })
            .collect();

        if non_null_count > 0 && parsed_count == 0 {
            return Err(CleaningError::new(
                CleaningStep::ParseDates,
                col_name,
                "no values matched a supported date format",
            ));
        }

        let date_series = Series::new(col_name.as_str().into(), days)
            .cast(&DataType::Date)
            .map_err(|e| {
                CleaningError::new(CleaningStep::ParseDates, col_name, e.to_string())
            })?;
        df.replace(col_name, date_series)
            .map_err(|e| {
                CleaningError::new(CleaningStep::ParseDates, col_name, e.to_string())
            })?;

        changes.push(format!("Converted '{col_name}' to datetime format"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_date("2024-03-05"), Some(expected));
        assert_eq!(parse_date("2024/03/05"), Some(expected));
        assert_eq!(parse_date("05/03/2024"), Some(expected));
        assert_eq!(parse_date("2024-03-05 10:30:00"), Some(expected));
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_column_converts_to_date_dtype() {
        let mut df = df![
            "joined" => [Some("2024-01-02"), Some("2024-01-03"), None],
        ]
        .unwrap();
        let mut changes = Vec::new();

        parse_date_columns(&mut df, &["joined".to_string()], &mut changes).unwrap();

        assert_eq!(df.column("joined").unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column("joined").unwrap().null_count(), 1);
        assert_eq!(changes, vec!["Converted 'joined' to datetime format"]);
    }

    #[test]
    fn test_unparseable_values_coerce_to_null() {
        let mut df = df![
            "joined" => ["2024-01-02", "garbage"],
        ]
        .unwrap();
        let mut changes = Vec::new();

        parse_date_columns(&mut df, &["joined".to_string()], &mut changes).unwrap();

        assert_eq!(df.column("joined").unwrap().null_count(), 1);
    }

    #[test]
    fn test_all_unparseable_fails_step() {
        let mut df = df![
            "joined" => ["garbage", "also garbage"],
        ]
        .unwrap();
        let mut changes = Vec::new();

        let err =
            parse_date_columns(&mut df, &["joined".to_string()], &mut changes).unwrap_err();
        assert_eq!(err.step, CleaningStep::ParseDates);
        assert_eq!(err.column, "joined");
    }

    #[test]
    fn test_missing_column_fails_step() {
        let mut df = df!["a" => [1i64]].unwrap();
        let mut changes = Vec::new();

        let err =
            parse_date_columns(&mut df, &["missing".to_string()], &mut changes).unwrap_err();
        assert_eq!(err.column, "missing");
        assert!(err.reason.contains("not found"));
    }
}
