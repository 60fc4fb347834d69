//! Categorical encoding of text columns.

use polars::prelude::*;

use crate::config::Encoding;

/// Apply the selected encoding to every text column.
///
/// Category order is first occurrence in the column, so encoding is
/// deterministic for a given table.
pub(crate) fn encode_text_columns(
    df: &mut DataFrame,
    encoding: Encoding,
    changes: &mut Vec<String>,
) -> PolarsResult<()> {
    let text_columns: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype() == &DataType::String)
        .map(|c| c.name().to_string())
        .collect();
    if text_columns.is_empty() {
        return Ok(());
    }

    match encoding {
        Encoding::OneHot => one_hot(df, &text_columns, changes),
        Encoding::Label => label(df, &text_columns, changes),
    }
}

/// Distinct non-null values in first-occurrence order.
fn categories(chunked: &StringChunked) -> Vec<String> {
    let mut seen = Vec::new();
    for value in chunked.into_iter().flatten() {
        if !seen.iter().any(|s: &String| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

fn one_hot(
    df: &mut DataFrame,
    text_columns: &[String],
    changes: &mut Vec<String>,
) -> PolarsResult<()> {
    let mut out = DataFrame::default();
    for column in df.get_columns() {
        let series = column.as_materialized_series();
        if !text_columns.contains(&series.name().to_string()) {
            out.with_column(series.clone())?;
            continue;
        }
        let chunked = series.str()?;
        let cats = categories(chunked);
        for cat in &cats {
            let indicator: BooleanChunked = chunked
                .into_iter()
                .map(|v| Some(v == Some(cat.as_str())))
                .collect();
            let name = format!("{}_{}", series.name(), cat);
            out.with_column(indicator.into_series().with_name(name.into()))?;
        }
        changes.push(format!(
            "One-hot encoded '{}' into {} columns",
            series.name(),
            cats.len()
        ));
    }
    *df = out;
    Ok(())
}

fn label(
    df: &mut DataFrame,
    text_columns: &[String],
    changes: &mut Vec<String>,
) -> PolarsResult<()> {
    for col_name in text_columns {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let chunked = series.str()?;
        let cats = categories(chunked);
        let codes: Vec<Option<u32>> = chunked
            .into_iter()
            .map(|v| {
                v.and_then(|value| {
                    cats.iter().position(|c| c == value).map(|idx| idx as u32)
                })
            })
            .collect();
        df.replace(col_name, Series::new(col_name.as_str().into(), codes))?;
        changes.push(format!(
            "Label encoded '{}' ({} categories)",
            col_name,
            cats.len()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_hot_explodes_text_column() {
        let mut df = df![
            "city" => ["NY", "LA", "NY"],
            "age" => [25i64, 30, 35],
        ]
        .unwrap();
        let mut changes = Vec::new();

        encode_text_columns(&mut df, Encoding::OneHot, &mut changes).unwrap();

        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["city_NY", "city_LA", "age"]);
        let ny: Vec<bool> = df
            .column("city_NY")
            .unwrap()
            .bool()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(ny, vec![true, false, true]);
        assert_eq!(changes, vec!["One-hot encoded 'city' into 2 columns"]);
    }

    #[test]
    fn test_one_hot_row_sums_are_one() {
        let mut df = df![
            "c" => ["a", "b", "c", "a"],
        ]
        .unwrap();
        let mut changes = Vec::new();

        encode_text_columns(&mut df, Encoding::OneHot, &mut changes).unwrap();

        assert_eq!(df.width(), 3);
        for row in 0..df.height() {
            let set: usize = df
                .get_columns()
                .iter()
                .filter(|c| {
                    c.as_materialized_series()
                        .bool()
                        .ok()
                        .and_then(|b| b.get(row))
                        .unwrap_or(false)
                })
                .count();
            assert_eq!(set, 1);
        }
    }

    #[test]
    fn test_label_codes_follow_first_occurrence() {
        let mut df = df![
            "city" => [Some("LA"), Some("NY"), Some("LA"), None],
        ]
        .unwrap();
        let mut changes = Vec::new();

        encode_text_columns(&mut df, Encoding::Label, &mut changes).unwrap();

        let city = df.column("city").unwrap();
        assert_eq!(city.dtype(), &DataType::UInt32);
        let codes: Vec<Option<u32>> = city.u32().unwrap().into_iter().collect();
        assert_eq!(codes, vec![Some(0), Some(1), Some(0), None]);
        assert_eq!(changes, vec!["Label encoded 'city' (2 categories)"]);
    }

    #[test]
    fn test_no_text_columns_is_noop() {
        let mut df = df!["n" => [1i64, 2]].unwrap();
        let before = df.clone();
        let mut changes = Vec::new();

        encode_text_columns(&mut df, Encoding::OneHot, &mut changes).unwrap();

        assert!(df.equals(&before));
        assert!(changes.is_empty());
    }
}
