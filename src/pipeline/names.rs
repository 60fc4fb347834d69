//! Column name normalization.

use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Normalize a single column name: trim, lowercase, runs of anything
/// non-alphanumeric collapse to a single underscore.
fn normalize_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let replaced = NON_ALNUM.replace_all(&lowered, "_");
    let trimmed = replaced.trim_matches('_');
    if trimmed.is_empty() {
        "column".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Rewrite all column names in place, logging each rename.
///
/// Collisions after normalization get a numeric suffix in column order,
/// so the result always has unique names.
pub(crate) fn normalize_columns(
    df: &mut DataFrame,
    changes: &mut Vec<String>,
) -> PolarsResult<()> {
    let old_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|n| n.to_string())
        .collect();

    let mut used: Vec<String> = Vec::with_capacity(old_names.len());
    let mut new_names = Vec::with_capacity(old_names.len());
    for old in &old_names {
        let base = normalize_name(old);
        let mut candidate = base.clone();
        let mut suffix = 2;
        while used.contains(&candidate) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        used.push(candidate.clone());
        new_names.push(candidate);
    }

    if old_names == new_names {
        return Ok(());
    }

    // Rebuild rather than rename in place so a new name can reuse a name
    // some later column is still holding.
    let mut out = DataFrame::default();
    for (column, new_name) in df.get_columns().iter().zip(&new_names) {
        let mut series = column.as_materialized_series().clone();
        series.rename(new_name.as_str().into());
        out.with_column(series)?;
    }
    *df = out;

    for (old, new) in old_names.iter().zip(&new_names) {
        if old != new {
            changes.push(format!("Renamed column '{old}' to '{new}'"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name_rules() {
        assert_eq!(normalize_name("  First Name "), "first_name");
        assert_eq!(normalize_name("Total ($)"), "total");
        assert_eq!(normalize_name("A/B-Test 2"), "a_b_test_2");
        assert_eq!(normalize_name("%%%"), "column");
    }

    #[test]
    fn test_normalize_columns_logs_renames() {
        let mut df = df![
            "First Name" => ["a"],
            "age" => [1i64],
        ]
        .unwrap();
        let mut changes = Vec::new();

        normalize_columns(&mut df, &mut changes).unwrap();

        assert_eq!(df.get_column_names()[0].as_str(), "first_name");
        assert_eq!(df.get_column_names()[1].as_str(), "age");
        assert_eq!(changes, vec!["Renamed column 'First Name' to 'first_name'"]);
    }

    #[test]
    fn test_collisions_get_suffixes() {
        let mut df = df![
            "Name" => ["a"],
            "name " => ["b"],
            "NAME" => ["c"],
        ]
        .unwrap();
        let mut changes = Vec::new();

        normalize_columns(&mut df, &mut changes).unwrap();

        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["name", "name_2", "name_3"]);
    }

    #[test]
    fn test_swap_style_rename_does_not_conflict() {
        let mut df = df![
            "X" => [1i64],
            "x" => [2i64],
        ]
        .unwrap();
        let mut changes = Vec::new();

        normalize_columns(&mut df, &mut changes).unwrap();

        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["x", "x_2"]);
        assert_eq!(df.column("x").unwrap().i64().unwrap().get(0), Some(1));
    }

    #[test]
    fn test_already_normalized_is_noop() {
        let mut df = df!["first_name" => ["a"]].unwrap();
        let mut changes = Vec::new();

        normalize_columns(&mut df, &mut changes).unwrap();

        assert!(changes.is_empty());
    }
}
