//! Polars AnyValue utility functions.
//!
//! Source cells are read as text and parsed here, so numeric cells exported
//! by spreadsheets (`2020.0`) and by CSV writers (`2020`) behave the same.

use polars::prelude::{AnyValue, DataFrame};

use mnch_model::CaseInsensitiveSet;

/// Converts a Polars AnyValue to a String representation.
/// Returns empty string for Null.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => f64::from(v).to_string(),
        AnyValue::Float64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Returns true for cells that stand for "no data".
///
/// WPP workbooks use `...` for unavailable figures.
pub fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == "..." || trimmed == "…"
}

/// Parses a string as f64, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<f64>().ok()
}

/// Parses a calendar year written as an integer or an integral float.
pub fn parse_year(value: &str) -> Option<i32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year);
    }
    let float = trimmed.parse::<f64>().ok()?;
    if float.fract() == 0.0 && float >= f64::from(i32::MIN) && float <= f64::from(i32::MAX) {
        Some(float as i32)
    } else {
        None
    }
}

/// Resolves a configured column name against the frame header.
///
/// SDMX exports label their headers `CODE:Label`; a configured `CODE` matches
/// such a header when no exact match exists.
pub fn resolve_column(df: &DataFrame, name: &str) -> Option<String> {
    let names = df.get_column_names();
    let lookup = CaseInsensitiveSet::new(names.iter().map(|n| n.as_str()));
    if let Some(found) = lookup.get(name) {
        return Some(found.to_string());
    }
    let codes = CaseInsensitiveSet::new(
        names
            .iter()
            .filter_map(|n| n.as_str().split_once(':').map(|(code, _)| code)),
    );
    let code = codes.get(name)?;
    names
        .iter()
        .map(|n| n.as_str())
        .find(|n| n.split_once(':').is_some_and(|(head, _)| head == code))
        .map(str::to_string)
}

/// Extract all trimmed string values from a DataFrame column.
pub fn column_trimmed_values(df: &DataFrame, name: &str) -> Option<Vec<String>> {
    let series = df.column(name).ok()?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = any_to_string(series.get(idx).unwrap_or(AnyValue::Null));
        values.push(value.trim().to_string());
    }
    Some(values)
}
