//! Label and categorical encoding.

use std::collections::BTreeMap;

use polars::prelude::*;

/// Map a raw label to 1 (accepted) or 0 (rejected).
///
/// Anything else, including a missing label, is `None` and the row is dropped.
///
/// # Examples
///
/// ```
/// use loanprep_features::encode_label;
///
/// assert_eq!(encode_label(Some("ACCEPTED ")), Some(1));
/// assert_eq!(encode_label(Some("rejected")), Some(0));
/// assert_eq!(encode_label(Some("pending")), None);
/// ```
pub fn encode_label(value: Option<&str>) -> Option<i32> {
    match value?.trim().to_lowercase().as_str() {
        "accepted" => Some(1),
        "rejected" => Some(0),
        _ => None,
    }
}

/// Trim and lower-case a categorical value. Empty text and `"nan"` are missing.
pub fn normalize_category(value: Option<&str>) -> Option<String> {
    let normalized = value?.trim().to_lowercase();
    if normalized.is_empty() || normalized == "nan" {
        None
    } else {
        Some(normalized)
    }
}

/// Name of the indicator column for `value` of `column`.
pub fn indicator_name(column: &str, value: &str) -> String {
    format!("{column}_{value}")
}

/// One `Int32` 0/1 indicator column per distinct value, in value order.
pub fn one_hot(column: &str, values: &[String]) -> Vec<Column> {
    let mut categories: BTreeMap<&str, Vec<i32>> = BTreeMap::new();
    for value in values {
        categories
            .entry(value.as_str())
            .or_insert_with(|| vec![0; values.len()]);
    }
    for (row, value) in values.iter().enumerate() {
        if let Some(indicator) = categories.get_mut(value.as_str()) {
            indicator[row] = 1;
        }
    }
    categories
        .into_iter()
        .map(|(value, indicator)| {
            Series::new(indicator_name(column, value).into(), indicator).into_column()
        })
        .collect()
}
