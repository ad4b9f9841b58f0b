//! Batch-local imputation.
//!
//! Statistics are computed from the values handed in and nothing else, so two
//! batches never share a median or a mode.

use std::collections::BTreeMap;

use crate::columns::UNKNOWN_CATEGORY;

/// Median of the present values; the mean of the two middle values when the
/// count is even. `None` when nothing is present.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    present.sort_by(f64::total_cmp);
    let mid = present.len() / 2;
    if present.len() % 2 == 0 {
        Some((present[mid - 1] + present[mid]) / 2.0)
    } else {
        Some(present[mid])
    }
}

/// Most frequent present value. Ties go to the lexicographically smallest.
pub fn most_frequent(values: &[Option<String>]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values.iter().flatten() {
        *counts.entry(value.as_str()).or_default() += 1;
    }
    // BTreeMap iterates in key order, so the first maximum is the smallest key.
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
}

/// Replace missing numeric values with the median of the present ones.
///
/// Returns the fill value; a column with no present values is left as-is and
/// `None` is returned.
pub fn fill_numeric(values: &mut [Option<f64>]) -> Option<f64> {
    let fill = median(values)?;
    for value in values.iter_mut().filter(|value| value.is_none()) {
        *value = Some(fill);
    }
    Some(fill)
}

/// Replace missing categorical values with the mode, or `"unknown"` when the
/// column has no values at all.
pub fn fill_categorical(values: &mut [Option<String>]) -> Vec<String> {
    let fill = most_frequent(values).unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());
    values
        .iter_mut()
        .map(|value| value.take().unwrap_or_else(|| fill.clone()))
        .collect()
}
