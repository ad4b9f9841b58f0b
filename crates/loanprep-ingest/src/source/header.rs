//! Source header normalization.

use std::collections::BTreeSet;

use loanprep_common::normalize_column_name;

/// Normalized view of the source header row.
///
/// Column names are normalized once on ingestion so every later step can rely
/// on canonical names. When two raw headers normalize to the same name only
/// the first is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceHeaders {
    /// Normalized column names, in source order, without duplicates.
    pub columns: Vec<String>,
    /// Field index in the source record for each entry of `columns`.
    pub indices: Vec<usize>,
    /// Normalized names that were dropped because an earlier header matched.
    pub duplicates: Vec<String>,
}

impl SourceHeaders {
    /// Build normalized headers from the raw header fields.
    pub fn from_raw<'a>(raw: impl IntoIterator<Item = &'a str>) -> Self {
        let mut seen = BTreeSet::new();
        let mut columns = Vec::new();
        let mut indices = Vec::new();
        let mut duplicates = Vec::new();
        for (idx, value) in raw.into_iter().enumerate() {
            let name = normalize_column_name(value);
            if seen.insert(name.clone()) {
                columns.push(name);
                indices.push(idx);
            } else {
                duplicates.push(name);
            }
        }
        Self {
            columns,
            indices,
            duplicates,
        }
    }

    /// Returns the number of kept columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
