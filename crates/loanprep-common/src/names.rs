//! Column name normalization.

/// Normalizes a column name: strips a byte-order mark, trims and lower-cases.
///
/// # Examples
///
/// ```
/// use loanprep_common::normalize_column_name;
///
/// assert_eq!(normalize_column_name("  Loan_Amnt "), "loan_amnt");
/// assert_eq!(normalize_column_name("\u{feff}TERM"), "term");
/// ```
pub fn normalize_column_name(value: &str) -> String {
    value
        .trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
}
