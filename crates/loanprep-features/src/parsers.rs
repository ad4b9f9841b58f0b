//! Field parsers for raw loan text.
//!
//! Every parser takes an optional raw value (`None` is the missing marker) and
//! returns an optional number. Malformed input is never an error; it is a
//! missing value that imputation fills later.

use loanprep_common::parse_f64;

/// Parse the first run of ASCII digits in `value`.
fn first_digit_run(value: &str) -> Option<f64> {
    let digits: String = value
        .chars()
        .skip_while(|ch| !ch.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse::<f64>().ok()
    }
}

/// Convert a term description such as `"36 months"` to its month count.
///
/// # Examples
///
/// ```
/// use loanprep_features::parsers::parse_term;
///
/// assert_eq!(parse_term(Some(" 36 months")), Some(36.0));
/// assert_eq!(parse_term(Some("60 Months")), Some(60.0));
/// assert_eq!(parse_term(Some("")), None);
/// assert_eq!(parse_term(None), None);
/// ```
pub fn parse_term(value: Option<&str>) -> Option<f64> {
    value.and_then(first_digit_run)
}

/// Convert an employment-length phrase to a year count.
///
/// `"10+ years"` maps to 10 and `"< 1 year"` to 0; anything else uses its
/// first digit run.
///
/// # Examples
///
/// ```
/// use loanprep_features::parsers::parse_emp_length;
///
/// assert_eq!(parse_emp_length(Some("10+ years")), Some(10.0));
/// assert_eq!(parse_emp_length(Some("< 1 year")), Some(0.0));
/// assert_eq!(parse_emp_length(Some("5 years")), Some(5.0));
/// assert_eq!(parse_emp_length(Some("n/a")), None);
/// ```
pub fn parse_emp_length(value: Option<&str>) -> Option<f64> {
    let normalized = value?.trim().to_lowercase();
    match normalized.as_str() {
        "10+ years" | "10 years" | "10+" => Some(10.0),
        "< 1 year" | "<1 year" | "<1" => Some(0.0),
        other => first_digit_run(other),
    }
}

/// Convert percentage text such as `"13.56%"` to a decimal number.
///
/// # Examples
///
/// ```
/// use loanprep_features::parsers::parse_percentage;
///
/// assert_eq!(parse_percentage(Some(" 13.56% ")), Some(13.56));
/// assert_eq!(parse_percentage(Some("7")), Some(7.0));
/// assert_eq!(parse_percentage(Some("%")), None);
/// ```
pub fn parse_percentage(value: Option<&str>) -> Option<f64> {
    let cleaned = value?.trim().trim_end_matches('%').trim();
    if cleaned.is_empty() {
        return None;
    }
    parse_f64(cleaned)
}

/// Plain numeric coercion; anything that is not a number is missing.
pub fn coerce_numeric(value: Option<&str>) -> Option<f64> {
    value.and_then(parse_f64)
}

/// Combine a low and a high bound column into one representative score
/// column.
///
/// Which columns exist decides the rule, not which values are filled in:
/// with both columns each row is the mean of its two bounds (missing when
/// either bound is missing), with one column its values pass through, and
/// with neither there is no score at all.
///
/// # Examples
///
/// ```
/// use loanprep_features::parsers::composite_score;
///
/// let low = [Some(700.0), None];
/// let high = [Some(720.0), Some(690.0)];
/// assert_eq!(
///     composite_score(Some(&low[..]), Some(&high[..])),
///     Some(vec![Some(710.0), None])
/// );
/// assert_eq!(composite_score(Some(&low[..]), None), Some(vec![Some(700.0), None]));
/// assert_eq!(composite_score(None, None), None);
/// ```
pub fn composite_score(
    low: Option<&[Option<f64>]>,
    high: Option<&[Option<f64>]>,
) -> Option<Vec<Option<f64>>> {
    match (low, high) {
        (Some(low), Some(high)) => Some(
            low.iter()
                .zip(high)
                .map(|pair| match pair {
                    (Some(low), Some(high)) => Some((low + high) / 2.0),
                    _ => None,
                })
                .collect(),
        ),
        (Some(bound), None) | (None, Some(bound)) => Some(bound.to_vec()),
        (None, None) => None,
    }
}
