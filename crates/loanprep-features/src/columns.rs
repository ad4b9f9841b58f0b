//! Known columns of the combined loan dataset.
//!
//! Names are the normalized (trimmed, lower-cased) source names.

/// Label column; "accepted" / "rejected" in the source.
pub const TARGET_COLUMN: &str = "loan_status";

/// Loan term in months, derived from `term`.
pub const TERM_MONTHS: &str = "term_months";

/// Employment tenure in years, derived from `emp_length`.
pub const EMP_LENGTH_YEARS: &str = "emp_length_years";

/// Representative FICO score, derived from the two range bounds.
pub const FICO_SCORE: &str = "fico_score";

/// Fill value for a categorical column with no observed values in a batch.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Categorical source columns, one-hot encoded in this order.
pub const CATEGORICAL_FEATURES: &[&str] = &[
    "term",
    "emp_length",
    "home_ownership",
    "purpose",
    "addr_state",
    "application_type",
];

/// How a numeric feature is computed from its source columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericDerivation {
    /// Plain numeric coercion of the column itself.
    Coerce,
    /// Percentage text such as `"13.5%"`.
    Percentage,
    /// Term description such as `"36 months"`.
    Term,
    /// Employment tenure such as `"10+ years"`.
    EmploymentLength,
    /// Mean of a low and a high bound.
    CompositeScore,
}

/// A numeric output column and the source columns it is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericFeature {
    /// Output column name.
    pub name: &'static str,
    /// Source columns; the feature exists when any of them is present.
    pub sources: &'static [&'static str],
    pub derivation: NumericDerivation,
}

impl NumericFeature {
    const fn coerce(name: &'static str, sources: &'static [&'static str]) -> Self {
        Self {
            name,
            sources,
            derivation: NumericDerivation::Coerce,
        }
    }
}

/// Numeric output columns in output order: known raw fields, then derived ones.
pub const NUMERIC_FEATURES: &[NumericFeature] = &[
    NumericFeature::coerce("loan_amnt", &["loan_amnt"]),
    NumericFeature {
        name: "int_rate",
        sources: &["int_rate"],
        derivation: NumericDerivation::Percentage,
    },
    NumericFeature::coerce("annual_inc", &["annual_inc"]),
    NumericFeature {
        name: "dti",
        sources: &["dti"],
        derivation: NumericDerivation::Percentage,
    },
    NumericFeature::coerce("delinq_2yrs", &["delinq_2yrs"]),
    NumericFeature::coerce("fico_range_high", &["fico_range_high"]),
    NumericFeature::coerce("fico_range_low", &["fico_range_low"]),
    NumericFeature::coerce("inq_last_6mths", &["inq_last_6mths"]),
    NumericFeature {
        name: TERM_MONTHS,
        sources: &["term"],
        derivation: NumericDerivation::Term,
    },
    NumericFeature {
        name: EMP_LENGTH_YEARS,
        sources: &["emp_length"],
        derivation: NumericDerivation::EmploymentLength,
    },
    NumericFeature {
        name: FICO_SCORE,
        sources: &["fico_range_low", "fico_range_high"],
        derivation: NumericDerivation::CompositeScore,
    },
];
