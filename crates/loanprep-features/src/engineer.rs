//! Raw batch to engineered batch.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::*;
use tracing::debug;

use loanprep_common::{any_to_string_non_empty, normalize_column_name};

use crate::columns::{
    CATEGORICAL_FEATURES, NUMERIC_FEATURES, NumericDerivation, NumericFeature, TARGET_COLUMN,
};
use crate::encode::{encode_label, normalize_category, one_hot};
use crate::error::Result;
use crate::impute::{fill_categorical, fill_numeric};
use crate::parsers::{
    coerce_numeric, composite_score, parse_emp_length, parse_percentage, parse_term,
};

/// Engineer one raw batch into model-ready columns.
///
/// Output columns are the present numeric features (`Float64`), then one
/// `Int32` indicator per observed categorical value, then `loan_status`
/// (`Int32`) when the batch carries a label. Rows whose label is neither
/// accepted nor rejected are dropped before anything else is computed, so
/// imputation statistics only see kept rows.
///
/// A batch that loses every row yields an empty frame, never an error.
pub fn engineer_features(df: &DataFrame) -> Result<DataFrame> {
    let columns = BatchColumns::new(df);

    let (kept_rows, labels) = match columns.get(TARGET_COLUMN) {
        Some(target) => {
            let mut kept_rows = Vec::with_capacity(df.height());
            let mut labels = Vec::with_capacity(df.height());
            for idx in 0..df.height() {
                let raw = any_to_string_non_empty(target.get(idx)?);
                if let Some(label) = encode_label(raw.as_deref()) {
                    kept_rows.push(idx);
                    labels.push(label);
                }
            }
            (kept_rows, Some(labels))
        }
        None => ((0..df.height()).collect(), None),
    };

    let mut output: Vec<Column> = Vec::new();

    for feature in NUMERIC_FEATURES {
        let Some(mut values) = numeric_values(&columns, feature, &kept_rows)? else {
            continue;
        };
        fill_numeric(&mut values);
        output.push(Series::new(feature.name.into(), values).into_column());
    }
    let numeric_count = output.len();

    // An indicator may not shadow a numeric feature, e.g. `term` value "months".
    let mut emitted: BTreeSet<String> = output
        .iter()
        .map(|column| column.name().to_string())
        .collect();
    for &name in CATEGORICAL_FEATURES {
        let Some(column) = columns.get(name) else {
            continue;
        };
        let mut values: Vec<Option<String>> = text_values(column, &kept_rows)?
            .into_iter()
            .map(|value| normalize_category(value.as_deref()))
            .collect();
        let filled = fill_categorical(&mut values);
        for indicator in one_hot(name, &filled) {
            if emitted.insert(indicator.name().to_string()) {
                output.push(indicator);
            } else {
                debug!(column = %indicator.name(), "skipped indicator clashing with a feature");
            }
        }
    }
    let indicator_count = output.len() - numeric_count;

    if let Some(labels) = labels {
        output.push(Series::new(TARGET_COLUMN.into(), labels).into_column());
    }

    debug!(
        rows_in = df.height(),
        rows_kept = kept_rows.len(),
        numeric_features = numeric_count,
        indicator_features = indicator_count,
        "engineered batch"
    );

    Ok(DataFrame::new(output)?)
}

/// Batch columns by normalized name; the first column wins on a name clash.
struct BatchColumns<'a> {
    by_name: BTreeMap<String, &'a Column>,
}

impl<'a> BatchColumns<'a> {
    fn new(df: &'a DataFrame) -> Self {
        let mut by_name = BTreeMap::new();
        for column in df.get_columns() {
            by_name
                .entry(normalize_column_name(column.name()))
                .or_insert(column);
        }
        Self { by_name }
    }

    fn get(&self, name: &str) -> Option<&'a Column> {
        self.by_name.get(name).copied()
    }
}

fn text_values(column: &Column, rows: &[usize]) -> Result<Vec<Option<String>>> {
    let mut values = Vec::with_capacity(rows.len());
    for &idx in rows {
        values.push(any_to_string_non_empty(column.get(idx)?));
    }
    Ok(values)
}

/// Parsed values for `feature`, or `None` when none of its sources exist.
fn numeric_values(
    columns: &BatchColumns<'_>,
    feature: &NumericFeature,
    rows: &[usize],
) -> Result<Option<Vec<Option<f64>>>> {
    if feature.derivation == NumericDerivation::CompositeScore {
        let [low, high] = feature.sources else {
            return Ok(None);
        };
        let low = bound_values(columns.get(low), rows)?;
        let high = bound_values(columns.get(high), rows)?;
        return Ok(composite_score(low.as_deref(), high.as_deref()));
    }

    let Some(column) = feature.sources.first().and_then(|name| columns.get(name)) else {
        return Ok(None);
    };
    let parse: fn(Option<&str>) -> Option<f64> = match feature.derivation {
        NumericDerivation::Percentage => parse_percentage,
        NumericDerivation::Term => parse_term,
        NumericDerivation::EmploymentLength => parse_emp_length,
        NumericDerivation::Coerce | NumericDerivation::CompositeScore => coerce_numeric,
    };
    let values = text_values(column, rows)?
        .iter()
        .map(|value| parse(value.as_deref()))
        .collect();
    Ok(Some(values))
}

/// Coerced bound values, or `None` when the bound column is absent.
fn bound_values(column: Option<&Column>, rows: &[usize]) -> Result<Option<Vec<Option<f64>>>> {
    let Some(column) = column else {
        return Ok(None);
    };
    Ok(Some(
        text_values(column, rows)?
            .iter()
            .map(|value| coerce_numeric(value.as_deref()))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(name: &str, values: &[Option<&str>]) -> Column {
        Series::new(name.into(), values.to_vec()).into_column()
    }

    fn names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name).unwrap().f64().unwrap().into_iter().collect()
    }

    fn ints(df: &DataFrame, name: &str) -> Vec<Option<i32>> {
        df.column(name).unwrap().i32().unwrap().into_iter().collect()
    }

    #[test]
    fn test_columns_are_ordered_numeric_indicators_label() {
        let df = DataFrame::new(vec![
            text("loan_status", &[Some("accepted"), Some("rejected")]),
            text("home_ownership", &[Some("RENT"), Some("own")]),
            text("loan_amnt", &[Some("1000"), Some("2000")]),
            text("term", &[Some(" 36 months"), Some(" 60 months")]),
        ])
        .unwrap();

        let out = engineer_features(&df).unwrap();
        assert_eq!(
            names(&out),
            vec![
                "loan_amnt",
                "term_months",
                "term_36 months",
                "term_60 months",
                "home_ownership_own",
                "home_ownership_rent",
                "loan_status",
            ]
        );
        assert_eq!(floats(&out, "term_months"), vec![Some(36.0), Some(60.0)]);
        assert_eq!(ints(&out, "loan_status"), vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_unrecognized_labels_drop_rows() {
        let df = DataFrame::new(vec![
            text(
                "loan_status",
                &[
                    Some("Accepted"),
                    Some("ACCEPTED "),
                    Some("rejected"),
                    Some("pending"),
                    None,
                ],
            ),
            text("loan_amnt", &[Some("1"), Some("2"), Some("3"), Some("4"), Some("5")]),
        ])
        .unwrap();

        let out = engineer_features(&df).unwrap();
        assert_eq!(out.height(), 3);
        assert_eq!(ints(&out, "loan_status"), vec![Some(1), Some(1), Some(0)]);
        assert_eq!(floats(&out, "loan_amnt"), vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_imputation_uses_kept_rows_only() {
        let df = DataFrame::new(vec![
            text(
                "loan_status",
                &[Some("accepted"), Some("pending"), Some("rejected"), Some("accepted")],
            ),
            text("annual_inc", &[Some("10"), Some("1000"), None, Some("30")]),
            text("purpose", &[Some("car"), Some("debt"), None, Some("car")]),
        ])
        .unwrap();

        let out = engineer_features(&df).unwrap();
        assert_eq!(
            floats(&out, "annual_inc"),
            vec![Some(10.0), Some(20.0), Some(30.0)]
        );
        assert_eq!(names(&out), vec!["annual_inc", "purpose_car", "loan_status"]);
        assert_eq!(ints(&out, "purpose_car"), vec![Some(1), Some(1), Some(1)]);
    }

    #[test]
    fn test_malformed_values_are_imputed() {
        let df = DataFrame::new(vec![
            text("int_rate", &[Some("10%"), Some("oops"), Some("20%")]),
            text("emp_length", &[Some("10+ years"), Some("< 1 year"), Some("n/a")]),
        ])
        .unwrap();

        let out = engineer_features(&df).unwrap();
        assert_eq!(floats(&out, "int_rate"), vec![Some(10.0), Some(15.0), Some(20.0)]);
        assert_eq!(
            floats(&out, "emp_length_years"),
            vec![Some(10.0), Some(0.0), Some(5.0)]
        );
    }

    #[test]
    fn test_fico_score_from_single_bound() {
        let df = DataFrame::new(vec![text("fico_range_low", &[Some("700"), Some("650")])]).unwrap();

        let out = engineer_features(&df).unwrap();
        assert_eq!(names(&out), vec!["fico_range_low", "fico_score"]);
        assert_eq!(floats(&out, "fico_score"), vec![Some(700.0), Some(650.0)]);
    }

    #[test]
    fn test_indicator_never_shadows_numeric_feature() {
        let df = DataFrame::new(vec![
            text("loan_status", &[Some("accepted"), Some("rejected")]),
            text("term", &[Some("36 months"), Some("Months")]),
            text("emp_length", &[Some("2 years"), Some("years")]),
        ])
        .unwrap();

        let out = engineer_features(&df).unwrap();
        assert_eq!(
            names(&out),
            vec![
                "term_months",
                "emp_length_years",
                "term_36 months",
                "emp_length_2 years",
                "loan_status"
            ]
        );
        assert_eq!(floats(&out, "term_months"), vec![Some(36.0), Some(36.0)]);
        assert_eq!(floats(&out, "emp_length_years"), vec![Some(2.0), Some(2.0)]);
        assert_eq!(ints(&out, "term_36 months"), vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_fico_score_missing_bound_is_imputed() {
        let df = DataFrame::new(vec![
            text("fico_range_low", &[Some("700"), None, Some("600")]),
            text("fico_range_high", &[Some("720"), Some("690"), Some("620")]),
        ])
        .unwrap();

        let out = engineer_features(&df).unwrap();
        assert_eq!(
            floats(&out, "fico_score"),
            vec![Some(710.0), Some(660.0), Some(610.0)]
        );
    }

    #[test]
    fn test_absent_fields_are_skipped() {
        let df = DataFrame::new(vec![text("id", &[Some("1")]), text("desc", &[Some("x")])]).unwrap();
        let out = engineer_features(&df).unwrap();
        assert_eq!(out.width(), 0);
    }

    #[test]
    fn test_source_names_are_normalized() {
        let df = DataFrame::new(vec![
            text(" Loan_Status", &[Some("accepted")]),
            text("LOAN_AMNT ", &[Some("500")]),
        ])
        .unwrap();

        let out = engineer_features(&df).unwrap();
        assert_eq!(names(&out), vec!["loan_amnt", "loan_status"]);
    }

    #[test]
    fn test_all_rows_dropped_yields_empty_batch() {
        let df = DataFrame::new(vec![
            text("loan_status", &[Some("pending"), None]),
            text("loan_amnt", &[Some("1"), Some("2")]),
            text("purpose", &[Some("car"), Some("car")]),
        ])
        .unwrap();

        let out = engineer_features(&df).unwrap();
        assert_eq!(out.height(), 0);
        assert_eq!(names(&out), vec!["loan_amnt", "loan_status"]);
    }
}
