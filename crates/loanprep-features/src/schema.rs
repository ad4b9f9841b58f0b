//! Canonical output schema and batch reconciliation.
//!
//! The schema is the engineered sample's column order. Every later batch is
//! projected onto it: schema columns the batch lacks are zero-filled and
//! columns the schema lacks are discarded.

use std::collections::BTreeMap;

use polars::prelude::*;
use tracing::{debug, info};

use crate::engineer::engineer_features;
use crate::error::Result;

/// Ordered output column list, fixed once per run.
///
/// There is no way to change a schema after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalSchema {
    columns: Vec<String>,
    index: BTreeMap<String, usize>,
}

/// A batch projected onto the canonical schema.
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// Schema columns in schema order.
    pub frame: DataFrame,
    /// Batch columns absent from the schema, discarded.
    pub dropped: Vec<String>,
    /// Schema columns absent from the batch, filled with zeros.
    pub zero_filled: Vec<String>,
}

/// Result of resolving the schema from a sample.
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    /// The engineered sample; the first segment written to the output.
    pub sample: DataFrame,
    pub schema: CanonicalSchema,
}

impl CanonicalSchema {
    /// Take the schema from a frame's column order.
    pub fn from_frame(df: &DataFrame) -> Self {
        Self::from_columns(
            df.get_column_names()
                .into_iter()
                .map(|name| name.to_string()),
        )
    }

    /// Build a schema from column names. Later repeats of a name are ignored.
    pub fn from_columns(names: impl IntoIterator<Item = String>) -> Self {
        let mut columns = Vec::new();
        let mut index = BTreeMap::new();
        for name in names {
            if !index.contains_key(&name) {
                index.insert(name.clone(), columns.len());
                columns.push(name);
            }
        }
        Self { columns, index }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Position of `name` in the schema.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Project `df` onto the schema.
    ///
    /// The result has exactly the schema's columns in schema order. A schema
    /// column the batch lacks becomes an `Int32` column of zeros; a batch
    /// column the schema lacks (for example an indicator for a category the
    /// sample never saw) is dropped.
    pub fn reconcile(&self, df: &DataFrame) -> Result<Reconciled> {
        let height = df.height();
        let mut columns = Vec::with_capacity(self.columns.len());
        let mut zero_filled = Vec::new();
        for name in &self.columns {
            match df.column(name) {
                Ok(column) => columns.push(column.clone()),
                Err(_) => {
                    zero_filled.push(name.clone());
                    columns.push(
                        Series::new(name.as_str().into(), vec![0i32; height]).into_column(),
                    );
                }
            }
        }
        let dropped: Vec<String> = df
            .get_column_names()
            .into_iter()
            .filter(|name| !self.contains(name.as_str()))
            .map(|name| name.to_string())
            .collect();

        if !dropped.is_empty() || !zero_filled.is_empty() {
            debug!(
                dropped = ?dropped,
                zero_filled = ?zero_filled,
                "batch columns differ from schema"
            );
        }

        Ok(Reconciled {
            frame: DataFrame::new(columns)?,
            dropped,
            zero_filled,
        })
    }
}

/// Engineer the raw sample and fix the canonical schema from its columns.
pub fn resolve_schema(sample: &DataFrame) -> Result<ResolvedSchema> {
    let engineered = engineer_features(sample)?;
    let schema = CanonicalSchema::from_frame(&engineered);
    info!(
        sample_rows = sample.height(),
        kept_rows = engineered.height(),
        columns = schema.len(),
        "resolved canonical schema"
    );
    Ok(ResolvedSchema {
        sample: engineered,
        schema,
    })
}
