//! Dataset profiling.
//!
//! Read-only measurements over a dataset: null counts, duplicate counts,
//! per-column descriptive statistics, correlations and category frequencies. The cleaner
//! uses these for its summary, the CLI for `--dry-run` and the report
//! generator for the cleaned-data section.

mod statistics;

pub use statistics::{ColumnStatistics, pearson_correlation};

use crate::error::Result;
use crate::utils::{column_series, is_numeric_dtype, string_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Pearson correlation between two numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub left: String,
    pub right: String,
    /// `None` when undefined (a constant column or under two paired rows).
    pub coefficient: Option<f64>,
}

/// Data profiler for analyzing dataset structure.
pub struct DataProfiler;

impl DataProfiler {
    /// Null count for each of the given columns.
    ///
    /// Fails with `ColumnNotFound` if a column is missing.
    pub fn null_counts<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<BTreeMap<String, usize>> {
        let mut counts = BTreeMap::new();
        for name in columns {
            let name = name.as_ref();
            let series = column_series(df, name)?;
            counts.insert(name.to_string(), series.null_count());
        }
        Ok(counts)
    }

    /// Null count for every column of the dataset.
    pub fn all_null_counts(df: &DataFrame) -> BTreeMap<String, usize> {
        df.get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect()
    }

    /// Number of rows that repeat an earlier row exactly.
    pub fn duplicate_count(df: &DataFrame) -> Result<usize> {
        let unique = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
        Ok(df.height() - unique.height())
    }

    /// Descriptive statistics for every column, in column order.
    pub fn describe(df: &DataFrame) -> Result<Vec<ColumnStatistics>> {
        df.get_columns()
            .iter()
            .map(|col| ColumnStatistics::from_series(col.as_materialized_series()))
            .collect()
    }

    /// Correlation of every pair of numeric columns, in column order.
    pub fn correlations(df: &DataFrame) -> Result<Vec<Correlation>> {
        let numeric: Vec<&Series> = df
            .get_columns()
            .iter()
            .map(|col| col.as_materialized_series())
            .filter(|series| is_numeric_dtype(series.dtype()))
            .collect();

        let mut correlations = Vec::new();
        for (i, left) in numeric.iter().enumerate() {
            for right in &numeric[i + 1..] {
                correlations.push(Correlation {
                    left: left.name().to_string(),
                    right: right.name().to_string(),
                    coefficient: pearson_correlation(left, right)?,
                });
            }
        }
        Ok(correlations)
    }

    /// Frequency of each non-null value in a column.
    ///
    /// Sorted by count (descending), ties by value, so output is deterministic.
    pub fn value_counts(df: &DataFrame, column: &str) -> Result<Vec<(String, usize)>> {
        let series = column_series(df, column)?;
        let mut counts: HashMap<String, usize> = HashMap::new();
        for value in string_values(&series)?.into_iter().flatten() {
            *counts.entry(value).or_insert(0) += 1;
        }

        let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(sorted)
    }
}
