use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Cleaning Summary
// ============================================================================

/// Counts and statistics produced as a side channel of cleaning.
///
/// Downstream consumers (reports, charts) read this together with the
/// cleaned dataset; they never need the raw input.
///
/// # Example
///
/// ```rust,ignore
/// let cleaned = TabularCleaner::new(config).clean(df)?;
/// println!("Removed {} duplicates", cleaned.summary.duplicates_removed);
/// println!("Mean age: {:?}", cleaned.summary.mean_age());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    /// Number of rows in the raw input.
    pub rows_before: usize,
    /// Number of rows in the cleaned output.
    pub rows_after: usize,

    /// Exact duplicate rows removed before imputation.
    pub duplicates_removed: usize,
    /// Rows that only became identical after imputation or date
    /// normalization and were collapsed in the final pass.
    pub imputed_duplicates_removed: usize,
    /// Rows dropped because of unparseable dates (`RejectRow` policy).
    pub rows_rejected: usize,

    /// Null count per configured column in the raw input.
    pub null_counts_before: BTreeMap<String, usize>,
    /// Values filled per column during imputation.
    pub nulls_imputed: BTreeMap<String, usize>,
    /// Rounded means computed for mean-imputed columns.
    pub statistics: BTreeMap<String, i64>,

    /// Missing dates replaced by the default date.
    pub dates_defaulted: usize,
    /// Non-missing dates that matched no accepted format.
    pub invalid_dates: usize,

    /// Warnings and notes generated during cleaning.
    pub warnings: Vec<String>,
}

impl CleaningSummary {
    /// Create a new empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the summary.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Rounded mean computed for a column, if any.
    pub fn statistic(&self, column: &str) -> Option<i64> {
        self.statistics.get(column).copied()
    }

    pub fn mean_age(&self) -> Option<i64> {
        self.statistic("Age")
    }

    pub fn mean_salary(&self) -> Option<i64> {
        self.statistic("Salary")
    }

    /// Total number of values filled across all columns.
    pub fn total_nulls_imputed(&self) -> usize {
        self.nulls_imputed.values().sum()
    }

    /// Total number of nulls in the raw input.
    pub fn total_nulls_before(&self) -> usize {
        self.null_counts_before.values().sum()
    }

    /// Rows dropped for any reason.
    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }
}

// ============================================================================
// Stage Outcomes
// ============================================================================

/// What an imputation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImputationOutcome {
    pub nulls_imputed: BTreeMap<String, usize>,
    pub statistics: BTreeMap<String, i64>,
}

/// What a date normalization pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOutcome {
    pub defaulted: usize,
    pub invalid: usize,
    pub rejected: usize,
}

/// A cleaned dataset and its summary.
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    pub data: DataFrame,
    pub summary: CleaningSummary,
}
