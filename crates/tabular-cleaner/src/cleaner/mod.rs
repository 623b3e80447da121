//! Core cleaning operations.
//!
//! [`TabularCleaner`] owns a [`CleanerConfig`] and exposes each step of the
//! cleaning run on its own, plus [`TabularCleaner::clean`] which chains them:
//!
//! 1. schema check and raw null counts
//! 2. exact duplicate removal
//! 3. imputation, with every fill value taken from the deduplicated input
//! 4. date normalization for each date column
//! 5. a final duplicate pass over rows that imputation made identical
//!
//! Every operation takes the DataFrame and hands back a new one.

mod dates;

pub use dates::{DateNormalizer, DateValue};

use crate::config::{CleanerConfig, ColumnKind, ColumnSpec, ImputationRule};
use crate::error::{CleaningError, Result};
use crate::imputers::StatisticalImputer;
use crate::pipeline::progress::{CleaningStage, ProgressUpdate};
use crate::profiler::DataProfiler;
use crate::types::{CleanedDataset, CleaningSummary, DateOutcome, ImputationOutcome};
use crate::utils::{column_series, float_chunked, parse_date};
use chrono::NaiveDate;
use polars::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Cleans employee-style tabular records according to a [`CleanerConfig`].
#[derive(Debug, Clone, Default)]
pub struct TabularCleaner {
    config: CleanerConfig,
}

impl TabularCleaner {
    pub fn new(config: CleanerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Drop rows that repeat an earlier row on every column.
    ///
    /// The first occurrence wins and row order is kept. Nulls compare equal
    /// to each other. Returns the number of rows removed.
    pub fn remove_duplicates(&self, df: DataFrame) -> Result<(DataFrame, usize)> {
        let before = df.height();
        let unique = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
        let removed = before - unique.height();
        if removed > 0 {
            debug!("Removed {} duplicate rows", removed);
        }
        Ok((unique, removed))
    }

    /// Rounded (half-to-even) mean of a numeric column's non-null values.
    pub fn compute_statistic(&self, df: &DataFrame, column: &str) -> Result<i64> {
        let series = column_series(df, column)?;
        StatisticalImputer::rounded_mean(&series)
    }

    /// Fill missing values of every configured column.
    ///
    /// All fill values are derived from `df` as passed in before any column is
    /// replaced, so the result does not depend on column order.
    pub fn impute(&self, df: DataFrame) -> Result<(DataFrame, ImputationOutcome)> {
        let mut outcome = ImputationOutcome::default();
        let mut planned: Vec<(String, Series)> = Vec::with_capacity(self.config.columns.len());

        for spec in &self.config.columns {
            let series = column_series(&df, &spec.name)?;
            let (filled, count) = self.impute_column(spec, &series, &mut outcome)?;
            if spec.rule.is_some() {
                outcome.nulls_imputed.insert(spec.name.clone(), count);
            }
            planned.push((spec.name.clone(), filled));
        }

        let mut df = df;
        for (name, series) in planned {
            df.replace(&name, series)?;
        }

        Ok((df, outcome))
    }

    fn impute_column(
        &self,
        spec: &ColumnSpec,
        series: &Series,
        outcome: &mut ImputationOutcome,
    ) -> Result<(Series, usize)> {
        match spec.kind {
            ColumnKind::Integer => {
                let series = &float_chunked(series)?.into_series();
                let fill = match &spec.rule {
                    Some(ImputationRule::Mean) => {
                        match StatisticalImputer::rounded_mean(series) {
                            Ok(mean) => {
                                outcome.statistics.insert(spec.name.clone(), mean);
                                Some(mean as f64)
                            }
                            // Nothing to fill, so nothing to compute.
                            Err(CleaningError::MissingStatistic(_)) if series.null_count() == 0 => {
                                None
                            }
                            Err(e) => return Err(e),
                        }
                    }
                    Some(ImputationRule::Constant(value)) => {
                        let parsed = value.trim().parse::<f64>().map_err(|e| {
                            CleaningError::InvalidConfig(format!(
                                "fill value '{}' for '{}' is not a number: {}",
                                value, spec.name, e
                            ))
                        })?;
                        Some(parsed)
                    }
                    None => None,
                };
                StatisticalImputer::fill_integer(series, fill)
            }
            ColumnKind::Text | ColumnKind::Date => {
                let fill = match &spec.rule {
                    Some(ImputationRule::Constant(value)) => Some(value.as_str()),
                    Some(ImputationRule::Mean) => {
                        return Err(CleaningError::InvalidConfig(format!(
                            "mean imputation on non-numeric column '{}'",
                            spec.name
                        )));
                    }
                    None => None,
                };
                StatisticalImputer::fill_text(series, fill)
            }
        }
    }

    /// Rewrite a date column to `%Y-%m-%d`, defaulting missing values.
    pub fn normalize_dates(
        &self,
        df: DataFrame,
        column: &str,
        default: NaiveDate,
    ) -> Result<(DataFrame, DateOutcome)> {
        DateNormalizer::new(&self.config.date_formats, self.config.invalid_dates)
            .normalize(df, column, default)
    }

    /// Run the whole cleaning sequence.
    pub fn clean(&self, df: DataFrame) -> Result<CleanedDataset> {
        self.clean_with_progress(df, &|_: ProgressUpdate| {})
    }

    pub(crate) fn clean_with_progress(
        &self,
        df: DataFrame,
        report: &dyn Fn(ProgressUpdate),
    ) -> Result<CleanedDataset> {
        let start = Instant::now();
        let mut summary = CleaningSummary::new();
        summary.rows_before = df.height();

        report(ProgressUpdate::new(
            CleaningStage::Initializing,
            0.0,
            format!("Cleaning {} rows x {} columns", df.height(), df.width()),
        ));
        info!("Cleaning {} rows x {} columns", df.height(), df.width());

        report(ProgressUpdate::new(CleaningStage::Validating, 0.0, "Checking columns"));
        self.check_columns(&df)?;
        let names: Vec<&str> = self.config.columns.iter().map(|c| c.name.as_str()).collect();
        summary.null_counts_before = DataProfiler::null_counts(&df, &names)?;

        report(ProgressUpdate::new(CleaningStage::Deduplicating, 0.0, "Removing duplicate rows"));
        let (df, removed) = self.remove_duplicates(df)?;
        summary.duplicates_removed = removed;
        info!("Removed {} duplicate rows", removed);

        report(ProgressUpdate::new(CleaningStage::Imputing, 0.0, "Filling missing values"));
        let (mut df, imputation) = self.impute(df)?;
        for (column, count) in &imputation.nulls_imputed {
            debug!("Imputed {} values in '{}'", count, column);
        }
        summary.nulls_imputed = imputation.nulls_imputed;
        summary.statistics = imputation.statistics;

        let date_columns = self.config.date_columns();
        for (i, column) in date_columns.iter().enumerate() {
            report(ProgressUpdate::for_column(
                CleaningStage::NormalizingDates,
                column,
                i,
                date_columns.len(),
                format!("Normalizing '{}'", column),
            ));
            let default = self.default_date_for(column);
            let (next, outcome) = self.normalize_dates(df, column, default)?;
            df = next;
            summary.dates_defaulted += outcome.defaulted;
            summary.invalid_dates += outcome.invalid;
            summary.rows_rejected += outcome.rejected;
            if outcome.invalid > 0 {
                summary.add_warning(format!(
                    "{} unparseable date(s) in '{}' handled as {:?}",
                    outcome.invalid, column, self.config.invalid_dates
                ));
            }
        }

        report(ProgressUpdate::new(CleaningStage::Finalizing, 0.0, "Final duplicate pass"));
        let (df, collapsed) = self.remove_duplicates(df)?;
        if collapsed > 0 {
            warn!("{} row(s) became duplicates after imputation and were removed", collapsed);
            summary.add_warning(format!(
                "{} row(s) became duplicates after imputation and were removed",
                collapsed
            ));
        }
        summary.imputed_duplicates_removed = collapsed;

        summary.rows_after = df.height();
        summary.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Cleaning finished: {} -> {} rows in {}ms",
            summary.rows_before, summary.rows_after, summary.duration_ms
        );

        Ok(CleanedDataset { data: df, summary })
    }

    fn check_columns(&self, df: &DataFrame) -> Result<()> {
        for spec in &self.config.columns {
            if df.column(&spec.name).is_err() {
                return Err(CleaningError::ColumnNotFound(spec.name.clone()));
            }
        }
        Ok(())
    }

    /// The column's own constant if it has one, else the configured default.
    fn default_date_for(&self, column: &str) -> NaiveDate {
        match self.config.column(column).and_then(|c| c.rule.as_ref()) {
            Some(ImputationRule::Constant(value)) => {
                parse_date(value, &self.config.date_formats).unwrap_or(self.config.default_date)
            }
            _ => self.config.default_date,
        }
    }
}
