use crate::error::Result;
use crate::profiler::{ColumnStatistics, Correlation, DataProfiler};
use crate::types::{CleanedDataset, CleaningSummary};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Columns whose category frequencies are reported by default.
pub const DEFAULT_CATEGORY_COLUMNS: [&str; 1] = ["Country"];

// ============================================================================
// Report Types
// ============================================================================

/// Everything known about one cleaning run.
///
/// Used both for `--json` output and for `--emit-report` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    pub generated_at: String,
    pub input_file: String,
    /// Path of the cleaned CSV, if one was written.
    pub output_file: Option<String>,

    pub summary: CleaningSummary,

    /// Exact duplicates present in the raw input.
    pub raw_duplicate_rows: usize,
    /// Per-column statistics of the raw input.
    pub raw_columns: Vec<ColumnStatistics>,
    /// Per-column statistics of the cleaned output.
    pub cleaned_columns: Vec<ColumnStatistics>,
    /// Pairwise correlation of numeric columns in the cleaned output.
    pub correlations: Vec<Correlation>,

    /// Category frequencies in the cleaned output, per column.
    pub value_counts: BTreeMap<String, Vec<ValueCount>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

// ============================================================================
// Generator
// ============================================================================

/// Builds [`CleaningReport`]s and writes them next to the cleaned data.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
    category_columns: Vec<String>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(PathBuf::from("output"))
    }
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            category_columns: DEFAULT_CATEGORY_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }

    /// Replace the columns whose value counts are reported.
    pub fn with_category_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Assemble a report from a raw input and its cleaned result.
    ///
    /// Category columns missing from the cleaned data are skipped.
    pub fn build_report(
        &self,
        input_file: &str,
        output_file: Option<&Path>,
        raw: &DataFrame,
        cleaned: &CleanedDataset,
    ) -> Result<CleaningReport> {
        let mut value_counts = BTreeMap::new();
        for column in &self.category_columns {
            if cleaned.data.column(column).is_err() {
                debug!("Skipping value counts for missing column '{}'", column);
                continue;
            }
            let counts = DataProfiler::value_counts(&cleaned.data, column)?
                .into_iter()
                .map(|(value, count)| ValueCount { value, count })
                .collect();
            value_counts.insert(column.clone(), counts);
        }

        Ok(CleaningReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_file: output_file.map(|p| p.display().to_string()),
            summary: cleaned.summary.clone(),
            raw_duplicate_rows: DataProfiler::duplicate_count(raw)?,
            raw_columns: DataProfiler::describe(raw)?,
            cleaned_columns: DataProfiler::describe(&cleaned.data)?,
            correlations: DataProfiler::correlations(&cleaned.data)?,
            value_counts,
        })
    }

    /// Write a report as pretty JSON to `<output_dir>/<base_name>_report.json`.
    pub fn write_report_to_file(&self, report: &CleaningReport, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(format!("{}_report.json", base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}
