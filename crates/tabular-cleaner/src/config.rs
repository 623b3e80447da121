//! Configuration types for the cleaning pipeline.
//!
//! Every fallback value the cleaner uses lives here as explicit per-column
//! configuration, so the same pipeline can be reused for other schemas. The
//! [`CleanerConfig::default()`] configuration describes the employee-record
//! schema (`Name`, `Email`, `PhoneNumber`, `Age`, `Country`, `Salary`,
//! `JoiningDate`).

use crate::error::{CleaningError, Result};
use crate::utils::parse_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Output representation of every normalized date.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date formats accepted when normalizing a date column, tried in order.
///
/// Slash-separated dates are read month-first.
pub const DEFAULT_DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Default fill value for missing dates.
pub const DEFAULT_FALLBACK_DATE: &str = "2025-01-04";

/// Default name of the cleaned CSV (without extension).
pub const DEFAULT_OUTPUT_NAME: &str = "cleaned_data";

/// Storage class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Free text, kept as strings.
    Text,
    /// Whole numbers. Read as floats, written as rounded integers.
    Integer,
    /// Calendar dates, normalized to [`CANONICAL_DATE_FORMAT`].
    Date,
}

/// How missing values in a column are replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "value", rename_all = "snake_case")]
pub enum ImputationRule {
    /// Replace with a fixed value.
    Constant(String),
    /// Replace with the mean of the column's non-null values, rounded
    /// half-to-even.
    Mean,
}

impl ImputationRule {
    /// Short label used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Constant(_) => "constant",
            Self::Mean => "mean",
        }
    }
}

/// What to do with a non-missing date that matches no accepted format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvalidDatePolicy {
    /// Replace the value with the default date and count it.
    #[default]
    Coerce,
    /// Drop the whole row and count it.
    RejectRow,
    /// Abort the run with [`CleaningError::InvalidDate`].
    Fail,
}

/// Schema entry for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    /// Missing-value rule. Columns without a rule keep their nulls.
    #[serde(default)]
    pub rule: Option<ImputationRule>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: ColumnKind, rule: Option<ImputationRule>) -> Self {
        Self {
            name: name.into(),
            kind,
            rule,
        }
    }

    /// Text column filled with a constant.
    pub fn text(name: impl Into<String>, fill: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Text, Some(ImputationRule::Constant(fill.into())))
    }

    /// Integer column filled with its rounded mean.
    pub fn integer_mean(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Integer, Some(ImputationRule::Mean))
    }

    /// Date column filled with a fixed date.
    pub fn date(name: impl Into<String>, fill: NaiveDate) -> Self {
        Self::new(
            name,
            ColumnKind::Date,
            Some(ImputationRule::Constant(
                fill.format(CANONICAL_DATE_FORMAT).to_string(),
            )),
        )
    }
}

/// The employee-record schema with its fallback values.
pub fn employee_schema(default_date: NaiveDate) -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::text("Name", "Unknown"),
        ColumnSpec::text("Email", "missing@email.com"),
        ColumnSpec::text("PhoneNumber", "Unavailable"),
        ColumnSpec::integer_mean("Age"),
        ColumnSpec::text("Country", "Unknown"),
        ColumnSpec::integer_mean("Salary"),
        ColumnSpec::date("JoiningDate", default_date),
    ]
}

fn fallback_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 4).unwrap_or_default()
}

/// Configuration for the cleaner.
///
/// Use [`CleanerConfig::builder()`] to create a new configuration with a
/// fluent API, or [`CleanerConfig::from_json_file`] to load one.
///
/// # Example
///
/// ```rust,ignore
/// use tabular_cleaner::config::{CleanerConfig, InvalidDatePolicy};
///
/// let config = CleanerConfig::builder()
///     .invalid_dates(InvalidDatePolicy::RejectRow)
///     .output_dir("output")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct CleanerConfig {
    /// Ordered column schema. Every column listed here must exist in the input.
    /// Default: the employee-record schema
    pub columns: Vec<ColumnSpec>,

    /// Date used for missing and coerced values in date columns.
    /// Default: 2025-01-04
    pub default_date: NaiveDate,

    /// Accepted input date formats (chrono syntax), tried in order.
    /// Default: [`DEFAULT_DATE_FORMATS`]
    pub date_formats: Vec<String>,

    /// Handling of unparseable dates.
    /// Default: Coerce
    pub invalid_dates: InvalidDatePolicy,

    /// Output directory for the cleaned CSV and reports.
    /// Default: "output"
    pub output_dir: PathBuf,

    /// File name of the cleaned CSV (without extension).
    /// Default: "cleaned_data"
    pub output_name: String,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        let default_date = fallback_date();
        Self {
            columns: employee_schema(default_date),
            default_date,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
            invalid_dates: InvalidDatePolicy::default(),
            output_dir: PathBuf::from("output"),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
        }
    }
}

impl CleanerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleanerConfigBuilder {
        CleanerConfigBuilder::default()
    }

    /// Load and validate a configuration from a JSON file.
    ///
    /// Fields missing from the file take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CleaningError::Io(e).with_context(format!("Reading config {}", path.display()))
        })?;
        let config: CleanerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Look up the rules for a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of all date columns, in schema order.
    pub fn date_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Date)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Path of the cleaned CSV.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.csv", self.output_name))
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if self.columns.is_empty() {
            return Err(ConfigValidationError::EmptySchema);
        }

        if self.date_formats.is_empty() {
            return Err(ConfigValidationError::NoDateFormats);
        }

        let mut seen = HashSet::new();
        for spec in &self.columns {
            if !seen.insert(spec.name.as_str()) {
                return Err(ConfigValidationError::DuplicateColumn(spec.name.clone()));
            }

            match (&spec.rule, spec.kind) {
                (Some(ImputationRule::Mean), ColumnKind::Text | ColumnKind::Date) => {
                    return Err(ConfigValidationError::MeanOnNonNumeric(spec.name.clone()));
                }
                (Some(ImputationRule::Constant(value)), ColumnKind::Integer) => {
                    if value.trim().parse::<f64>().is_err() {
                        return Err(ConfigValidationError::InvalidConstant {
                            column: spec.name.clone(),
                            value: value.clone(),
                            reason: "not a number".to_string(),
                        });
                    }
                }
                (Some(ImputationRule::Constant(value)), ColumnKind::Date) => {
                    if parse_date(value, &self.date_formats).is_none() {
                        return Err(ConfigValidationError::InvalidConstant {
                            column: spec.name.clone(),
                            value: value.clone(),
                            reason: "not a date in any accepted format".to_string(),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// On-disk form of [`CleanerConfig`]. Absent fields take the builder's
/// defaults, so an omitted schema follows `default_date` too.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    columns: Option<Vec<ColumnSpec>>,
    default_date: Option<NaiveDate>,
    date_formats: Option<Vec<String>>,
    invalid_dates: Option<InvalidDatePolicy>,
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
}

impl From<ConfigFile> for CleanerConfig {
    fn from(file: ConfigFile) -> Self {
        CleanerConfigBuilder {
            columns: file.columns,
            default_date: file.default_date,
            date_formats: file.date_formats,
            invalid_dates: file.invalid_dates,
            output_dir: file.output_dir,
            output_name: file.output_name,
        }
        .assemble()
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Column schema is empty")]
    EmptySchema,

    #[error("Column '{0}' is listed more than once")]
    DuplicateColumn(String),

    #[error("Mean imputation requires an integer column, but '{0}' is not")]
    MeanOnNonNumeric(String),

    #[error("Invalid fill value '{value}' for column '{column}': {reason}")]
    InvalidConstant {
        column: String,
        value: String,
        reason: String,
    },

    #[error("At least one accepted date format is required")]
    NoDateFormats,
}

/// Builder for [`CleanerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleanerConfigBuilder {
    columns: Option<Vec<ColumnSpec>>,
    default_date: Option<NaiveDate>,
    date_formats: Option<Vec<String>>,
    invalid_dates: Option<InvalidDatePolicy>,
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
}

impl CleanerConfigBuilder {
    /// Replace the whole column schema.
    pub fn columns(mut self, columns: Vec<ColumnSpec>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Append a column to the schema.
    ///
    /// The first call starts from an empty schema rather than the employee
    /// schema.
    pub fn column(mut self, spec: ColumnSpec) -> Self {
        self.columns.get_or_insert_with(Vec::new).push(spec);
        self
    }

    /// Set the date used for missing dates.
    ///
    /// When no schema is given, the employee schema's `JoiningDate` rule uses
    /// this date as well.
    pub fn default_date(mut self, date: NaiveDate) -> Self {
        self.default_date = Some(date);
        self
    }

    /// Set the accepted input date formats.
    pub fn date_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_formats = Some(formats.into_iter().map(Into::into).collect());
        self
    }

    /// Set the handling of unparseable dates.
    pub fn invalid_dates(mut self, policy: InvalidDatePolicy) -> Self {
        self.invalid_dates = Some(policy);
        self
    }

    /// Set the output directory.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the cleaned CSV name (without extension).
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleanerConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<CleanerConfig, ConfigValidationError> {
        let config = self.assemble();
        config.validate()?;
        Ok(config)
    }

    fn assemble(self) -> CleanerConfig {
        let default_date = self.default_date.unwrap_or_else(fallback_date);
        CleanerConfig {
            columns: self
                .columns
                .unwrap_or_else(|| employee_schema(default_date)),
            default_date,
            date_formats: self
                .date_formats
                .unwrap_or_else(|| DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect()),
            invalid_dates: self.invalid_dates.unwrap_or_default(),
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from("output")),
            output_name: self
                .output_name
                .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string()),
        }
    }
}
