//! Date column normalization.

use crate::config::{CANONICAL_DATE_FORMAT, InvalidDatePolicy};
use crate::error::{CleaningError, Result};
use crate::types::DateOutcome;
use crate::utils::{column_series, is_missing_marker, parse_date, string_values};
use chrono::NaiveDate;
use polars::prelude::*;
use tracing::{debug, warn};

/// How a single raw date value was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    Parsed(NaiveDate),
    /// Null, empty or a missing marker.
    Missing,
    /// Present but matched none of the formats.
    Invalid,
}

/// Rewrites a date column to `%Y-%m-%d`.
pub struct DateNormalizer<'a> {
    formats: &'a [String],
    policy: InvalidDatePolicy,
}

impl<'a> DateNormalizer<'a> {
    pub fn new(formats: &'a [String], policy: InvalidDatePolicy) -> Self {
        Self { formats, policy }
    }

    pub fn classify(&self, raw: Option<&str>) -> DateValue {
        match raw {
            None => DateValue::Missing,
            Some(value) if is_missing_marker(value) => DateValue::Missing,
            Some(value) => parse_date(value, self.formats)
                .map(DateValue::Parsed)
                .unwrap_or(DateValue::Invalid),
        }
    }

    /// Normalize `column` in place of the original.
    ///
    /// Missing values become `default`. Invalid values are handled per the
    /// configured [`InvalidDatePolicy`]; row indices in errors refer to the
    /// DataFrame passed in.
    pub fn normalize(
        &self,
        mut df: DataFrame,
        column: &str,
        default: NaiveDate,
    ) -> Result<(DataFrame, DateOutcome)> {
        let series = column_series(&df, column)?;
        let raw = string_values(&series)?;

        let mut outcome = DateOutcome::default();
        let mut normalized = Vec::with_capacity(raw.len());
        let mut keep = Vec::with_capacity(raw.len());

        for (row, value) in raw.iter().enumerate() {
            let (date, kept) = match self.classify(value.as_deref()) {
                DateValue::Parsed(date) => (date, true),
                DateValue::Missing => {
                    outcome.defaulted += 1;
                    (default, true)
                }
                DateValue::Invalid => {
                    let value = value.clone().unwrap_or_default();
                    outcome.invalid += 1;
                    match self.policy {
                        InvalidDatePolicy::Coerce => {
                            debug!("Coercing '{}' in '{}' row {} to {}", value, column, row, default);
                            (default, true)
                        }
                        InvalidDatePolicy::RejectRow => {
                            debug!("Rejecting row {}: '{}' in '{}'", row, value, column);
                            outcome.rejected += 1;
                            (default, false)
                        }
                        InvalidDatePolicy::Fail => {
                            return Err(CleaningError::InvalidDate {
                                column: column.to_string(),
                                row,
                                value,
                            });
                        }
                    }
                }
            };
            normalized.push(date.format(CANONICAL_DATE_FORMAT).to_string());
            keep.push(kept);
        }

        if outcome.invalid > 0 {
            warn!(
                "{} unparseable date(s) in '{}' ({:?})",
                outcome.invalid, column, self.policy
            );
        }

        df.replace(column, Series::new(column.into(), normalized))?;

        if outcome.rejected > 0 {
            let mask = BooleanChunked::from_slice("keep".into(), &keep);
            df = df.filter(&mask)?;
        }

        Ok((df, outcome))
    }
}
