//! Shared utilities for the cleaning pipeline.
//!
//! Helpers for moving column values in and out of polars, parsing dates and
//! the rounding rule used for every derived statistic.

use crate::error::{CleaningError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// Missing Value Markers
// =============================================================================

/// Text placeholders treated as a missing value in date columns.
pub const MISSING_MARKERS: [&str; 8] = ["", "nan", "nat", "null", "none", "n/a", "na", "missing"];

/// Check if a string is a placeholder for a missing value.
///
/// # Example
///
/// ```rust,ignore
/// use tabular_cleaner::utils::is_missing_marker;
///
/// assert!(is_missing_marker("NaT"));
/// assert!(is_missing_marker("  "));
/// assert!(!is_missing_marker("2023-01-05"));
/// ```
pub fn is_missing_marker(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    MISSING_MARKERS.iter().any(|&marker| lower == marker)
}

// =============================================================================
// Date Parsing
// =============================================================================

/// Parse a date string with the first matching format.
///
/// Formats carrying a time component are parsed as datetimes and truncated to
/// their date.
pub fn parse_date<S: AsRef<str>>(value: &str, formats: &[S]) -> Option<NaiveDate> {
    let trimmed = value.trim();
    for fmt in formats {
        let fmt = fmt.as_ref();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(datetime.date());
        }
    }
    None
}

// =============================================================================
// Statistics
// =============================================================================

/// Round to the nearest integer, ties to the even neighbour.
///
/// `30.5` rounds to `30`, `31.5` rounds to `32`.
#[inline]
pub fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

/// Cast a Series to `Float64`, reading NaN as null.
///
/// Polars reductions skip nulls but propagate NaN, so every statistic goes
/// through here.
pub fn float_chunked(series: &Series) -> PolarsResult<Float64Chunked> {
    let floats = series.cast(&DataType::Float64)?;
    let ca: Float64Chunked = floats
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(ca.with_name(series.name().clone()))
}

// =============================================================================
// Series Access
// =============================================================================

/// Get a column as a materialized Series, failing with `ColumnNotFound`.
pub fn column_series(df: &DataFrame, name: &str) -> Result<Series> {
    df.column(name)
        .map(|col| col.as_materialized_series().clone())
        .map_err(|_| CleaningError::ColumnNotFound(name.to_string()))
}

/// Read a Series as optional floats, NaN as `None`.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let ca = float_chunked(series)?;
    Ok(ca.into_iter().collect())
}

/// Read a Series as optional owned strings.
pub fn string_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let strings = series.cast(&DataType::String)?;
    Ok(strings
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DATE_FORMATS;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_is_missing_marker() {
        assert!(is_missing_marker(""));
        assert!(is_missing_marker("   "));
        assert!(is_missing_marker("NaN"));
        assert!(is_missing_marker("NaT"));
        assert!(is_missing_marker("N/A"));
        assert!(is_missing_marker("  MISSING  "));
        assert!(!is_missing_marker("2023-01-05"));
        assert!(!is_missing_marker("Unknown"));
    }

    #[test]
    fn test_parse_date_accepted_formats() {
        let expected = ymd(2023, 1, 5);
        assert_eq!(parse_date("2023-01-05", &DEFAULT_DATE_FORMATS), Some(expected));
        assert_eq!(parse_date("2023-1-5", &DEFAULT_DATE_FORMATS), Some(expected));
        assert_eq!(parse_date("01/05/2023", &DEFAULT_DATE_FORMATS), Some(expected));
        assert_eq!(parse_date("2023/01/05", &DEFAULT_DATE_FORMATS), Some(expected));
        assert_eq!(parse_date("05.01.2023", &DEFAULT_DATE_FORMATS), Some(expected));
        assert_eq!(
            parse_date("2023-01-05 13:45:00", &DEFAULT_DATE_FORMATS),
            Some(expected)
        );
        assert_eq!(
            parse_date(" 2023-01-05T08:00:00 ", &DEFAULT_DATE_FORMATS),
            Some(expected)
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("yesterday", &DEFAULT_DATE_FORMATS), None);
        assert_eq!(parse_date("2023-13-45", &DEFAULT_DATE_FORMATS), None);
        assert_eq!(parse_date("2023-02-30", &DEFAULT_DATE_FORMATS), None);
    }

    #[test]
    fn test_parse_date_respects_format_list() {
        let only_iso = ["%Y-%m-%d"];
        assert_eq!(parse_date("01/05/2023", &only_iso), None);
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(30.5), 30.0);
        assert_eq!(round_half_even(31.5), 32.0);
        assert_eq!(round_half_even(30.4), 30.0);
        assert_eq!(round_half_even(30.6), 31.0);
        assert_eq!(round_half_even(-2.5), -2.0);
    }

    #[test]
    fn test_float_chunked_reads_nan_as_null() {
        let series = Series::new("age".into(), &[Some(30.0), Some(f64::NAN), None, Some(40.0)]);
        let ca = float_chunked(&series).unwrap();

        assert_eq!(ca.name().as_str(), "age");
        assert_eq!(ca.null_count(), 2);
        assert_eq!(ca.mean(), Some(35.0));
    }

    #[test]
    fn test_float_chunked_all_null_has_no_mean() {
        let series = Series::new("age".into(), &[None::<f64>, Some(f64::NAN)]);
        assert_eq!(float_chunked(&series).unwrap().mean(), None);
    }

    #[test]
    fn test_numeric_values_from_integers() {
        let series = Series::new("age".into(), &[Some(30i64), None, Some(40)]);
        assert_eq!(
            numeric_values(&series).unwrap(),
            vec![Some(30.0), None, Some(40.0)]
        );

        let floats = Series::new("age".into(), &[Some(f64::NAN), Some(1.5)]);
        assert_eq!(numeric_values(&floats).unwrap(), vec![None, Some(1.5)]);
    }

    #[test]
    fn test_string_values() {
        let series = Series::new("name".into(), &[Some("a"), None]);
        assert_eq!(
            string_values(&series).unwrap(),
            vec![Some("a".to_string()), None]
        );
    }

    #[test]
    fn test_column_series_missing() {
        let df = df!["a" => [1, 2]].unwrap();
        assert!(matches!(
            column_series(&df, "b"),
            Err(CleaningError::ColumnNotFound(name)) if name == "b"
        ));
    }
}
