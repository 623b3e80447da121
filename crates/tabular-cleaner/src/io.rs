//! CSV input and output.
//!
//! Input is comma-separated UTF-8 with a header row. Empty fields and the
//! usual spreadsheet placeholders ([`CSV_NULL_TOKENS`]) load as nulls. After
//! loading, [`conform_schema`] brings configured columns to the
//! types the cleaner works with: text and date columns as `String`, integer
//! columns as `Float64`.

use crate::config::{CleanerConfig, ColumnKind};
use crate::error::{CleaningError, Result, ResultExt};
use crate::utils::{column_series, float_chunked};
use polars::prelude::*;
use std::fs::{self, File};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rows sampled for schema inference.
const INFER_SCHEMA_ROWS: usize = 100;

/// Cell values read as missing in every column, matched exactly.
pub const CSV_NULL_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn null_tokens() -> Vec<PlSmallStr> {
    CSV_NULL_TOKENS.iter().map(|&token| token.into()).collect()
}

fn csv_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .map_parse_options(|opts| opts.with_null_values(Some(NullValues::AllColumns(null_tokens()))))
}

/// Load a CSV file.
pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CleaningError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )));
    }

    let df = csv_options()
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
        .context(format!("Reading {}", path.display()))?;

    info!("Loaded {} rows x {} columns from {}", df.height(), df.width(), path.display());
    Ok(df)
}

/// Load CSV content from any reader.
pub fn read_csv_from_reader(mut reader: impl Read) -> Result<DataFrame> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;

    let df = csv_options()
        .into_reader_with_file_handle(Cursor::new(content))
        .finish()?;
    Ok(df)
}

/// Check configured columns exist and cast them to their working types.
///
/// Non-numeric text in an integer column fails with
/// [`CleaningError::TypeConversionFailed`]. NaN in an integer column becomes
/// null. Other columns are left alone.
pub fn conform_schema(mut df: DataFrame, config: &CleanerConfig) -> Result<DataFrame> {
    for spec in &config.columns {
        let series = column_series(&df, &spec.name)?;
        let target = match spec.kind {
            ColumnKind::Integer => DataType::Float64,
            ColumnKind::Text | ColumnKind::Date => DataType::String,
        };

        let converted = if series.dtype() == &target {
            series
        } else {
            debug!("Casting '{}' from {} to {}", spec.name, series.dtype(), target);
            series
                .strict_cast(&target)
                .map_err(|e| CleaningError::TypeConversionFailed {
                    column: spec.name.clone(),
                    target_type: target.to_string(),
                    reason: e.to_string(),
                })?
        };

        match spec.kind {
            ColumnKind::Integer => {
                df.replace(&spec.name, float_chunked(&converted)?.into_series())?;
            }
            ColumnKind::Text | ColumnKind::Date => {
                df.replace(&spec.name, converted)?;
            }
        }
    }
    Ok(df)
}

/// Write a DataFrame as CSV with a header, creating parent directories.
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(df)?;

    info!("Dataset saved: {}", path.display());
    Ok(())
}
