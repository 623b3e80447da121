//! Integration tests for the cleaning pipeline.
//!
//! End-to-end runs over CSV files on disk.

use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tabular_cleaner::{
    CleanerConfig, CleaningError, DataProfiler, InvalidDatePolicy, Pipeline, ReportGenerator, io,
};
use tempfile::tempdir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn dirty_csv() -> PathBuf {
    fixtures_path().join("dirty_data.csv")
}

fn column_strings(df: &DataFrame, name: &str) -> Vec<String> {
    df.column(name)
        .unwrap()
        .cast(&DataType::String)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

// ============================================================================
// Full Pipeline Tests
// ============================================================================

#[test]
fn test_clean_file_end_to_end() {
    let dir = tempdir().unwrap();
    let input = dirty_csv();
    let config = CleanerConfig::builder()
        .output_dir(dir.path().join("output"))
        .build()
        .unwrap();

    let raw = io::conform_schema(io::read_csv(&input).unwrap(), &config).unwrap();
    let mut cleaned = Pipeline::builder()
        .config(config.clone())
        .build()
        .unwrap()
        .process(raw)
        .unwrap();

    assert_eq!(cleaned.summary.rows_before, 5);
    assert_eq!(cleaned.summary.rows_after, 4);
    assert_eq!(cleaned.summary.duplicates_removed, 1);
    assert_eq!(cleaned.summary.mean_age(), Some(40));
    assert_eq!(cleaned.summary.mean_salary(), Some(60_000));

    io::write_csv(&mut cleaned.data, config.output_path()).unwrap();
    let written = io::read_csv(config.output_path()).unwrap();

    assert_eq!(
        column_strings(&written, "Name"),
        vec!["Alice", "Bob", "Unknown", "Dan"]
    );
    assert_eq!(
        column_strings(&written, "Email"),
        vec![
            "alice@example.com",
            "missing@email.com",
            "carol@example.com",
            "dan@example.com"
        ]
    );
    assert_eq!(column_strings(&written, "Age"), vec!["30", "40", "40", "50"]);
    assert_eq!(
        column_strings(&written, "Country"),
        vec!["USA", "Unknown", "UK", "India"]
    );
    assert_eq!(
        column_strings(&written, "Salary"),
        vec!["50000", "60000", "70000", "60000"]
    );
    assert_eq!(
        column_strings(&written, "JoiningDate"),
        vec!["2023-01-05", "2023-01-05", "2025-01-04", "2022-12-31"]
    );

    for column in written.get_columns() {
        assert_eq!(column.null_count(), 0, "nulls left in {}", column.name());
    }
    assert_eq!(DataProfiler::duplicate_count(&written).unwrap(), 0);
}

#[test]
fn test_cleaning_written_output_is_stable() {
    let dir = tempdir().unwrap();
    let input = dirty_csv();
    let config = CleanerConfig::builder()
        .output_dir(dir.path())
        .build()
        .unwrap();
    let pipeline = Pipeline::builder().config(config.clone()).build().unwrap();

    let raw = io::conform_schema(io::read_csv(&input).unwrap(), &config).unwrap();
    let mut first = pipeline.process(raw).unwrap();
    io::write_csv(&mut first.data, config.output_path()).unwrap();

    let reloaded = io::conform_schema(io::read_csv(config.output_path()).unwrap(), &config).unwrap();
    let second = pipeline.process(reloaded).unwrap();

    assert!(second.data.equals_missing(&first.data));
    assert_eq!(second.summary.duplicates_removed, 0);
    assert_eq!(second.summary.total_nulls_imputed(), 0);
    assert_eq!(second.summary.dates_defaulted, 0);
}

#[test]
fn test_placeholder_tokens_are_imputed() {
    let input = fixtures_path().join("placeholder_tokens.csv");
    let config = CleanerConfig::default();

    let raw = io::conform_schema(io::read_csv(&input).unwrap(), &config).unwrap();
    assert_eq!(raw.column("Age").unwrap().null_count(), 2);

    let cleaned = Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .process(raw)
        .unwrap();

    assert_eq!(cleaned.summary.mean_age(), Some(40));
    assert_eq!(cleaned.summary.mean_salary(), Some(60_000));
    assert_eq!(cleaned.summary.null_counts_before["Name"], 1);
    assert_eq!(cleaned.summary.null_counts_before["Country"], 1);

    let data = &cleaned.data;
    assert_eq!(column_strings(data, "Name"), vec!["Alice", "Unknown", "Eve", "Finn"]);
    assert_eq!(
        column_strings(data, "Email"),
        vec![
            "alice@example.com",
            "nan@example.com",
            "eve@example.com",
            "missing@email.com"
        ]
    );
    assert_eq!(
        column_strings(data, "PhoneNumber"),
        vec!["555-0101", "555-0102", "Unavailable", "555-0104"]
    );
    assert_eq!(column_strings(data, "Age"), vec!["30", "40", "40", "50"]);
    assert_eq!(column_strings(data, "Country"), vec!["USA", "Unknown", "UK", "India"]);
    assert_eq!(
        column_strings(data, "Salary"),
        vec!["50000", "60000", "60000", "70000"]
    );
    assert_eq!(
        column_strings(data, "JoiningDate"),
        vec!["2023-01-05", "2025-01-04", "2023-02-01", "2025-01-04"]
    );
}

// ============================================================================
// Configuration and Failure Tests
// ============================================================================

#[test]
fn test_rules_from_json_file() {
    let dir = tempdir().unwrap();
    let rules = dir.path().join("rules.json");
    fs::write(
        &rules,
        r#"{
            "columns": [
                {"name": "Name", "kind": "text", "rule": {"strategy": "constant", "value": "N/A"}},
                {"name": "Age", "kind": "integer", "rule": {"strategy": "mean"}},
                {"name": "JoiningDate", "kind": "date"}
            ],
            "invalid_dates": "reject_row"
        }"#,
    )
    .unwrap();

    let config = CleanerConfig::from_json_file(&rules).unwrap();
    assert_eq!(config.invalid_dates, InvalidDatePolicy::RejectRow);

    let csv = "Name,Age,JoiningDate,Notes\n\
               ,20,2023-03-01,first\n\
               Eve,,someday,second\n\
               Finn,30,,third\n";
    let raw = io::conform_schema(io::read_csv_from_reader(csv.as_bytes()).unwrap(), &config)
        .unwrap();
    let cleaned = Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .process(raw)
        .unwrap();

    assert_eq!(cleaned.summary.rows_rejected, 1);
    assert_eq!(cleaned.summary.dates_defaulted, 1);
    assert_eq!(column_strings(&cleaned.data, "Name"), vec!["N/A", "Finn"]);
    assert_eq!(column_strings(&cleaned.data, "Age"), vec!["20", "30"]);
    assert_eq!(
        column_strings(&cleaned.data, "JoiningDate"),
        vec!["2023-03-01", "2025-01-04"]
    );
    assert_eq!(column_strings(&cleaned.data, "Notes"), vec!["first", "third"]);
}

#[test]
fn test_non_numeric_age_rejected_on_load() {
    let csv = "Name,Email,PhoneNumber,Age,Country,Salary,JoiningDate\n\
               Alice,a@x.com,1,forty,USA,1,2023-01-01\n";
    let raw = io::read_csv_from_reader(csv.as_bytes()).unwrap();

    let err = io::conform_schema(raw, &CleanerConfig::default()).unwrap_err();
    assert_eq!(err.error_code(), "TYPE_CONVERSION_FAILED");
}

#[test]
fn test_all_missing_ages_abort_run() {
    let csv = "Name,Email,PhoneNumber,Age,Country,Salary,JoiningDate\n\
               Alice,a@x.com,1,,USA,1,2023-01-01\n\
               Bob,b@x.com,2,,UK,2,2023-01-02\n";
    let config = CleanerConfig::default();
    let raw = io::conform_schema(io::read_csv_from_reader(csv.as_bytes()).unwrap(), &config)
        .unwrap();

    let err = Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .process(raw)
        .unwrap_err();
    assert!(matches!(err, CleaningError::MissingStatistic(ref c) if c == "Age"));
}

// ============================================================================
// Report Tests
// ============================================================================

#[test]
fn test_report_written_next_to_output() {
    let dir = tempdir().unwrap();
    let input = dirty_csv();
    let config = CleanerConfig::builder()
        .output_dir(dir.path())
        .build()
        .unwrap();

    let raw = io::conform_schema(io::read_csv(&input).unwrap(), &config).unwrap();
    let cleaned = Pipeline::builder()
        .config(config.clone())
        .build()
        .unwrap()
        .process(raw.clone())
        .unwrap();

    let generator = ReportGenerator::new(dir.path());
    let report = generator
        .build_report(
            &input.display().to_string(),
            Some(config.output_path().as_path()),
            &raw,
            &cleaned,
        )
        .unwrap();
    let path = generator.write_report_to_file(&report, "cleaned_data").unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(json["summary"]["rows_after"], 4);
    assert_eq!(json["raw_duplicate_rows"], 1);
    assert_eq!(json["value_counts"]["Country"][0]["value"], "India");
    assert_eq!(json["correlations"][0]["left"], "Age");
    assert_eq!(json["correlations"][0]["right"], "Salary");
}
