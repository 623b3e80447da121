//! CLI entry point for the tabular record cleaner.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tabular_cleaner::reporting::CleaningReport;
use tabular_cleaner::{
    CleanerConfig, DataProfiler, InvalidDatePolicy, Pipeline, ReportGenerator, io,
};
use tracing::{error, info};

/// CLI-compatible invalid date policy
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliInvalidDates {
    /// Replace with the default date
    Coerce,
    /// Drop the row
    Reject,
    /// Abort the run
    Fail,
}

impl From<CliInvalidDates> for InvalidDatePolicy {
    fn from(cli: CliInvalidDates) -> Self {
        match cli {
            CliInvalidDates::Coerce => InvalidDatePolicy::Coerce,
            CliInvalidDates::Reject => InvalidDatePolicy::RejectRow,
            CliInvalidDates::Fail => InvalidDatePolicy::Fail,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Rule-driven cleaner for tabular employee records",
    long_about = "Removes duplicate rows, fills missing values and normalizes dates.\n\n\
                  EXAMPLES:\n  \
                  # Clean with the built-in employee rules\n  \
                  tabular-cleaner -i dirty_data.csv\n\n  \
                  # Custom rules and output location\n  \
                  tabular-cleaner -i dirty_data.csv --config rules.json -o results/\n\n  \
                  # Preview without writing anything\n  \
                  tabular-cleaner -i dirty_data.csv --dry-run"
)]
struct Args {
    /// Path to the CSV file to clean
    #[arg(short, long)]
    input: String,

    /// Output directory for results
    #[arg(short, long)]
    output: Option<String>,

    /// Output file name (without extension)
    #[arg(long)]
    output_name: Option<String>,

    /// JSON file with column rules and date settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// How to handle dates that match no accepted format
    #[arg(long, value_enum)]
    invalid_dates: Option<CliInvalidDates>,

    /// Preview the dataset and rules without cleaning
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Print the JSON report to stdout instead of a summary
    ///
    /// Disables all logs; stdout only carries the report.
    #[arg(long)]
    json: bool,

    /// Write a JSON report to the output directory
    ///
    /// The report will be saved as <output_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// With `json_output` no subscriber is installed, so stdout only carries JSON.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;

    info!("Loading dataset from: {}", args.input);
    let raw = io::read_csv(&args.input).context("Failed to load input")?;
    let raw = io::conform_schema(raw, &config)?;
    info!("Dataset loaded successfully: {:?}", raw.shape());

    if args.dry_run {
        return run_dry_run(&args, &config, &raw);
    }

    run_pipeline(&args, config, raw)
}

fn build_config(args: &Args) -> Result<CleanerConfig> {
    let mut config = match &args.config {
        Some(path) => CleanerConfig::from_json_file(path)?,
        None => CleanerConfig::default(),
    };

    if let Some(ref output) = args.output {
        config.output_dir = PathBuf::from(output);
    }
    if let Some(ref name) = args.output_name {
        config.output_name = name.clone();
    }
    if let Some(policy) = args.invalid_dates {
        config.invalid_dates = policy.into();
    }

    config.validate()?;
    Ok(config)
}

/// Print what a run would work on.
///
/// Uses `println!` rather than logging so the preview shows at any log level.
fn run_dry_run(args: &Args, config: &CleanerConfig, data: &DataFrame) -> Result<()> {
    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Preview of cleaning actions");
    println!("{}\n", "=".repeat(80));

    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", args.input);
    println!("  Rows: {}", data.height());
    println!("  Columns: {}", data.width());
    println!("  Duplicate rows: {}", DataProfiler::duplicate_count(data)?);
    println!();

    println!("COLUMN RULES");
    println!("{}", "-".repeat(40));
    println!("{:<20} {:<10} {:<10} {:<25}", "Column", "Kind", "Missing", "Rule");
    println!("{}", "-".repeat(70));

    let names: Vec<&str> = config.columns.iter().map(|c| c.name.as_str()).collect();
    let nulls = DataProfiler::null_counts(data, &names)?;
    for spec in &config.columns {
        let rule = match &spec.rule {
            Some(tabular_cleaner::ImputationRule::Constant(value)) => format!("constant '{}'", value),
            Some(rule) => rule.label().to_string(),
            None => "-".to_string(),
        };
        println!(
            "{:<20} {:<10} {:<10} {:<25}",
            truncate_str(&spec.name, 19),
            format!("{:?}", spec.kind),
            nulls.get(&spec.name).copied().unwrap_or(0),
            rule
        );
    }
    println!();

    let untouched: Vec<(String, usize)> = DataProfiler::all_null_counts(data)
        .into_iter()
        .filter(|(name, _)| config.column(name).is_none())
        .collect();
    if !untouched.is_empty() {
        println!("PASS-THROUGH COLUMNS");
        println!("{}", "-".repeat(40));
        for (name, missing) in untouched {
            println!("  {:<20} {} missing", truncate_str(&name, 19), missing);
        }
        println!();
    }

    println!("DATES");
    println!("{}", "-".repeat(40));
    println!("  Default date: {}", config.default_date);
    println!("  Accepted formats: {}", config.date_formats.join(", "));
    println!("  Invalid dates: {:?}", config.invalid_dates);
    println!();

    println!("Output would be written to: {}", config.output_path().display());
    println!("{}", "=".repeat(80));
    Ok(())
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn run_pipeline(args: &Args, config: CleanerConfig, raw: DataFrame) -> Result<()> {
    let output_path = config.output_path();
    let generator = ReportGenerator::new(config.output_dir.clone());
    let output_name = config.output_name.clone();

    let pipeline = Pipeline::builder()
        .config(config)
        .on_progress(|update| {
            tracing::debug!("[{:.0}%] {}", update.progress * 100.0, update.message);
        })
        .build()?;

    let mut cleaned = match pipeline.process(raw.clone()) {
        Ok(cleaned) => cleaned,
        Err(e) => {
            if e.is_data_quality() {
                error!("Input data cannot be cleaned [{}]: {}", e.error_code(), e);
            } else {
                error!("Cleaning failed [{}]: {}", e.error_code(), e);
            }
            return Err(anyhow!("Cleaning failed: {}", e));
        }
    };

    io::write_csv(&mut cleaned.data, &output_path)?;

    let report = generator.build_report(&args.input, Some(output_path.as_path()), &raw, &cleaned)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let report_path = generator.write_report_to_file(&report, &output_name)?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&report, &output_path);
    Ok(())
}

/// Print the default end-of-run summary.
fn print_human_readable_summary(report: &CleaningReport, output_path: &Path) {
    let summary = &report.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!("ROWS");
    println!("{}", "-".repeat(40));
    println!("  Before: {}", summary.rows_before);
    println!("  After: {}", summary.rows_after);
    println!("  Duplicates removed: {}", summary.duplicates_removed);
    if summary.imputed_duplicates_removed > 0 {
        println!(
            "  Collapsed after imputation: {}",
            summary.imputed_duplicates_removed
        );
    }
    if summary.rows_rejected > 0 {
        println!("  Rejected (invalid dates): {}", summary.rows_rejected);
    }
    println!();

    println!("MISSING VALUES");
    println!("{}", "-".repeat(40));
    println!("{:<20} {:<10} {:<10}", "Column", "Before", "Filled");
    for (column, before) in &summary.null_counts_before {
        let filled = summary.nulls_imputed.get(column).copied().unwrap_or(0);
        println!("{:<20} {:<10} {:<10}", truncate_str(column, 19), before, filled);
    }
    println!();

    if !summary.statistics.is_empty() {
        println!("STATISTICS");
        println!("{}", "-".repeat(40));
        for (column, mean) in &summary.statistics {
            println!("  Mean {}: {}", column, mean);
        }
        println!();
    }

    println!("DATES");
    println!("{}", "-".repeat(40));
    println!("  Defaulted: {}", summary.dates_defaulted);
    println!("  Unparseable: {}", summary.invalid_dates);
    println!();

    if !report.correlations.is_empty() {
        println!("CORRELATIONS");
        println!("{}", "-".repeat(40));
        for correlation in &report.correlations {
            let coefficient = correlation
                .coefficient
                .map(|r| format!("{:.3}", r))
                .unwrap_or_else(|| "-".to_string());
            println!("  {} / {}: {}", correlation.left, correlation.right, coefficient);
        }
        println!();
    }

    for (column, counts) in &report.value_counts {
        println!("{} DISTRIBUTION", column.to_uppercase());
        println!("{}", "-".repeat(40));
        for entry in counts {
            println!("  {:<20} {}", truncate_str(&entry.value, 19), entry.count);
        }
        println!();
    }

    if !summary.warnings.is_empty() {
        println!("WARNINGS");
        println!("{}", "-".repeat(40));
        for warning in &summary.warnings {
            println!("  - {}", warning);
        }
        println!();
    }

    println!("Output: {}", output_path.display());
    println!("Completed in {}ms", summary.duration_ms);
    println!("{}", "=".repeat(80));
}
