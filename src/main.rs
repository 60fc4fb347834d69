//! CLI entry point for the data cleaning pipeline.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use polars::prelude::DataFrame;
use scour::{
    ChartBuilder, CleaningConfig, CleaningPipeline, Encoding, Exporter, FileFormat, Loader,
    MissingStrategy, OutlierMethod, QualityAssessor, Scaling, TableProfile,
};
use std::path::Path;
use tracing::{error, info};

/// CLI-compatible missing value strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMissingStrategy {
    /// Fill numeric columns with their mean
    Mean,
    /// Fill numeric columns with their median
    Median,
    /// Fill numeric and text columns with their most frequent value
    Mode,
    /// Fill with a constant (requires --fill-value)
    Constant,
    /// Leave missing values in place
    None,
}

impl CliMissingStrategy {
    fn into_option(self) -> Option<MissingStrategy> {
        match self {
            Self::Mean => Some(MissingStrategy::Mean),
            Self::Median => Some(MissingStrategy::Median),
            Self::Mode => Some(MissingStrategy::Mode),
            Self::Constant => Some(MissingStrategy::Constant),
            Self::None => None,
        }
    }
}

/// CLI-compatible outlier method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutlierMethod {
    /// Interquartile range fences
    Iqr,
    /// Z-score cutoff
    Zscore,
}

impl From<CliOutlierMethod> for OutlierMethod {
    fn from(cli: CliOutlierMethod) -> Self {
        match cli {
            CliOutlierMethod::Iqr => OutlierMethod::Iqr,
            CliOutlierMethod::Zscore => OutlierMethod::ZScore,
        }
    }
}

/// CLI-compatible encoding enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliEncoding {
    /// One indicator column per category
    OneHot,
    /// Integer codes in first-occurrence order
    Label,
}

impl From<CliEncoding> for Encoding {
    fn from(cli: CliEncoding) -> Self {
        match cli {
            CliEncoding::OneHot => Encoding::OneHot,
            CliEncoding::Label => Encoding::Label,
        }
    }
}

/// CLI-compatible scaling enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliScaling {
    /// Scale each numeric column to [0, 1]
    MinMax,
    /// Center on zero with unit variance
    Standard,
}

impl From<CliScaling> for Scaling {
    fn from(cli: CliScaling) -> Self {
        match cli {
            CliScaling::MinMax => Scaling::MinMax,
            CliScaling::Standard => Scaling::Standard,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Interactive tabular data cleaner",
    long_about = "Load a CSV, XLSX, or delimited text file, assess its quality,\n\
                  run a configurable cleaning pipeline, and export the result.\n\n\
                  EXAMPLES:\n  \
                  # Profile a file without cleaning it\n  \
                  scour -i data.csv --profile\n\n  \
                  # Clean with defaults (mean imputation + dedupe)\n  \
                  scour -i data.csv -o cleaned.csv\n\n  \
                  # Full pipeline\n  \
                  scour -i data.csv --normalize-columns --parse-dates joined \\\n         \
                  --missing median --outliers iqr --encode one-hot --scale min-max"
)]
struct Args {
    /// Path to the file to clean
    #[arg(short, long)]
    input: String,

    /// Output path for the cleaned CSV
    ///
    /// Defaults to "<input_stem>_cleaned.csv" next to the input file
    #[arg(short, long)]
    output: Option<String>,

    /// Input format override (csv, xlsx, txt); inferred from the
    /// extension when omitted
    #[arg(long)]
    format: Option<String>,

    /// Show the quality profile and exit without cleaning
    #[arg(long)]
    profile: bool,

    /// Normalize column names (trim, lowercase, underscores)
    #[arg(long)]
    normalize_columns: bool,

    /// Columns to parse as dates (repeatable, comma-separated)
    #[arg(long, value_delimiter = ',')]
    parse_dates: Vec<String>,

    /// Strategy for filling missing values
    #[arg(long, value_enum, default_value = "mean")]
    missing: CliMissingStrategy,

    /// Constant used with --missing constant
    #[arg(long)]
    fill_value: Option<String>,

    /// Outlier removal method (off unless set)
    #[arg(long, value_enum)]
    outliers: Option<CliOutlierMethod>,

    /// IQR multiplier or z-score cutoff
    #[arg(long, default_value = "1.5")]
    outlier_threshold: f64,

    /// Keep duplicate rows instead of removing them
    #[arg(long)]
    no_dedupe: bool,

    /// Categorical encoding for text columns (off unless set)
    #[arg(long, value_enum)]
    encode: Option<CliEncoding>,

    /// Numeric scaling (off unless set)
    #[arg(long, value_enum)]
    scale: Option<CliScaling>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of a human-readable summary
    ///
    /// Disables all logs; only the final JSON document is written.
    /// Useful for piping to other tools: `... --json | jq .changes`
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
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

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let format = resolve_format(&args)?;
    info!("Loading {} from: {}", format, args.input);
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input))?;
    let table = Loader::load(&bytes, format)?;

    let profile_before = QualityAssessor::profile(&table)?;

    if args.profile {
        return run_profile_only(&args, &profile_before);
    }

    let config = build_config(&args)?;

    let cleaned = match CleaningPipeline::clean(&table, &config) {
        Ok(cleaned) => cleaned,
        Err(failure) => {
            error!("{}", failure.error);
            for change in &failure.changes {
                error!("applied before the failure: {}", change);
            }
            return Err(anyhow!("Cleaning failed: {}", failure.error));
        }
    };

    let profile_after = QualityAssessor::profile(&cleaned.table)?;

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    let csv = Exporter::to_csv(&cleaned.table)?;
    std::fs::write(&output_path, csv)
        .with_context(|| format!("Failed to write {output_path}"))?;

    if args.json {
        let histograms = ChartBuilder::numeric_histograms(
            &cleaned.table,
            scour::charts::DEFAULT_HISTOGRAM_BUCKETS,
        )?;
        let document = serde_json::json!({
            "input": args.input,
            "output": output_path,
            "changes": cleaned.changes,
            "profile_before": profile_before,
            "profile_after": profile_after,
            "comparison": ChartBuilder::compare(&profile_before, &profile_after),
            "histograms": histograms,
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    print_summary(&args, &output_path, &cleaned.table, &cleaned.changes, &profile_before, &profile_after);
    Ok(())
}

fn resolve_format(args: &Args) -> Result<FileFormat> {
    let ext = match &args.format {
        Some(fmt) => fmt.clone(),
        None => Path::new(&args.input)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string(),
    };
    Ok(FileFormat::from_extension(&ext)?)
}

fn default_output_path(input: &str) -> String {
    let path = Path::new(input);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    match path.parent().and_then(|p| p.to_str()).filter(|p| !p.is_empty()) {
        Some(parent) => format!("{parent}/{stem}_cleaned.csv"),
        None => format!("{stem}_cleaned.csv"),
    }
}

fn build_config(args: &Args) -> Result<CleaningConfig> {
    let config = CleaningConfig::builder()
        .normalize_columns(args.normalize_columns)
        .parse_dates(args.parse_dates.clone())
        .missing_strategy(args.missing.into_option())
        .outlier_method(args.outliers.map(Into::into))
        .outlier_threshold(args.outlier_threshold)
        .dedupe(!args.no_dedupe)
        .encoding(args.encode.map(Into::into))
        .scaling(args.scale.map(Into::into));
    let config = match &args.fill_value {
        Some(value) => config.fill_value(value.clone()),
        None => config,
    };
    Ok(config.build()?)
}

/// Print the quality profile and exit.
///
/// Uses `println!` intentionally: this table is the primary output of
/// --profile and should be visible regardless of log level.
fn run_profile_only(args: &Args, profile: &TableProfile) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(profile)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("QUALITY PROFILE - {}", args.input);
    println!("{}\n", "=".repeat(80));

    println!("  Rows: {}", profile.shape.0);
    println!("  Columns: {}", profile.shape.1);
    println!(
        "  Duplicate rows: {} ({:.1}%)",
        profile.duplicate_count, profile.duplicate_percentage
    );
    println!();

    println!(
        "{:<20} {:<10} {:<10} {:<12} {:<10}",
        "Column", "Dtype", "Kind", "Missing %", "Unique"
    );
    println!("{}", "-".repeat(70));
    for col in &profile.columns {
        println!(
            "{:<20} {:<10} {:<10?} {:<12.1} {:<10}",
            truncate_str(&col.name, 19),
            col.dtype,
            col.kind,
            col.null_percentage,
            col.unique_count
        );
    }

    if !profile.numeric_summaries.is_empty() {
        println!();
        println!(
            "{:<20} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "Numeric column", "mean", "std", "min", "q1", "median", "q3", "max"
        );
        println!("{}", "-".repeat(104));
        for s in &profile.numeric_summaries {
            println!(
                "{:<20} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
                truncate_str(&s.column, 19),
                s.mean,
                s.std,
                s.min,
                s.q1,
                s.median,
                s.q3,
                s.max
            );
        }
    }
    println!();
    Ok(())
}

fn print_summary(
    args: &Args,
    output_path: &str,
    table: &DataFrame,
    changes: &[String],
    before: &TableProfile,
    after: &TableProfile,
) {
    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();
    println!(
        "Input:  {} ({} rows x {} columns)",
        args.input, before.shape.0, before.shape.1
    );
    println!(
        "Output: {} ({} rows x {} columns)",
        output_path,
        table.height(),
        table.width()
    );
    println!();

    if changes.is_empty() {
        println!("No changes were applied; the data already looked clean.");
    } else {
        println!("Changes Applied:");
        for change in changes {
            println!("  - {change}");
        }
    }
    println!();

    let comparison = ChartBuilder::compare(before, after);
    println!("Before -> After:");
    println!(
        "  Missing cells: {} -> {}",
        comparison.nulls_before, comparison.nulls_after
    );
    println!(
        "  Duplicate rows: {} -> {}",
        comparison.duplicates_before, comparison.duplicates_after
    );
    println!();
    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
