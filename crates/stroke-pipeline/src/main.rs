//! CLI entry point: fit the stroke pipeline on a labeled CSV and save the
//! artifact the prediction service loads at startup.

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use stroke_pipeline::{LogisticEstimator, StrokePipeline};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Fit the stroke-risk pipeline on a labeled CSV and save the artifact",
    long_about = "Reads a labeled patient CSV, fits the cleaning + preprocessing +\n\
                  classifier pipeline once, and writes the serialized artifact the\n\
                  prediction service loads at startup.\n\n\
                  EXAMPLES:\n  \
                  # Fit on the stroke dataset and write model.json\n  \
                  stroke-train -i data/healthcare-dataset-stroke-data.csv\n\n  \
                  # Custom target column and artifact path\n  \
                  stroke-train -i data/stroke.csv --target stroke -o artifacts/model.json"
)]
struct Args {
    /// Path to the labeled CSV file
    #[arg(short, long)]
    input: String,

    /// Path the fitted pipeline artifact is written to
    #[arg(short, long, default_value = "model.json")]
    output: String,

    /// Label column holding the 0/1 stroke outcome
    #[arg(short, long, default_value = "stroke")]
    target: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Initialize the tracing subscriber for logging.
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_csv(path: &str) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(std::path::PathBuf::from(path)))?
        .finish()?;
    Ok(df)
}

/// Split the label column off the raw frame. Null labels are an input error.
fn split_labels(df: &DataFrame, target: &str) -> Result<(DataFrame, Vec<i32>)> {
    let column = df
        .column(target)
        .map_err(|_| anyhow!("Target column not found: {}", target))?;
    let casted = column.as_materialized_series().cast(&DataType::Int32)?;

    if casted.null_count() > 0 {
        return Err(anyhow!(
            "Target column '{}' contains {} null labels",
            target,
            casted.null_count()
        ));
    }

    let labels: Vec<i32> = casted.i32()?.into_no_null_iter().collect();
    let features = df.drop(target)?;
    Ok((features, labels))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);
    dotenv().ok();

    if !std::path::Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    info!("Loading dataset from: {}", args.input);
    let data = load_csv(&args.input)?;
    info!("Dataset loaded: {:?}", data.shape());

    let (features, labels) = split_labels(&data, &args.target)?;

    let mut pipeline = StrokePipeline::new(LogisticEstimator::new());
    pipeline.fit(&features, &labels)?;
    info!("Feature layout: {:?}", pipeline.feature_names());

    pipeline.save(&args.output)?;
    info!("Artifact written to {}", args.output);

    Ok(())
}
