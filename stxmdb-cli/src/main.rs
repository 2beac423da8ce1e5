//! stxmdb - STXM dataset indexer CLI.
//!
//! Builds a SQLite index of the STXM HDF5 files under a directory and
//! filters it by acquisition metadata.
#![allow(clippy::uninlined_format_args, clippy::too_many_lines)]

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use std::path::PathBuf;
use stxmdb_core::{build_filter_query, DatasetRecord, FilterRequest, RecordStore, KNOWN_SCAN_TYPES};
use stxmdb_io::{spawn_index_job, IndexEvent, Indexer, IndexerConfig};
use stxmdb_store::SqliteStore;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Index error: {0}")]
    Index(#[from] stxmdb_io::Error),

    #[error("Store error: {0}")]
    Store(#[from] stxmdb_store::Error),

    #[error("Core error: {0}")]
    Core(#[from] stxmdb_core::Error),

    #[error("Invalid filter: {0}")]
    Range(#[from] stxmdb_core::RangeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No dataset named `{0}`")]
    NotFound(String),
}

/// Index and filter STXM HDF5 acquisitions.
#[derive(Parser)]
#[command(name = "stxmdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Index database file
    #[arg(long, global = true, default_value = "stxmdb.sqlite")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the index from every matching file under a directory
    Index {
        /// Root directory to scan
        root: PathBuf,

        /// JSON indexer configuration (suffix and HDF5 layout)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List datasets matching the given filters
    Query {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show metadata and image summary for one dataset
    Show {
        /// Dataset file name
        name: String,
    },

    /// Remove every record from the index
    Clear,

    /// List the recognized scan types
    ScanTypes,
}

/// Filter flags; zero means "any" for resolutions, ranges, and `energy-max`.
#[derive(Args, Debug)]
struct FilterArgs {
    /// Scan type, e.g. "sample image"
    #[arg(long)]
    scan_type: Option<String>,

    /// Earliest start time (YYYYMMDDHHMM)
    #[arg(long)]
    start: Option<i64>,

    /// Latest end time (YYYYMMDDHHMM)
    #[arg(long)]
    end: Option<i64>,

    #[arg(long)]
    x_resolution: Option<u32>,

    #[arg(long)]
    y_resolution: Option<u32>,

    #[arg(long)]
    x_range: Option<u32>,

    #[arg(long)]
    y_range: Option<u32>,

    /// Lower energy bound (eV)
    #[arg(long, default_value = "0")]
    energy_min: i64,

    /// Upper energy bound (eV)
    #[arg(long)]
    energy_max: Option<i64>,
}

impl From<FilterArgs> for FilterRequest {
    fn from(args: FilterArgs) -> Self {
        FilterRequest {
            scan_type: args.scan_type,
            start_at_or_after: args.start,
            end_at_or_before: args.end,
            x_resolution: args.x_resolution,
            y_resolution: args.y_resolution,
            x_range: args.x_range,
            y_range: args.y_range,
            energy_min: args.energy_min,
            energy_max: args.energy_max,
        }
    }
}

/// Record metadata without the image blob.
#[derive(Serialize)]
struct RecordSummary<'a> {
    name: &'a str,
    file_path: &'a str,
    scan_type: &'a str,
    start_time: i64,
    end_time: i64,
    x_resolution: u32,
    y_resolution: u32,
    x_range: i64,
    y_range: i64,
    energy_min: i64,
    energy_max: i64,
}

impl<'a> From<&'a DatasetRecord> for RecordSummary<'a> {
    fn from(record: &'a DatasetRecord) -> Self {
        Self {
            name: &record.name,
            file_path: &record.file_path,
            scan_type: &record.scan_type,
            start_time: record.start_time,
            end_time: record.end_time,
            x_resolution: record.x_resolution,
            y_resolution: record.y_resolution,
            x_range: record.x_range,
            y_range: record.y_range,
            energy_min: record.energy_min,
            energy_max: record.energy_max,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Index {
            root,
            config,
            verbose,
        } => {
            let config = match config {
                Some(path) => IndexerConfig::from_file(path)?,
                None => IndexerConfig::default(),
            };
            if verbose {
                eprintln!("Indexing: {}", root.display());
                eprintln!("Database: {}", cli.db.display());
                eprintln!("Suffix: {}", config.suffix);
            }

            let store = SqliteStore::open(&cli.db)?;
            let job = spawn_index_job(Indexer::from_config(&config), root, store);
            for event in job.events() {
                match event {
                    IndexEvent::Progress(percent) => eprint!("\rProgress: {:>3}%", percent),
                    IndexEvent::Finished(_) => eprintln!(),
                }
            }

            let (_store, outcome) = job.wait()?;
            let summary = outcome?;
            println!("Index complete:");
            println!("  Candidates: {}", summary.candidates);
            println!("  Indexed: {}", summary.indexed);
            println!("  Skipped: {}", summary.skipped.len());
            println!("  Time: {:.2}s", summary.elapsed.as_secs_f64());
            for skipped in &summary.skipped {
                eprintln!("  skipped {}: {}", skipped.path.display(), skipped.reason);
            }
        }

        Commands::Query { filters, json } => {
            let store = SqliteStore::open(&cli.db)?;
            let filters = FilterRequest::from(filters);
            let query = build_filter_query(&filters)?;
            let records = store.query(&query)?;

            if json {
                let summaries: Vec<RecordSummary<'_>> = records.iter().map(Into::into).collect();
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                for record in &records {
                    println!("{}", record.name);
                }
                eprintln!("{} match(es)", records.len());
            }
        }

        Commands::Show { name } => {
            let store = SqliteStore::open(&cli.db)?;
            let record = store.get(&name)?.ok_or(CliError::NotFound(name))?;
            let image = record.image()?;

            println!("Dataset: {}", record.name);
            println!("  Path: {}", record.file_path);
            println!("  Scan type: {}", record.scan_type);
            println!("  Start: {}", record.start_time);
            println!("  End: {}", record.end_time);
            println!("  Resolution: {} x {}", record.x_resolution, record.y_resolution);
            println!("  Range: {} x {}", record.x_range, record.y_range);
            println!("  Energy: {} - {} eV", record.energy_min, record.energy_max);
            let (channels, rows, cols) = image.shape();
            println!("  Image: {} channel(s) of {} x {}", channels, rows, cols);
            if let Some((lo, hi)) = image.value_range() {
                println!("  Values: {:.4} .. {:.4}", lo, hi);
            }
        }

        Commands::Clear => {
            let mut store = SqliteStore::open(&cli.db)?;
            let count = store.len()?;
            store.clear()?;
            println!("Removed {} record(s) from {}", count, cli.db.display());
        }

        Commands::ScanTypes => {
            for tag in KNOWN_SCAN_TYPES {
                println!("{}", tag);
            }
        }
    }

    Ok(())
}
