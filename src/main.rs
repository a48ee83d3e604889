//! # JPEG Batch Transcoder - Main Entry Point
//!
//! ## Responsibilities:
//! - Command line parsing with `clap`
//! - Logging initialization with `tracing`
//! - Input validation and output directory creation
//! - Building the configuration and launching the transcoder
//!
//! ## Example usage:
//! ```bash
//! jpeg-transcoder /media/ssd/images --output /media/ssd/output --quality 50
//! jpeg-transcoder ./photos -o ./smaller --start-from 1200 --workers 8
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use jpeg_batch_transcoder::{BatchTranscoder, Config};

#[derive(Parser)]
#[command(name = "jpeg-transcoder")]
#[command(about = "Re-encode a JPEG tree at a fixed quality into a mirrored output tree")]
struct Args {
    /// Directory containing JPEG files to transcode
    input_directory: PathBuf,

    /// Output directory for the mirrored tree (created if missing)
    #[arg(short, long)]
    output: PathBuf,

    /// JPEG quality (1-100)
    #[arg(short, long, default_value = "50")]
    quality: u8,

    /// Number of parallel workers (defaults to available CPU cores)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Maximum number of files to consider
    #[arg(long, default_value = "10000")]
    max_files: usize,

    /// Index in the sorted file list to resume from
    #[arg(long, default_value = "0")]
    start_from: usize,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Validate arguments
    if !args.input_directory.is_dir() {
        return Err(anyhow::anyhow!(
            "Input directory does not exist: {}",
            args.input_directory.display()
        ));
    }

    if !args.output.exists() {
        std::fs::create_dir_all(&args.output)?;
        info!("Created output directory: {}", args.output.display());
    }
    if !args.output.is_dir() {
        return Err(anyhow::anyhow!(
            "Output path is not a directory: {}",
            args.output.display()
        ));
    }

    let workers = args.workers.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    });

    let config = Config {
        quality: args.quality,
        workers,
        max_files: args.max_files,
        start_from: args.start_from,
        output_path: args.output,
        json_summary: args.json,
    };

    let transcoder = BatchTranscoder::new(&args.input_directory, config)?;
    transcoder.run().await?;

    Ok(())
}
