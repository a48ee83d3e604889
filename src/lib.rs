//! # JPEG Batch Transcoder Library
//!
//! Recursively scans a directory for JPEG files, re-encodes each one at a
//! fixed lossy quality on a fixed-size codec pool, writes the results into a
//! mirrored output tree and reports the aggregate byte savings.
//!
//! ## Module architecture:
//! - `config`: run parameters and validation
//! - `error`: typed pipeline errors
//! - `file_manager`: deterministic JPEG discovery and size utilities
//! - `codec`: the in-process re-encoding worker pool
//! - `scheduler`: bounded dispatch window over per-file tasks
//! - `transcoder`: run orchestration and reporting
//! - `progress`: progress bar and cumulative statistics
//!
//! ## Usage:
//! ```rust,ignore
//! use jpeg_batch_transcoder::{BatchTranscoder, Config};
//!
//! let config = Config { output_path: out_dir, ..Default::default() };
//! let transcoder = BatchTranscoder::new(&in_dir, config)?;
//! transcoder.run().await?;
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod file_manager;
pub mod progress;
pub mod scheduler;
pub mod transcoder;

pub use codec::{CodecPool, EncodeConfig, EncodedImage, ImageHandle};
pub use config::Config;
pub use error::TranscodeError;
pub use scheduler::{BoundedScheduler, RunReport, TranscodeResult};
pub use transcoder::BatchTranscoder;
