//! # Configuration Management Module
//!
//! Holds every knob for a batch transcode run.
//!
//! ## Parameters:
//! - `quality`: JPEG encoder quality (1-100, default: 50)
//! - `workers`: concurrency limit for in-flight transcode tasks, also the
//!   codec pool size (default: 4, the CLI overrides this with the machine's
//!   available parallelism)
//! - `max_files`: cap on how many filtered files are considered (default: 10000)
//! - `start_from`: index into the filtered, sorted file list at which
//!   processing resumes (default: 0)
//! - `output_path`: root of the mirrored output tree
//! - `json_summary`: print the final summary as JSON on stdout
//!
//! ## Validation:
//! - `quality` must be 1-100
//! - `workers` must be > 0
//!
//! `start_from` and `max_files` are deliberately unchecked: an offset past the
//! end of the list simply yields zero tasks, and `max_files = 0` is a valid
//! way to dry out a run.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a batch transcode run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JPEG encoder quality (1-100)
    pub quality: u8,
    /// Number of concurrent transcode tasks / codec pool size
    pub workers: usize,
    /// Maximum number of filtered files to consider
    pub max_files: usize,
    /// Resume offset into the filtered, sorted file list
    pub start_from: usize,
    /// Root directory of the mirrored output tree
    pub output_path: PathBuf,
    /// Print the final summary as JSON
    pub json_summary: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quality: 50,
            workers: 4,
            max_files: 10_000,
            start_from: 0,
            output_path: PathBuf::new(),
            json_summary: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.quality == 0 || self.quality > 100 {
            return Err(anyhow::anyhow!("JPEG quality must be between 1 and 100"));
        }

        if self.workers == 0 {
            return Err(anyhow::anyhow!("Number of workers must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.quality = 0;
        assert!(config.validate().is_err());

        config.quality = 101;
        assert!(config.validate().is_err());

        config.quality = 50;
        config.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.quality, 50);
        assert_eq!(config.workers, 4);
        assert_eq!(config.max_files, 10_000);
        assert_eq!(config.start_from, 0);
        assert!(!config.json_summary);
    }

    #[test]
    fn test_zero_max_files_is_valid() {
        let config = Config {
            max_files: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
