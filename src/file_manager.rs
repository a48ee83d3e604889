//! # File Management Module
//!
//! File discovery and size utilities.
//!
//! ## Responsibilities:
//! - Recursive discovery of JPEG files in a directory tree
//! - Deterministic ordering of the discovered list
//! - Human-readable size formatting and reduction math
//!
//! ## Discovery contract:
//! - Only files whose extension is exactly `jpg` or `JPG` are selected; the
//!   original tool never matched `.jpeg` or mixed-case spellings and resume
//!   offsets from previous runs depend on that filter staying put.
//! - The walk is sorted by file name at every directory level, so the same
//!   tree always produces the same list. The `start_from` resume offset is
//!   only meaningful because of this ordering.
//! - The list is built once, up front, then capped at `max_files` entries.
//!
//! ## Example:
//! ```rust,ignore
//! let files = FileManager::find_jpeg_files(Path::new("/photos"), 10_000)?;
//! println!("{} files, first: {:?}", files.len(), files.first());
//! ```

use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Manages file discovery and size reporting
pub struct FileManager;

impl FileManager {
    /// Find JPEG files under `root`, sorted, capped at `max_files` entries.
    ///
    /// Enumeration errors (unreadable directories, broken entries) are fatal:
    /// a partially enumerated list would silently shift resume offsets.
    pub fn find_jpeg_files(root: &Path, max_files: usize) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if Self::is_jpeg(entry.path()) {
                if files.len() >= max_files {
                    break;
                }
                files.push(entry.path().to_path_buf());
            }
        }

        Ok(files)
    }

    /// Check if a path carries the exact `jpg` or `JPG` extension
    pub fn is_jpeg(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("jpg") | Some("JPG")
        )
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}
