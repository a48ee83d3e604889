//! # Progress Tracking and Statistics Module
//!
//! Visual progress reporting with `indicatif` and the run's byte accounting.
//!
//! ## Components:
//! - `ProgressManager`: wraps the progress bar shared by all transcode tasks
//! - `TranscodeStats`: cumulative counters folded by the scheduler as tasks
//!   are awaited
//!
//! ## Statistics tracked:
//! - **files_transcoded**: tasks that read, re-encoded and wrote successfully
//! - **files_failed**: tasks that returned an error (or panicked)
//! - **total_input_bytes** / **total_output_bytes**: byte totals across all
//!   successful tasks; both are only ever incremented, so they are
//!   monotonically non-decreasing over the run
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:42] [=========================>--------------] 93/150 (62%) ✅ photo.jpg: 41.3% smaller
//! ```

use crate::file_manager::FileManager;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;

/// Manages the shared progress bar for a transcode run
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Statistics tracker for a transcode run
#[derive(Debug, Default, Clone, Serialize)]
pub struct TranscodeStats {
    pub files_transcoded: usize,
    pub files_failed: usize,
    pub total_input_bytes: u64,
    pub total_output_bytes: u64,
}

impl TranscodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_transcoded(&mut self, input_size: u64, output_size: u64) {
        self.files_transcoded += 1;
        self.total_input_bytes += input_size;
        self.total_output_bytes += output_size;
    }

    pub fn add_failed(&mut self) {
        self.files_failed += 1;
    }

    pub fn overall_reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.total_input_bytes, self.total_output_bytes)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Transcoded: {} files | Failed: {} | In: {} | Out: {} ({:.2}% smaller)",
            self.files_transcoded,
            self.files_failed,
            FileManager::format_size(self.total_input_bytes),
            FileManager::format_size(self.total_output_bytes),
            self.overall_reduction_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_accumulation() {
        let mut stats = TranscodeStats::new();
        stats.add_transcoded(1000, 400);
        stats.add_transcoded(500, 100);
        stats.add_failed();

        assert_eq!(stats.files_transcoded, 2);
        assert_eq!(stats.files_failed, 1);
        assert_eq!(stats.total_input_bytes, 1500);
        assert_eq!(stats.total_output_bytes, 500);
    }

    #[test]
    fn test_reduction_percent() {
        let mut stats = TranscodeStats::new();
        assert_eq!(stats.overall_reduction_percent(), 0.0);

        stats.add_transcoded(200, 100);
        assert_eq!(stats.overall_reduction_percent(), 50.0);
    }

    #[test]
    fn test_summary_contains_counts() {
        let mut stats = TranscodeStats::new();
        stats.add_transcoded(2048, 1024);
        let summary = stats.format_summary();
        assert!(summary.contains("Transcoded: 1 files"));
        assert!(summary.contains("2.00 KB"));
    }
}
