//! # Batch Transcoder Orchestrator Module
//!
//! Ties the pieces together for one run.
//!
//! ## Flow:
//! 1. **Discovery**: enumerate the sorted, filtered JPEG list once, up front
//! 2. **Scheduling**: drive the bounded scheduler with the real per-file
//!    transcode task
//! 3. **Per file**: read source → re-encode on the codec pool → mirror the
//!    relative path under the output root → write
//! 4. **Teardown**: close the codec pool once everything is awaited
//! 5. **Reporting**: final summary (and JSON summary when requested), failed
//!    paths listed, nonzero exit if any file failed
//!
//! ## Path mirroring:
//! ```text
//! Input:  <input_root>/2023/vacation/IMG_001.jpg
//! Output: <output_root>/2023/vacation/IMG_001.jpg
//! ```
//! Missing destination directories are created on demand; existing output
//! files are overwritten.

use crate::{
    codec::{CodecPool, EncodeConfig},
    config::Config,
    file_manager::FileManager,
    progress::ProgressManager,
    scheduler::{BoundedScheduler, RunReport, TranscodeResult},
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Final summary printed with `--json`
#[derive(Serialize)]
struct JsonSummary<'a> {
    #[serde(flatten)]
    stats: &'a crate::progress::TranscodeStats,
    failed_paths: Vec<String>,
}

/// Main batch transcoder orchestrator
pub struct BatchTranscoder {
    config: Config,
    codec: Arc<CodecPool>,
    input_base_dir: PathBuf,
}

impl BatchTranscoder {
    /// Create a new batch transcoder instance
    pub fn new(input_dir: &Path, config: Config) -> Result<Self> {
        config.validate()?;

        let codec = Arc::new(CodecPool::new(config.workers));

        Ok(Self {
            config,
            codec,
            input_base_dir: input_dir.to_path_buf(),
        })
    }

    /// Run the batch: enumerate, transcode everything, report.
    ///
    /// Returns an error if any individual file failed, after the whole batch
    /// has been driven to completion and the codec pool torn down.
    pub async fn run(&self) -> Result<()> {
        info!(
            "Starting JPEG transcode in: {} (quality: {})",
            self.input_base_dir.display(),
            self.config.quality
        );
        info!("📁 Output directory: {}", self.config.output_path.display());
        if self.config.start_from > 0 {
            info!("⏩ Resuming from index {}", self.config.start_from);
        }

        let files = FileManager::find_jpeg_files(&self.input_base_dir, self.config.max_files)?;
        info!(
            "pool size: {} files count: {}",
            self.config.workers,
            files.len()
        );

        let pending = files.len().saturating_sub(self.config.start_from);
        let progress = ProgressManager::new(pending as u64);

        let report = self.schedule(files, &progress).await;

        // All tasks are awaited by now; the pool's workers can go.
        self.codec.close();

        progress.finish(&report.stats.format_summary());
        self.print_final_stats(&report)?;

        if report.failures.is_empty() {
            Ok(())
        } else {
            Err(anyhow::anyhow!(
                "{} file(s) failed to transcode",
                report.failures.len()
            ))
        }
    }

    async fn schedule(&self, files: Vec<PathBuf>, progress: &ProgressManager) -> RunReport {
        let total = files.len();
        let quality = self.config.quality;
        let codec = Arc::clone(&self.codec);
        let input_root = self.input_base_dir.clone();
        let output_root = self.config.output_path.clone();
        let progress = progress.clone();

        BoundedScheduler::new(self.config.workers)
            .run(files, self.config.start_from, move |index, path| {
                let codec = Arc::clone(&codec);
                let input_root = input_root.clone();
                let output_root = output_root.clone();
                let progress = progress.clone();

                async move {
                    let result = transcode_file(
                        &codec,
                        &path,
                        &input_root,
                        &output_root,
                        quality,
                        index,
                        total,
                    )
                    .await;

                    let name = path.file_name().unwrap_or_default().to_string_lossy();
                    let message = match &result {
                        Ok(r) => format!(
                            "✅ {}: {:.1}% smaller",
                            name,
                            FileManager::calculate_reduction(r.input_size, r.output_size)
                        ),
                        Err(_) => format!("❌ {}: error", name),
                    };
                    progress.update(&message);

                    result
                }
            })
            .await
    }

    fn print_final_stats(&self, report: &RunReport) -> Result<()> {
        info!("=== Transcode Complete ===");
        info!("Files dispatched: {}", report.dispatched);
        info!("Files transcoded: {}", report.stats.files_transcoded);
        info!("Files failed: {}", report.stats.files_failed);
        info!(
            "totalInputBytes: {} totalOutputBytes: {}",
            FileManager::format_size(report.stats.total_input_bytes),
            FileManager::format_size(report.stats.total_output_bytes)
        );
        info!(
            "Overall reduction: {:.2}%",
            report.stats.overall_reduction_percent()
        );

        for (path, message) in &report.failures {
            error!("Failed: {} ({message})", path.display());
        }

        if self.config.json_summary {
            let summary = JsonSummary {
                stats: &report.stats,
                failed_paths: report
                    .failures
                    .iter()
                    .map(|(path, _)| path.display().to_string())
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Ok(())
    }
}

/// Transcode a single file: disk → codec pool → disk
async fn transcode_file(
    codec: &CodecPool,
    path: &Path,
    input_root: &Path,
    output_root: &Path,
    quality: u8,
    index: usize,
    total: usize,
) -> Result<TranscodeResult> {
    let relative = path.strip_prefix(input_root).unwrap_or(path);
    info!("reading [{index}/{total}]: {}", relative.display());

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read source file {}", path.display()))?;
    let input_size = bytes.len() as u64;

    let encoded = codec
        .ingest(bytes)?
        .encode(EncodeConfig { quality })
        .await
        .with_context(|| format!("Failed to re-encode {}", path.display()))?;
    let output_size = encoded.bytes.len() as u64;

    let destination = output_root.join(relative);
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }
    tokio::fs::write(&destination, &encoded.bytes)
        .await
        .with_context(|| format!("Failed to write {}", destination.display()))?;

    info!(
        "writing [{index}/{total}]: {} inputSize: {} outputSize: {}",
        relative.display(),
        FileManager::format_size(input_size),
        FileManager::format_size(output_size)
    );

    Ok(TranscodeResult {
        input_size,
        output_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::jpeg::JpegEncoder;
    use std::fs;
    use tempfile::TempDir;

    fn write_sample_jpeg(path: &Path, width: u32, height: u32) {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 3 % 256) as u8, (y * 5 % 256) as u8, 70])
        });
        let mut buf = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, 90);
        encoder.encode_image(&img).unwrap();
        fs::write(path, buf).unwrap();
    }

    fn test_config(output: &Path) -> Config {
        Config {
            quality: 50,
            workers: 2,
            output_path: output.to_path_buf(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_run_mirrors_tree_and_skips_non_jpeg() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        fs::create_dir_all(input.path().join("a/b")).unwrap();
        write_sample_jpeg(&input.path().join("one.jpg"), 64, 48);
        write_sample_jpeg(&input.path().join("two.JPG"), 32, 32);
        write_sample_jpeg(&input.path().join("a/three.jpg"), 48, 48);
        write_sample_jpeg(&input.path().join("a/b/four.jpg"), 40, 40);
        write_sample_jpeg(&input.path().join("a/b/five.jpg"), 56, 24);
        fs::write(input.path().join("notes.png"), b"not an image").unwrap();
        fs::write(input.path().join("a/other.png"), b"still not").unwrap();

        let transcoder = BatchTranscoder::new(input.path(), test_config(output.path())).unwrap();
        transcoder.run().await.unwrap();

        for mirrored in [
            "one.jpg",
            "two.JPG",
            "a/three.jpg",
            "a/b/four.jpg",
            "a/b/five.jpg",
        ] {
            let out_path = output.path().join(mirrored);
            assert!(out_path.exists(), "missing mirrored file {mirrored}");
            // Every output must be a valid JPEG of the original dimensions.
            let bytes = fs::read(&out_path).unwrap();
            assert!(image::load_from_memory(&bytes).is_ok());
        }
        assert!(!output.path().join("notes.png").exists());
        assert!(!output.path().join("a/other.png").exists());
    }

    #[tokio::test]
    async fn test_run_reports_failed_files_without_aborting() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        write_sample_jpeg(&input.path().join("good.jpg"), 32, 32);
        fs::write(input.path().join("broken.jpg"), b"definitely not a jpeg").unwrap();

        let transcoder = BatchTranscoder::new(input.path(), test_config(output.path())).unwrap();
        let result = transcoder.run().await;

        // The good file still made it through before the run reports failure.
        assert!(output.path().join("good.jpg").exists());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("1 file(s) failed"));
    }

    #[tokio::test]
    async fn test_run_with_offset_past_end_does_nothing() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_sample_jpeg(&input.path().join("one.jpg"), 16, 16);

        let config = Config {
            start_from: 5,
            ..test_config(output.path())
        };
        let transcoder = BatchTranscoder::new(input.path(), config).unwrap();
        transcoder.run().await.unwrap();

        assert!(!output.path().join("one.jpg").exists());
    }

    #[tokio::test]
    async fn test_run_with_zero_max_files_does_nothing() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_sample_jpeg(&input.path().join("one.jpg"), 16, 16);

        let config = Config {
            max_files: 0,
            ..test_config(output.path())
        };
        let transcoder = BatchTranscoder::new(input.path(), config).unwrap();
        transcoder.run().await.unwrap();

        assert!(fs::read_dir(output.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_resume_offset_skips_leading_files() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_sample_jpeg(&input.path().join("a.jpg"), 16, 16);
        write_sample_jpeg(&input.path().join("b.jpg"), 16, 16);
        write_sample_jpeg(&input.path().join("c.jpg"), 16, 16);

        let config = Config {
            start_from: 2,
            ..test_config(output.path())
        };
        let transcoder = BatchTranscoder::new(input.path(), config).unwrap();
        transcoder.run().await.unwrap();

        // Sorted list is [a, b, c]; skipping two leaves only c.
        assert!(!output.path().join("a.jpg").exists());
        assert!(!output.path().join("b.jpg").exists());
        assert!(output.path().join("c.jpg").exists());
    }
}
