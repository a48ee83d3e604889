//! # Codec Pool Module
//!
//! In-process JPEG re-encoding service backed by a fixed set of worker
//! threads.
//!
//! ## Responsibilities:
//! - Own the only CPU-heavy work in the program: JPEG decode + lossy
//!   re-encode through the `image` crate
//! - Keep that work off the async runtime by running it on dedicated OS
//!   threads sized to the configured parallelism
//! - Expose an ingest/encode/close surface so callers never touch image
//!   buffers or threads directly
//!
//! ## Lifecycle:
//! The pool is constructed once at startup and `close()`d exactly once after
//! the last task has been awaited. `close()` drops the job channel and joins
//! every worker; submitting work after that fails with
//! [`TranscodeError::PoolClosed`]. Leaving the pool open would leak its
//! threads past the end of the run.
//!
//! ## Flow per image:
//! ```text
//! pool.ingest(raw bytes) -> ImageHandle
//! handle.encode(EncodeConfig { quality }).await -> EncodedImage { bytes, w, h }
//! ```
//! The handle sends a job over the shared queue; whichever worker picks it up
//! decodes the source, re-encodes at the requested quality and replies over a
//! oneshot channel, so `encode()` suspends the caller without blocking the
//! runtime.

use crate::error::TranscodeError;
use image::codecs::jpeg::JpegEncoder;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use tokio::sync::oneshot;
use tracing::debug;

/// Encoder settings for a single image
#[derive(Debug, Clone, Copy)]
pub struct EncodeConfig {
    /// JPEG quality (1-100)
    pub quality: u8,
}

/// Result of re-encoding one image
#[derive(Debug)]
pub struct EncodedImage {
    /// The re-encoded JPEG bytes
    pub bytes: Vec<u8>,
    /// Pixel width of the decoded source
    pub width: u32,
    /// Pixel height of the decoded source
    pub height: u32,
}

struct EncodeJob {
    bytes: Vec<u8>,
    config: EncodeConfig,
    reply: oneshot::Sender<Result<EncodedImage, TranscodeError>>,
}

struct PoolInner {
    sender: Option<mpsc::Sender<EncodeJob>>,
    workers: Vec<thread::JoinHandle<()>>,
}

/// Fixed-size pool of JPEG re-encoding workers
pub struct CodecPool {
    inner: Mutex<PoolInner>,
}

impl CodecPool {
    /// Create a pool with `workers` dedicated encoder threads (at least one)
    pub fn new(workers: usize) -> Self {
        let (sender, receiver) = mpsc::channel::<EncodeJob>();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..workers.max(1))
            .map(|id| {
                let receiver = Arc::clone(&receiver);
                thread::Builder::new()
                    .name(format!("codec-{id}"))
                    .spawn(move || Self::worker_loop(receiver))
                    .expect("failed to spawn codec worker thread")
            })
            .collect();

        Self {
            inner: Mutex::new(PoolInner {
                sender: Some(sender),
                workers,
            }),
        }
    }

    /// Hand raw image bytes to the pool, receiving a handle to encode them
    pub fn ingest(&self, bytes: Vec<u8>) -> Result<ImageHandle, TranscodeError> {
        let inner = self.inner.lock().unwrap();
        let sender = inner
            .sender
            .as_ref()
            .ok_or(TranscodeError::PoolClosed)?
            .clone();
        Ok(ImageHandle { sender, bytes })
    }

    /// Shut the pool down: stop accepting jobs and join every worker.
    ///
    /// Idempotent; a second call is a no-op.
    pub fn close(&self) {
        let (sender, workers) = {
            let mut inner = self.inner.lock().unwrap();
            (inner.sender.take(), std::mem::take(&mut inner.workers))
        };
        // Dropping the sender ends every worker's recv loop.
        drop(sender);
        for worker in workers {
            let _ = worker.join();
        }
        debug!("codec pool closed");
    }

    fn worker_loop(receiver: Arc<Mutex<mpsc::Receiver<EncodeJob>>>) {
        loop {
            // Hold the lock only for the recv, not while encoding.
            let job = {
                let guard = receiver.lock().unwrap();
                guard.recv()
            };
            let job = match job {
                Ok(job) => job,
                Err(_) => break,
            };
            let result = Self::reencode(&job.bytes, job.config);
            // The requester may have been dropped; nothing to do then.
            let _ = job.reply.send(result);
        }
    }

    fn reencode(bytes: &[u8], config: EncodeConfig) -> Result<EncodedImage, TranscodeError> {
        let source = image::load_from_memory(bytes)?;
        let (width, height) = (source.width(), source.height());

        // The JPEG encoder rejects alpha channels, so normalize to RGB8.
        let rgb = source.to_rgb8();
        let mut out = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut out, config.quality);
        encoder.encode_image(&rgb)?;

        Ok(EncodedImage {
            bytes: out,
            width,
            height,
        })
    }
}

/// Handle to one ingested image, ready to be encoded
pub struct ImageHandle {
    sender: mpsc::Sender<EncodeJob>,
    bytes: Vec<u8>,
}

impl ImageHandle {
    /// Re-encode the ingested bytes on the pool, suspending until done
    pub async fn encode(self, config: EncodeConfig) -> Result<EncodedImage, TranscodeError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(EncodeJob {
                bytes: self.bytes,
                config,
                reply,
            })
            .map_err(|_| TranscodeError::PoolClosed)?;
        response.await.map_err(|_| TranscodeError::PoolClosed)?
    }
}
