//! # Error Types Module
//!
//! Typed errors for the transcoding pipeline.
//!
//! ## Categories:
//! - `Io`: I/O failures (unreadable source, unwritable destination)
//! - `Image`: codec failures (corrupt JPEG, unsupported pixel data)
//! - `PoolClosed`: work submitted to a codec pool after `close()`
//!
//! Orchestration code propagates these through `anyhow` for context chaining;
//! the enum exists so callers can match on the category when they care.

/// Custom error types for batch transcoding
#[derive(thiserror::Error, Debug)]
pub enum TranscodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("codec pool is closed")]
    PoolClosed,
}
