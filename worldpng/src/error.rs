//! Error types for the worldpng library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while decoding or rendering a world snapshot.
#[derive(Error, Debug)]
pub enum WorldError {
    /// IO error when reading or writing files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot record is truncated or not valid wire data.
    #[error("Malformed world record: {0}")]
    Decode(#[from] prost::DecodeError),

    /// The input is larger than the configured decoder size limit.
    /// When reading from a stream, `size` is the number of bytes read before
    /// giving up, not the full record size.
    #[error("World record of {size} bytes exceeds the size limit of {limit} bytes")]
    SizeLimitExceeded { size: u64, limit: u64 },

    /// A matrix in the record has rows of differing lengths.
    #[error("Matrix `{matrix}` is not rectangular: row {row} has {found} cells, expected {expected}")]
    RaggedMatrix {
        matrix: &'static str,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A layer has no rows or no columns, so there is nothing to render.
    #[error("Matrix is empty ({width}x{height})")]
    EmptyMatrix { width: usize, height: usize },

    /// Encoding or writing a PNG image failed.
    #[error("Failed to write image {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Histogram precision must be at least 1.
    #[error("Invalid distribution precision: {0} (must be at least 1)")]
    InvalidPrecision(u32),

    /// The value range spans more histogram buckets than can be counted.
    #[error("Distribution from {min} to {max} at precision {precision} needs more than {limit} buckets")]
    DistributionTooWide {
        min: f64,
        max: f64,
        precision: u32,
        limit: u64,
    },
}

/// Result type alias using [`WorldError`].
pub type Result<T> = std::result::Result<T, WorldError>;
