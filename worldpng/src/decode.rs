//! Decoding `.world` records into [`Snapshot`]s.
//!
//! World files can be very large, so the decoder imposes no size ceiling
//! unless one is configured. Length prefixes are still validated against the
//! bytes actually available, so a corrupt prefix fails as truncated input
//! instead of triggering a huge allocation.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use memmap2::Mmap;
use prost::Message;
use tracing::debug;

use crate::error::{Result, WorldError};
use crate::schema;
use crate::snapshot::Snapshot;

/// Decodes world records with an optional input size limit.
///
/// # Example
///
/// ```ignore
/// use worldpng::SnapshotDecoder;
///
/// let snapshot = SnapshotDecoder::new().decode_file("earth.world")?;
/// println!("{}x{} height map", snapshot.height_map.width(), snapshot.height_map.height());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotDecoder {
    /// Maximum accepted record size in bytes; `None` means unbounded.
    size_limit: Option<u64>,
}

impl SnapshotDecoder {
    /// Create a decoder without a size limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum accepted record size in bytes (`None` for unbounded).
    pub fn with_size_limit(mut self, limit: Option<u64>) -> Self {
        self.size_limit = limit;
        self
    }

    /// The configured size limit.
    pub fn size_limit(&self) -> Option<u64> {
        self.size_limit
    }

    /// Decode a `.world` file.
    ///
    /// The file is memory-mapped and decoded in one forward pass. The mapping
    /// and file handle are released when this returns, on success or error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened or memory-mapped
    /// - The file is larger than the size limit
    /// - The record is truncated, malformed or contains a ragged matrix
    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> Result<Snapshot> {
        let path = path.as_ref();
        let start = Instant::now();
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        self.check_size(size)?;

        let snapshot = if size == 0 {
            self.decode_bytes(&[])?
        } else {
            // SAFETY: the mapping is read-only and dropped before returning;
            // the input is not expected to change while a run is decoding it.
            let mmap = unsafe { Mmap::map(&file)? };
            self.decode_bytes(&mmap)?
        };

        debug!(
            path = %path.display(),
            bytes = size,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "decoded world file"
        );
        Ok(snapshot)
    }

    /// Decode a record from any reader.
    ///
    /// The reader is consumed up to the size limit (or to the end when
    /// unbounded) before decoding.
    pub fn decode_reader<R: Read>(&self, reader: R) -> Result<Snapshot> {
        let mut buf = Vec::new();
        match self.size_limit {
            Some(limit) => {
                // One byte past the limit is enough to detect an oversized record
                reader
                    .take(limit.saturating_add(1))
                    .read_to_end(&mut buf)?;
                self.check_size(buf.len() as u64)?;
            }
            None => {
                let mut reader = reader;
                reader.read_to_end(&mut buf)?;
            }
        }
        self.decode_bytes(&buf)
    }

    /// Decode a record held in memory.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Snapshot> {
        self.check_size(bytes.len() as u64)?;
        let world = schema::World::decode(bytes)?;
        Snapshot::from_proto(world)
    }

    fn check_size(&self, size: u64) -> Result<()> {
        match self.size_limit {
            Some(limit) if size > limit => Err(WorldError::SizeLimitExceeded { size, limit }),
            _ => Ok(()),
        }
    }
}
