//! Snapshot processing with skip-if-exists caching.
//!
//! This module provides [`SnapshotProcessor`], which turns one `.world` file
//! into up to five PNG layers next to it.
//!
//! Decoding a large world dominates the runtime, so the processor checks the
//! output files first:
//!
//! - If every selected layer already exists, the input is not decoded at all.
//! - Otherwise the input is decoded once, and each layer is checked again
//!   right before it is rendered, so an interrupted run resumes with only
//!   the missing layers.
//!
//! ```ignore
//! use worldpng::SnapshotProcessor;
//!
//! let processor = SnapshotProcessor::builder().size_limit(None).build();
//! let report = processor.process_file("maps/pangaea.world")?;
//! println!("rendered {} layers", report.rendered.len());
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::decode::SnapshotDecoder;
use crate::error::{Result, WorldError};
use crate::layer::{base_path, is_world_file, Layer};
use crate::png::write_png;
use crate::render::{render, Raster};
use crate::snapshot::Snapshot;

/// Outcome of processing a single input file.
#[derive(Debug, Default)]
pub struct FileReport {
    /// The input file.
    pub input: PathBuf,
    /// Whether the input had to be decoded.
    pub decoded: bool,
    /// Layers written during this run.
    pub rendered: Vec<Layer>,
    /// Layers whose output already existed.
    pub skipped: Vec<Layer>,
    /// Layers with no data in the snapshot.
    pub empty: Vec<Layer>,
    /// Layers that failed to render or write.
    pub failed: Vec<(Layer, WorldError)>,
    /// Total elapsed time in milliseconds.
    pub elapsed_ms: u64,
}

impl FileReport {
    fn new(input: &Path) -> Self {
        Self {
            input: input.to_path_buf(),
            ..Default::default()
        }
    }

    /// True if nothing had to be done because every output already existed.
    pub fn is_up_to_date(&self) -> bool {
        !self.decoded && self.failed.is_empty()
    }

    /// True if no layer failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Renders world snapshots to per-layer PNG files.
///
/// # Example
///
/// ```ignore
/// use worldpng::{Layer, SnapshotProcessor};
///
/// let processor = SnapshotProcessor::builder()
///     .layers([Layer::Height, Layer::Rivers])
///     .build();
/// let report = processor.process_file("earth.world")?;
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotProcessor {
    decoder: SnapshotDecoder,
    layers: Vec<Layer>,
}

impl Default for SnapshotProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotProcessor {
    /// Create a processor for all five layers with an unbounded decoder.
    pub fn new() -> Self {
        ProcessorBuilder::new().build()
    }

    /// Create a builder for more configuration options.
    pub fn builder() -> ProcessorBuilder {
        ProcessorBuilder::new()
    }

    /// The decoder used for inputs.
    pub fn decoder(&self) -> &SnapshotDecoder {
        &self.decoder
    }

    /// Layers this processor produces, in render order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Output paths for `input`, one per selected layer.
    pub fn outputs(&self, input: &Path) -> Vec<(Layer, PathBuf)> {
        let base = base_path(input);
        self.layers
            .iter()
            .map(|&layer| (layer, layer.output_path(&base)))
            .collect()
    }

    /// Render every missing layer of `input`.
    ///
    /// Layer failures are collected in the report and do not stop the
    /// remaining layers.
    ///
    /// # Errors
    ///
    /// Returns an error only if the input has to be decoded and decoding
    /// fails; no layer is written in that case.
    pub fn process_file<P: AsRef<Path>>(&self, input: P) -> Result<FileReport> {
        let input = input.as_ref();
        let start = Instant::now();
        let mut report = FileReport::new(input);
        let outputs = self.outputs(input);

        if outputs.iter().all(|(_, path)| path.is_file()) {
            debug!(input = %input.display(), "all layers present, skipping decode");
            report.skipped = self.layers.clone();
            report.elapsed_ms = start.elapsed().as_millis() as u64;
            return Ok(report);
        }

        let snapshot = self.decoder.decode_file(input)?;
        report.decoded = true;

        for (layer, path) in outputs {
            // Re-check: another run may have produced it since the first check
            if path.is_file() {
                report.skipped.push(layer);
                continue;
            }

            match Self::render_layer(&snapshot, layer).and_then(|r| write_png(&r, &path)) {
                Ok(()) => report.rendered.push(layer),
                Err(WorldError::EmptyMatrix { .. }) => {
                    debug!(input = %input.display(), %layer, "layer has no data");
                    report.empty.push(layer);
                }
                Err(e) => {
                    warn!(input = %input.display(), %layer, error = %e, "layer failed");
                    report.failed.push((layer, e));
                }
            }
        }

        report.elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            input = %input.display(),
            rendered = report.rendered.len(),
            skipped = report.skipped.len(),
            empty = report.empty.len(),
            failed = report.failed.len(),
            elapsed_ms = report.elapsed_ms,
            "processed world file"
        );
        Ok(report)
    }

    /// Render one layer of a decoded snapshot with that layer's policy.
    pub fn render_layer(snapshot: &Snapshot, layer: Layer) -> Result<Raster> {
        render(snapshot.matrix(layer), layer.policy())
    }
}

/// Builder for creating [`SnapshotProcessor`] with custom configuration.
///
/// # Example
///
/// ```ignore
/// use worldpng::ProcessorBuilder;
///
/// let processor = ProcessorBuilder::new()
///     .size_limit(Some(4 * 1024 * 1024 * 1024))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ProcessorBuilder {
    size_limit: Option<u64>,
    layers: Vec<Layer>,
}

impl Default for ProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessorBuilder {
    /// Create a builder for all layers with no size limit.
    pub fn new() -> Self {
        Self {
            size_limit: None,
            layers: Layer::ALL.to_vec(),
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `WORLDPNG_SIZE_LIMIT` | Maximum world file size in bytes | Unbounded |
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let size_limit = std::env::var("WORLDPNG_SIZE_LIMIT")
            .ok()
            .and_then(|s| s.trim().parse().ok());

        Self {
            size_limit,
            ..Self::new()
        }
    }

    /// Set the maximum accepted world file size in bytes (`None` = unbounded).
    pub fn size_limit(mut self, limit: Option<u64>) -> Self {
        self.size_limit = limit;
        self
    }

    /// Restrict output to the given layers.
    ///
    /// Layers are always rendered in the canonical order of [`Layer::ALL`];
    /// duplicates are ignored.
    pub fn layers<I: IntoIterator<Item = Layer>>(mut self, layers: I) -> Self {
        let wanted: Vec<Layer> = layers.into_iter().collect();
        self.layers = Layer::ALL
            .into_iter()
            .filter(|l| wanted.contains(l))
            .collect();
        self
    }

    /// Build the [`SnapshotProcessor`].
    pub fn build(self) -> SnapshotProcessor {
        SnapshotProcessor {
            decoder: SnapshotDecoder::new().with_size_limit(self.size_limit),
            layers: self.layers,
        }
    }
}

/// List the `.world` files directly inside `dir`, sorted by name.
///
/// Subdirectories are not searched.
pub fn scan_world_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_world_file(path))
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix;
    use tempfile::TempDir;

    fn grid(name: &'static str, rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(name, rows.iter().copied()).unwrap()
    }

    fn write_world(dir: &Path, name: &str, snapshot: &Snapshot) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, snapshot.encode_to_vec()).unwrap();
        path
    }

    fn full_snapshot() -> Snapshot {
        Snapshot {
            height_map: grid("h", &[&[0.0, 10.0], &[5.0, 10.0]]),
            temperature: grid("t", &[&[-1.0, 1.0], &[0.0, 0.5]]),
            precipitation: grid("p", &[&[7.0, 7.0], &[7.0, 7.0]]),
            rivers: grid("r", &[&[0.0, 3.0], &[0.0, 0.0]]),
            lakes: grid("l", &[&[1.0, 0.0], &[0.0, 0.0]]),
            ..Default::default()
        }
    }

    #[test]
    fn test_process_file_renders_all_layers() {
        let dir = TempDir::new().unwrap();
        let input = write_world(dir.path(), "earth.world", &full_snapshot());

        let report = SnapshotProcessor::new().process_file(&input).unwrap();

        assert!(report.decoded);
        assert_eq!(report.rendered, Layer::ALL.to_vec());
        assert!(report.failed.is_empty());
        for suffix in ["height", "temp", "rain", "rivers", "lakes"] {
            assert!(dir.path().join(format!("earth-{}.png", suffix)).exists());
        }
    }

    #[test]
    fn test_second_run_skips_decode() {
        let dir = TempDir::new().unwrap();
        let input = write_world(dir.path(), "earth.world", &full_snapshot());
        let processor = SnapshotProcessor::new();

        processor.process_file(&input).unwrap();
        let before = fs::read(dir.path().join("earth-height.png")).unwrap();

        // Corrupt the input: a second run must not even look at it.
        fs::write(&input, b"\xFF\xFF\xFF").unwrap();
        let report = processor.process_file(&input).unwrap();

        assert!(report.is_up_to_date());
        assert!(!report.decoded);
        assert!(report.rendered.is_empty());
        assert_eq!(report.skipped.len(), 5);
        assert_eq!(fs::read(dir.path().join("earth-height.png")).unwrap(), before);
    }

    #[test]
    fn test_resume_renders_only_missing_layers() {
        let dir = TempDir::new().unwrap();
        let input = write_world(dir.path(), "earth.world", &full_snapshot());
        let processor = SnapshotProcessor::new();
        processor.process_file(&input).unwrap();

        fs::remove_file(dir.path().join("earth-rivers.png")).unwrap();
        let report = processor.process_file(&input).unwrap();

        assert!(report.decoded);
        assert_eq!(report.rendered, vec![Layer::Rivers]);
        assert_eq!(report.skipped.len(), 4);
    }

    #[test]
    fn test_empty_layers_are_not_failures() {
        let dir = TempDir::new().unwrap();
        let snapshot = Snapshot {
            height_map: grid("h", &[&[1.0, 2.0]]),
            ..Default::default()
        };
        let input = write_world(dir.path(), "small.world", &snapshot);

        let report = SnapshotProcessor::new().process_file(&input).unwrap();

        assert!(report.is_success());
        assert_eq!(report.rendered, vec![Layer::Height]);
        assert_eq!(report.empty.len(), 4);
        assert!(!dir.path().join("small-lakes.png").exists());
    }

    #[test]
    fn test_decode_failure_is_per_file_error() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("broken.world");
        fs::write(&input, b"\x32\xFF\xFF\xFF\x0F").unwrap();

        let result = SnapshotProcessor::new().process_file(&input);
        assert!(matches!(result, Err(WorldError::Decode(_))));
        assert!(!dir.path().join("broken-height.png").exists());
    }

    #[test]
    fn test_layer_write_failure_does_not_stop_siblings() {
        let dir = TempDir::new().unwrap();
        let input = write_world(dir.path(), "earth.world", &full_snapshot());
        // A non-empty directory at the output path cannot be replaced.
        let blocker = dir.path().join("earth-rain.png");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), b"x").unwrap();

        let report = SnapshotProcessor::new().process_file(&input).unwrap();

        assert!(!report.is_success());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, Layer::Precipitation);
        assert_eq!(
            report.rendered,
            vec![Layer::Height, Layer::Temperature, Layer::Rivers, Layer::Lakes]
        );
        assert!(blocker.is_dir());
    }

    #[test]
    fn test_builder_layers_keep_canonical_order() {
        let processor = SnapshotProcessor::builder()
            .layers([Layer::Lakes, Layer::Height, Layer::Lakes])
            .build();
        assert_eq!(processor.layers(), &[Layer::Height, Layer::Lakes]);

        let outputs = processor.outputs(Path::new("w/terra.world"));
        assert_eq!(outputs[0].1, PathBuf::from("w/terra-height.png"));
        assert_eq!(outputs[1].1, PathBuf::from("w/terra-lakes.png"));
    }

    #[test]
    fn test_builder_size_limit() {
        let dir = TempDir::new().unwrap();
        let input = write_world(dir.path(), "earth.world", &full_snapshot());

        let processor = SnapshotProcessor::builder().size_limit(Some(16)).build();
        assert_eq!(processor.decoder().size_limit(), Some(16));
        let result = processor.process_file(&input);
        assert!(matches!(result, Err(WorldError::SizeLimitExceeded { .. })));
    }

    #[test]
    fn test_scan_world_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.world"), b"").unwrap();
        fs::write(dir.path().join("a.world"), b"").unwrap();
        fs::write(dir.path().join("a-height.png"), b"").unwrap();
        fs::create_dir(dir.path().join("nested.world")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.world"), b"").unwrap();

        let files = scan_world_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.world", "b.world"]);
    }
}
