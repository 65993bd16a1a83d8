//! PNG output for rendered rasters.
//!
//! Greyscale layers are written as 8-bit RGB. Rasters drawn with an overlay
//! policy are written as RGBA so that cells without a feature stay
//! transparent.
//!
//! Images are encoded into a temporary file next to the destination and
//! renamed into place once complete. An output path that exists is therefore
//! always a finished image, which is what the skip-if-exists check relies on.

use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::error::{LimitError, LimitErrorKind};
use image::{ColorType, ImageEncoder, ImageError};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Result, WorldError};
use crate::render::Raster;

/// Encode `raster` as PNG and write it to `path`.
///
/// # Errors
///
/// Returns [`WorldError::Encode`] if the image cannot be encoded, or
/// [`WorldError::Io`] if the temporary file cannot be created or moved into
/// place. On error nothing is left at `path`.
pub fn write_png<P: AsRef<Path>>(raster: &Raster, path: P) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        encode_for(raster, &mut writer, path)?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| WorldError::Io(e.error))?;

    debug!(
        path = %path.display(),
        width = raster.width(),
        height = raster.height(),
        "wrote png"
    );
    Ok(())
}

/// Encode into `writer`, attributing failures to the destination `path`.
fn encode_for<W: Write>(raster: &Raster, writer: W, path: &Path) -> Result<()> {
    encode_png(raster, writer).map_err(|source| WorldError::Encode {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode `raster` as PNG into any writer.
pub fn encode_png<W: Write>(raster: &Raster, writer: W) -> std::result::Result<(), ImageError> {
    let width = dimension(raster.width())?;
    let height = dimension(raster.height())?;
    let encoder = PngEncoder::new(writer);

    if raster.policy().has_alpha() {
        encoder.write_image(&raster.to_rgba_bytes(), width, height, ColorType::Rgba8)
    } else {
        encoder.write_image(&raster.to_rgb_bytes(), width, height, ColorType::Rgb8)
    }
}

fn dimension(value: usize) -> std::result::Result<u32, ImageError> {
    u32::try_from(value)
        .map_err(|_| ImageError::Limits(LimitError::from_kind(LimitErrorKind::DimensionError)))
}
