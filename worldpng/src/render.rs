//! Matrix-to-raster rendering.

use std::time::Instant;

use tracing::debug;

use crate::color::{Pixel, RenderPolicy};
use crate::error::Result;
use crate::matrix::Matrix;

/// A fully rendered image, row-major, one [`Pixel`] per matrix cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
    policy: RenderPolicy,
}

impl Raster {
    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at column `x`, row `y`, or `None` if out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<Pixel> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Policy the raster was drawn with.
    pub fn policy(&self) -> RenderPolicy {
        self.policy
    }

    /// Interleaved `RGB` bytes, 3 per pixel.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect()
    }

    /// Interleaved `RGBA` bytes, 4 per pixel.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| [p.r, p.g, p.b, p.a]).collect()
    }
}

/// Render a matrix with the given policy.
///
/// The value range is computed from the matrix itself before any pixel is
/// produced, and the whole buffer is filled before returning.
///
/// # Errors
///
/// Returns [`crate::WorldError::EmptyMatrix`] if the matrix has no cells.
pub fn render(matrix: &Matrix, policy: RenderPolicy) -> Result<Raster> {
    let start = Instant::now();
    let range = matrix.value_range()?;

    let pixels: Vec<Pixel> = matrix
        .rows()
        .flat_map(|row| row.iter().map(move |&v| policy.color(v, range)))
        .collect();

    debug!(
        width = matrix.width(),
        height = matrix.height(),
        min = range.min,
        max = range.max,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "rendered matrix"
    );

    Ok(Raster {
        width: matrix.width(),
        height: matrix.height(),
        pixels,
        policy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorldError;

    fn levels(raster: &Raster) -> Vec<Vec<u8>> {
        (0..raster.height())
            .map(|y| {
                (0..raster.width())
                    .map(|x| raster.get(x, y).unwrap().r)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_render_dimensions() {
        let m = Matrix::from_rows("t", [[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]]).unwrap();
        let raster = render(&m, RenderPolicy::Grayscale).unwrap();

        assert_eq!(raster.width(), 4);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.pixels().len(), 8);
        assert_eq!(raster.get(4, 0), None);
    }

    #[test]
    fn test_render_two_by_two() {
        let m = Matrix::from_rows("t", [[0.0, 10.0], [5.0, 10.0]]).unwrap();
        let raster = render(&m, RenderPolicy::Grayscale).unwrap();

        assert_eq!(levels(&raster), vec![vec![0, 255], vec![128, 255]]);
        assert!(raster.pixels().iter().all(|p| p.a == 255));
    }

    #[test]
    fn test_render_uniform_matrix() {
        let m = Matrix::from_rows("t", [[7.0, 7.0], [7.0, 7.0]]).unwrap();
        let raster = render(&m, RenderPolicy::Grayscale).unwrap();
        assert!(raster.pixels().iter().all(|&p| p == Pixel::gray(0)));
    }

    #[test]
    fn test_render_river_overlay() {
        let m = Matrix::from_rows("rivermap", [[0.0, 3.0], [0.0, 0.0]]).unwrap();
        let raster = render(&m, RenderPolicy::ZeroIsTransparent).unwrap();

        let river = raster.get(1, 0).unwrap();
        assert!(river.is_visible());
        assert_eq!(river, Pixel::gray(255));

        for (x, y) in [(0, 0), (0, 1), (1, 1)] {
            assert_eq!(raster.get(x, y), Some(Pixel::TRANSPARENT));
        }
    }

    #[test]
    fn test_render_empty_matrix() {
        let result = render(&Matrix::empty(), RenderPolicy::Grayscale);
        assert!(matches!(result, Err(WorldError::EmptyMatrix { .. })));
    }

    #[test]
    fn test_byte_layouts() {
        let m = Matrix::from_rows("lakemap", [[0.0, 2.0]]).unwrap();
        let raster = render(&m, RenderPolicy::ZeroIsTransparent).unwrap();

        assert_eq!(raster.to_rgb_bytes(), vec![0, 0, 0, 255, 255, 255]);
        assert_eq!(raster.to_rgba_bytes(), vec![0, 0, 0, 0, 255, 255, 255, 255]);
        assert_eq!(raster.policy(), RenderPolicy::ZeroIsTransparent);
    }
}
