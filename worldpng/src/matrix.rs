//! Rectangular grids of `f64` cells and their value ranges.
//!
//! A [`Matrix`] stores its cells row-major in one contiguous buffer. The
//! decoder guarantees every row has the same length, so a matrix is either
//! empty (no rows) or has `width >= 1` and `height >= 1`.

use crate::error::{Result, WorldError};

/// An immutable, row-major grid of floating point cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix {
    cells: Vec<f64>,
    width: usize,
    height: usize,
}

impl Matrix {
    /// Create an empty matrix (zero rows).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a matrix from rows, checking that all rows have the same length.
    ///
    /// The `name` is only used in the error when the rows are ragged.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RaggedMatrix`] if any row differs in length from
    /// the first one.
    pub fn from_rows<I, R>(name: &'static str, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[f64]>,
    {
        let mut cells = Vec::new();
        let mut width = 0;
        let mut height = 0;

        for (index, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            if index == 0 {
                width = row.len();
            } else if row.len() != width {
                return Err(WorldError::RaggedMatrix {
                    matrix: name,
                    row: index,
                    expected: width,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
            height += 1;
        }

        // A single row of zero cells still counts as "nothing here".
        if width == 0 {
            height = 0;
        }

        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// Number of cells per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true if the matrix has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Cell at column `x`, row `y`, or `None` if out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Iterate over rows as slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on a zero chunk size
        self.cells.chunks_exact(self.width.max(1))
    }

    /// Compute the minimum and maximum cell value in a single pass.
    ///
    /// NaN cells are ignored. If every cell is NaN the range is the
    /// degenerate `(0, 0)`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyMatrix`] if the matrix has no rows or columns.
    pub fn value_range(&self) -> Result<ValueRange> {
        if self.is_empty() {
            return Err(WorldError::EmptyMatrix {
                width: self.width,
                height: self.height,
            });
        }

        let (min, max) = self
            .cells
            .iter()
            .filter(|v| !v.is_nan())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
                (min.min(v), max.max(v))
            });

        if min > max {
            return Ok(ValueRange::new(0.0, 0.0));
        }

        Ok(ValueRange::new(min, max))
    }
}

/// The `(min, max)` pair of a matrix's cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    /// Smallest cell value.
    pub min: f64,
    /// Largest cell value.
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Distance between `max` and `min`.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Returns true if every cell had the same value.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_dimensions() {
        let m = Matrix::from_rows("test", [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.width(), 3);
        assert_eq!(m.height(), 2);
        assert_eq!(m.get(2, 1), Some(6.0));
        assert_eq!(m.get(3, 0), None);
        assert_eq!(m.rows().count(), 2);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0]];
        let result = Matrix::from_rows("rivermap", rows);

        match result {
            Err(WorldError::RaggedMatrix {
                matrix,
                row,
                expected,
                found,
            }) => {
                assert_eq!(matrix, "rivermap");
                assert_eq!(row, 1);
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("Expected RaggedMatrix error, got {:?}", other),
        }
    }

    #[test]
    fn test_rows_of_zero_width_are_empty() {
        let rows: Vec<Vec<f64>> = vec![vec![], vec![]];
        let m = Matrix::from_rows("test", rows).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.rows().count(), 0);
    }

    #[test]
    fn test_value_range_bounds_every_cell() {
        let m = Matrix::from_rows("test", [[3.5, -2.0, 8.0], [0.0, 12.25, -7.5]]).unwrap();
        let range = m.value_range().unwrap();

        assert_eq!(range.min, -7.5);
        assert_eq!(range.max, 12.25);
        for &v in m.cells() {
            assert!(range.min <= v && v <= range.max);
        }
        assert!(m.cells().contains(&range.min));
        assert!(m.cells().contains(&range.max));
    }

    #[test]
    fn test_value_range_all_negative() {
        // Max must start below every value, not at a tiny positive number.
        let m = Matrix::from_rows("test", [[-5.0, -3.0]]).unwrap();
        let range = m.value_range().unwrap();
        assert_eq!(range.min, -5.0);
        assert_eq!(range.max, -3.0);
    }

    #[test]
    fn test_value_range_empty_fails() {
        let result = Matrix::empty().value_range();
        assert!(matches!(
            result,
            Err(WorldError::EmptyMatrix {
                width: 0,
                height: 0
            })
        ));
    }

    #[test]
    fn test_value_range_skips_nan() {
        let m = Matrix::from_rows("test", [[f64::NAN, 4.0], [1.0, f64::NAN]]).unwrap();
        assert_eq!(m.value_range().unwrap(), ValueRange::new(1.0, 4.0));

        let m = Matrix::from_rows("test", [[f64::NAN, f64::NAN]]).unwrap();
        let range = m.value_range().unwrap();
        assert!(range.is_degenerate());
        assert_eq!(range.min, 0.0);
    }

    #[test]
    fn test_uniform_matrix_is_degenerate() {
        let m = Matrix::from_rows("test", [[7.0, 7.0], [7.0, 7.0]]).unwrap();
        let range = m.value_range().unwrap();
        assert!(range.is_degenerate());
        assert_eq!(range.span(), 0.0);
    }
}
