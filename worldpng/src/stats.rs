//! Value distribution of a layer.

use std::collections::HashMap;

use crate::error::{Result, WorldError};
use crate::matrix::Matrix;

/// Upper bound on the number of buckets in one distribution.
pub const MAX_BUCKETS: u64 = 1 << 24;

// Largest magnitude below which every integer is an exact f64
const I64_EXACT: f64 = (1u64 << 53) as f64;

/// Histogram of a matrix's cells bucketed at a fixed decimal precision.
///
/// With `precision = 10` every cell is rounded to the nearest tenth, halves
/// rounding up (`-0.25` lands in `-0.2`).
/// Buckets cover the full range from the smallest to the largest cell,
/// including buckets with a zero count. NaN cells are not counted.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    precision: u32,
    first_bucket: i64,
    counts: Vec<u64>,
}

impl Distribution {
    /// Build the distribution of `matrix`.
    ///
    /// # Errors
    ///
    /// - [`WorldError::InvalidPrecision`] if `precision` is 0
    /// - [`WorldError::EmptyMatrix`] if the matrix has no cells
    /// - [`WorldError::DistributionTooWide`] if the range needs more than
    ///   [`MAX_BUCKETS`] buckets
    pub fn of(matrix: &Matrix, precision: u32) -> Result<Self> {
        if precision == 0 {
            return Err(WorldError::InvalidPrecision(precision));
        }
        let range = matrix.value_range()?;

        let scale = |v: f64| (v * precision as f64 + 0.5).floor();
        let (first, last) = (scale(range.min), scale(range.max));
        // Non-finite ends make the difference NaN or infinite
        let width = last - first;
        if !width.is_finite()
            || width >= MAX_BUCKETS as f64
            || first.abs() > I64_EXACT
            || last.abs() > I64_EXACT
        {
            return Err(WorldError::DistributionTooWide {
                min: range.min,
                max: range.max,
                precision,
                limit: MAX_BUCKETS,
            });
        }

        // Every non-NaN cell lies in [first, last], so these casts are exact
        let bucket = |v: f64| scale(v) as i64;
        let first_bucket = first as i64;
        let last_bucket = last as i64;

        let mut by_bucket: HashMap<i64, u64> = HashMap::new();
        for &v in matrix.cells().iter().filter(|v| !v.is_nan()) {
            *by_bucket.entry(bucket(v)).or_default() += 1;
        }

        let counts = (first_bucket..=last_bucket)
            .map(|b| by_bucket.get(&b).copied().unwrap_or(0))
            .collect();

        Ok(Self {
            precision,
            first_bucket,
            counts,
        })
    }

    /// Number of buckets per unit value.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Iterate `(bucket value, count)` pairs in ascending order.
    pub fn buckets(&self) -> impl Iterator<Item = (f64, u64)> + '_ {
        let precision = self.precision as f64;
        self.counts
            .iter()
            .enumerate()
            .map(move |(i, &count)| ((self.first_bucket + i as i64) as f64 / precision, count))
    }

    /// Total number of counted cells.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}
