//! Common utilities for interpolation algorithms.
//!
//! Grids are rectilinear: one coordinate vector per axis, each monotonic but
//! not necessarily evenly spaced.

use ndarray::ArrayView2;

/// A 2-D value grid with rows along `ys` and columns along `xs`
#[derive(Debug, Clone, Copy)]
pub struct Grid<'a> {
    pub values: ArrayView2<'a, f32>,
    pub ys: &'a [f64],
    pub xs: &'a [f64],
}

impl<'a> Grid<'a> {
    pub fn new(values: ArrayView2<'a, f32>, ys: &'a [f64], xs: &'a [f64]) -> Self {
        Self { values, ys, xs }
    }

    /// Fractional (row, column) indices of a coordinate pair
    pub fn indices(&self, y: f64, x: f64) -> Option<(f64, f64)> {
        Some((coord_to_index(y, self.ys)?, coord_to_index(x, self.xs)?))
    }

    pub fn shape(&self) -> (usize, usize) {
        let shape = self.values.shape();
        (shape[0], shape[1])
    }
}

/// Map a coordinate value to a fractional index on a monotonic coordinate
/// vector. Returns `None` outside the coordinate range.
pub fn coord_to_index(coord: f64, coord_values: &[f64]) -> Option<f64> {
    let n = coord_values.len();
    if n == 0 || !coord.is_finite() {
        return None;
    }

    let first = coord_values[0];
    let last = coord_values[n - 1];
    if n == 1 {
        return (coord == first).then_some(0.0);
    }

    let ascending = last >= first;
    let (lo, hi) = if ascending { (first, last) } else { (last, first) };
    if coord < lo || coord > hi {
        return None;
    }

    let below = if ascending {
        coord_values.partition_point(|&v| v <= coord)
    } else {
        coord_values.partition_point(|&v| v >= coord)
    };
    let i = below.saturating_sub(1).min(n - 2);

    let span = coord_values[i + 1] - coord_values[i];
    let fraction = if span == 0.0 {
        0.0
    } else {
        (coord - coord_values[i]) / span
    };
    Some(i as f64 + fraction)
}

/// Clamp an index to valid bounds
pub fn clamp_index(index: f64, size: usize) -> f64 {
    index.max(0.0).min(size.saturating_sub(1) as f64)
}

/// Get the weight for linear interpolation
pub fn linear_weight(fraction: f64) -> (f64, f64) {
    (1.0 - fraction, fraction)
}
