//! Nearest neighbor interpolation.
//!
//! Selects the value of the nearest grid point, producing blocky cells that
//! show the native grid resolution.

use super::{Grid, Interpolator};
use crate::interpolation::common;

/// Nearest neighbor interpolator
pub struct NearestInterpolator;

impl Interpolator for NearestInterpolator {
    fn sample(&self, grid: &Grid<'_>, y: f64, x: f64) -> Option<f32> {
        let (fy, fx) = grid.indices(y, x)?;
        let (rows, cols) = grid.shape();

        let row = common::clamp_index(fy.round(), rows) as usize;
        let col = common::clamp_index(fx.round(), cols) as usize;

        let value = grid.values[[row, col]];
        value.is_finite().then_some(value)
    }

    fn name(&self) -> &str {
        "nearest"
    }
}
