//! Bilinear interpolation.
//!
//! This method performs linear interpolation in two dimensions using
//! the four nearest grid points.

use super::{Grid, Interpolator};
use crate::interpolation::common;

/// Bilinear interpolator
pub struct BilinearInterpolator;

impl Interpolator for BilinearInterpolator {
    fn sample(&self, grid: &Grid<'_>, y: f64, x: f64) -> Option<f32> {
        let (fy, fx) = grid.indices(y, x)?;
        let (rows, cols) = grid.shape();

        let y0 = fy.floor() as usize;
        let x0 = fx.floor() as usize;
        let y1 = (y0 + 1).min(rows - 1);
        let x1 = (x0 + 1).min(cols - 1);

        let corners = [
            grid.values[[y0, x0]],
            grid.values[[y0, x1]],
            grid.values[[y1, x0]],
            grid.values[[y1, x1]],
        ];
        // Any missing corner masks the whole cell
        if corners.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let (wx0, wx1) = common::linear_weight(fx - x0 as f64);
        let (wy0, wy1) = common::linear_weight(fy - y0 as f64);

        let top = corners[0] as f64 * wx0 + corners[1] as f64 * wx1;
        let bottom = corners[2] as f64 * wx0 + corners[3] as f64 * wx1;
        Some((top * wy0 + bottom * wy1) as f32)
    }

    fn name(&self) -> &str {
        "bilinear"
    }
}
