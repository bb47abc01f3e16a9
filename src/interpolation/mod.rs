//! Sampling of gridded data at arbitrary coordinates.
//!
//! The renderer maps every pixel to a (y, x) coordinate pair and asks an
//! [`Interpolator`] for the field value there.

pub mod bilinear;
pub mod common;
pub mod nearest;

use crate::error::{PlotError, Result};

pub use common::Grid;

/// Trait for interpolation methods
pub trait Interpolator: Send + Sync {
    /// Value at coordinate `(y, x)`, or `None` outside the grid or where the
    /// surrounding data is missing
    fn sample(&self, grid: &Grid<'_>, y: f64, x: f64) -> Option<f32>;

    /// Get the name of this interpolation method
    fn name(&self) -> &str;
}

/// Get an interpolator by name
pub fn get_interpolator(name: &str) -> Result<Box<dyn Interpolator>> {
    match name.to_lowercase().as_str() {
        "nearest" => Ok(Box::new(nearest::NearestInterpolator)),
        "bilinear" => Ok(Box::new(bilinear::BilinearInterpolator)),
        _ => Err(PlotError::InvalidParameter {
            param: "interpolation".to_string(),
            message: format!("Unknown interpolation method: {}", name),
        }),
    }
}
