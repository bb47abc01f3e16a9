//! Colormap trait and utilities.
//!
//! This module defines the common interface for all colormaps and the
//! lookup-table representation the concrete maps are built on.

use crate::error::{PlotError, Result};

/// Number of entries sampled from a gradient into a lookup table
pub const LUT_SIZE: usize = 256;

/// Trait for color mapping implementations
pub trait Colormap: Send + Sync {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color
    fn map_normalized(&self, value: f32) -> [u8; 4];

    /// Map a value to an RGBA color given the data range
    fn map(&self, value: f32, min: f32, max: f32) -> [u8; 4] {
        let normalized = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.map_normalized(normalized)
    }

    /// Get the name of this colormap
    fn name(&self) -> &str;
}

/// A colormap backed by evenly spaced samples of a continuous gradient
#[derive(Debug, Clone)]
pub struct LutColormap {
    name: &'static str,
    lut: Vec<[u8; 3]>,
}

impl LutColormap {
    /// Sample a `colorgrad` gradient into a lookup table
    pub fn from_gradient(name: &'static str, gradient: &colorgrad::Gradient) -> Self {
        let lut = (0..LUT_SIZE)
            .map(|i| {
                let [r, g, b, _] = gradient
                    .at(i as f64 / (LUT_SIZE - 1) as f64)
                    .to_rgba8();
                [r, g, b]
            })
            .collect();
        Self { name, lut }
    }

    /// The same map traversed from the high end to the low end
    pub fn reversed(&self, name: &'static str) -> Self {
        let mut lut = self.lut.clone();
        lut.reverse();
        Self { name, lut }
    }
}

impl Colormap for LutColormap {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        let value = if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let position = value * (self.lut.len() - 1) as f32;
        let index = position.floor() as usize;

        if index >= self.lut.len() - 1 {
            let [r, g, b] = self.lut[self.lut.len() - 1];
            return [r, g, b, 255];
        }

        let t = position - index as f32;
        let rgb = lerp_color(self.lut[index], self.lut[index + 1], t);
        [rgb[0], rgb[1], rgb[2], 255]
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Get a colormap by its matplotlib name (case-insensitive)
pub fn get_colormap(name: &str) -> Result<Box<dyn Colormap>> {
    use super::{diverging::*, sequential::*};

    match name.to_lowercase().as_str() {
        "rdbu_r" => Ok(Box::new(rd_bu_r())),
        "rdbu" => Ok(Box::new(rd_bu())),
        "pubugn" => Ok(Box::new(pu_bu_gn())),
        "viridis" => Ok(Box::new(viridis())),
        _ => Err(PlotError::InvalidParameter {
            param: "colormap".to_string(),
            message: format!("Unknown colormap: {}", name),
        }),
    }
}

/// Linear interpolation between two colors
pub fn lerp_color(c1: [u8; 3], c2: [u8; 3], t: f32) -> [u8; 3] {
    [
        (c1[0] as f32 * (1.0 - t) + c2[0] as f32 * t) as u8,
        (c1[1] as f32 * (1.0 - t) + c2[1] as f32 * t) as u8,
        (c1[2] as f32 * (1.0 - t) + c2[2] as f32 * t) as u8,
    ]
}
