//! Sequential colormaps (single-hue progression).
//!
//! These colormaps are suitable for non-negative data such as precipitation.

use super::colormap::LutColormap;

/// PuBuGn colormap - near-white through purple-blue to dark green
pub fn pu_bu_gn() -> LutColormap {
    LutColormap::from_gradient("PuBuGn", &colorgrad::pu_bu_gn())
}

/// Viridis colormap - perceptually uniform, colorblind-friendly
pub fn viridis() -> LutColormap {
    LutColormap::from_gradient("viridis", &colorgrad::viridis())
}
