//! Diverging colormaps (two-hue progression with center).
//!
//! These colormaps are suitable for signed anomalies centred on zero.

use super::colormap::LutColormap;

/// RdBu colormap - dark red through near-white to dark blue
pub fn rd_bu() -> LutColormap {
    LutColormap::from_gradient("RdBu", &colorgrad::rd_bu())
}

/// RdBu_r colormap - blue for negative anomalies, red for positive ones
pub fn rd_bu_r() -> LutColormap {
    rd_bu().reversed("RdBu_r")
}
