//! Colormap implementations for filled contours.
//!
//! This module provides the matplotlib colormaps the plots select by name.

pub mod colormap;
pub mod diverging;
pub mod sequential;

pub use colormap::{get_colormap, Colormap, LutColormap};

// Re-export commonly used colormaps
pub use diverging::{rd_bu, rd_bu_r};
pub use sequential::{pu_bu_gn, viridis};
