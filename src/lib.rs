//! # onsetplot
//!
//! Filled contour figures of climate composites relative to monsoon onset.
//!
//! This library draws latitude-day and longitude-day composites into a grid of
//! subplots, labels the panels, and rasterizes the result to PNG.
//!
//! ## Key Features
//!
//! - **Automatic contour levels**: "nice" intervals chosen from the data range,
//!   symmetric about zero for anomalies
//! - **Matplotlib colormaps**: `RdBu_r` for signed fields, `PuBuGn` for precipitation
//! - **Explicit figure handle**: every plot call draws into a caller-owned [`FigGroup`]
//! - **NetCDF input**: variables load straight into labeled [`Field`]s
//!
//! ## Architecture
//!
//! - **Data Layer**: [`field`] and [`data_loader`] hold and read labeled arrays
//! - **Plot Layer**: [`plots`] fills [`figure::Axes`] using [`contour`] levels
//! - **Rendering**: [`render`] rasterizes with [`colormaps`] and [`interpolation`]

pub mod colormaps;
pub mod config;
pub mod contour;
#[cfg(feature = "netcdf")]
pub mod data_loader;
pub mod error;
pub mod field;
pub mod figure;
pub mod interpolation;
pub mod logging;
pub mod plots;
pub mod render;

pub use config::Config;
pub use contour::{cinterval, clevels, ContourLevels, Extend};
pub use error::{PlotError, Result};
pub use field::{AttributeValue, Field};
pub use figure::{Axes, FigGroup, FontWeight};
pub use logging::{
    generate_run_id, init_tracing, log_error, log_field_load_stats, log_operation_end,
    log_operation_start, log_timed_operation,
};
pub use plots::{
    add_labels, contourf_latday, contourf_londay, LabelPositions, LatDayOptions, LonDayOptions,
};
pub use render::{render_figure, save_png, scene_json, RenderOptions};
