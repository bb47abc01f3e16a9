//! Configuration management for onsetplot.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::contour::ContourLevels;
use crate::error::{PlotError, Result};
use crate::plots::{LatDayOptions, LonDayOptions};
use crate::render::RenderOptions;

/// Which composite plot to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlotKind {
    /// Latitude vs. days relative to onset
    Latday,
    /// Days relative to onset vs. longitude
    Londay,
}

/// Command-line arguments for onsetplot
#[derive(Parser, Debug)]
#[command(name = "onsetplot")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the NetCDF file holding the composite fields
    pub netcdf_file: PathBuf,

    /// Variable to plot; repeat to fill successive panels
    #[arg(short, long = "var", required = true)]
    pub vars: Vec<String>,

    /// Plot type
    #[arg(short, long, value_enum, default_value = "latday")]
    pub kind: PlotKind,

    /// Output PNG path
    #[arg(short, long, default_value = "onset.png")]
    pub output: PathBuf,

    /// Also write the figure model as JSON
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Treat the field as precipitation (sequential colormap, levels from 0)
    #[arg(long)]
    pub precip: bool,

    /// Contour interval
    #[arg(long, conflicts_with_all = ["nlevels", "levels"])]
    pub cint: Option<f64>,

    /// Number of contour bands, at a nice spacing over the data range
    #[arg(long, conflicts_with = "levels")]
    pub nlevels: Option<usize>,

    /// Explicit contour levels, comma separated and increasing
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub levels: Vec<f64>,

    /// Preferred number of contours when the interval is automatic
    #[arg(long)]
    pub n_pref: Option<usize>,

    /// Latitude range as lo,hi
    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
    pub ylims: Option<(f64, f64)>,

    /// Day range as lo,hi
    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
    pub xlims: Option<(f64, f64)>,

    /// Days to mark with vertical lines
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub dlist: Vec<f64>,

    /// Draw gridlines
    #[arg(long)]
    pub grid: bool,

    /// Name of the onset index, used in the day axis label
    #[arg(long)]
    pub ind_nm: Option<String>,

    /// Subplot rows
    #[arg(long, env = "ONSETPLOT_ROWS", default_value = "1")]
    pub rows: usize,

    /// Subplot columns
    #[arg(long, env = "ONSETPLOT_COLS", default_value = "1")]
    pub cols: usize,

    /// Title for the whole figure
    #[arg(long)]
    pub title: Option<String>,

    /// Panel labels, one per variable
    #[arg(long, value_delimiter = ',')]
    pub labels: Vec<String>,

    /// Pixel width of each panel
    #[arg(long, env = "ONSETPLOT_WIDTH")]
    pub width: Option<u32>,

    /// Pixel height of each panel
    #[arg(long, env = "ONSETPLOT_HEIGHT")]
    pub height: Option<u32>,

    /// Interpolation used when rasterizing (nearest, bilinear)
    #[arg(long, env = "ONSETPLOT_INTERPOLATION")]
    pub interpolation: Option<String>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "ONSETPLOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ONSETPLOT_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Level request from `--cint`, `--nlevels` or `--levels`
fn requested_levels(args: &Args) -> ContourLevels {
    if let Some(cint) = args.cint {
        ContourLevels::Interval(cint)
    } else if let Some(n) = args.nlevels {
        ContourLevels::Count(n)
    } else if !args.levels.is_empty() {
        ContourLevels::from(args.levels.clone())
    } else {
        ContourLevels::Auto
    }
}

/// Parse `lo,hi` into a pair
fn parse_pair(s: &str) -> std::result::Result<(f64, f64), String> {
    let (lo, hi) = s
        .split_once(',')
        .ok_or_else(|| format!("expected lo,hi but got '{}'", s))?;
    let lo = lo.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let hi = hi.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok((lo, hi))
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_panel_width")]
    pub width_per_panel: u32,

    #[serde(default = "default_panel_height")]
    pub height_per_panel: u32,

    /// Interpolation method
    #[serde(default = "default_interpolation")]
    pub interpolation: String,
}

/// Defaults for latitude-day plots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatDayConfig {
    #[serde(default = "default_n_pref")]
    pub nc_pref: usize,

    #[serde(default = "default_ind_nm")]
    pub ind_nm: String,

    #[serde(default)]
    pub grid: bool,
}

/// Defaults for longitude-day plots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LonDayConfig {
    #[serde(default = "default_n_pref")]
    pub n_pref: usize,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub latday: LatDayConfig,

    #[serde(default)]
    pub londay: LonDayConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, Args)> {
        let args = Args::parse();
        let config = Self::from_args(&args)?;
        Ok((config, args))
    }

    /// Resolve configuration for already-parsed arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments and environment
        if let Some(width) = args.width {
            config.render.width_per_panel = width;
        }
        if let Some(height) = args.height {
            config.render.height_per_panel = height;
        }
        if let Some(interpolation) = &args.interpolation {
            config.render.interpolation = interpolation.clone();
        }
        if let Some(n_pref) = args.n_pref {
            config.latday.nc_pref = n_pref;
            config.londay.n_pref = n_pref;
        }
        if let Some(ind_nm) = &args.ind_nm {
            config.latday.ind_nm = ind_nm.clone();
        }
        if args.grid {
            config.latday.grid = true;
        }
        if let Some(level) = &args.log_level {
            config.log_level = level.clone();
        }

        Ok(config)
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.render = other.render;
        self.latday = other.latday;
        self.londay = other.londay;
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.render.width_per_panel == 0 || self.render.height_per_panel == 0 {
            return Err(PlotError::Config {
                message: format!(
                    "Panel size must be non-zero, got {}x{}",
                    self.render.width_per_panel, self.render.height_per_panel
                ),
            });
        }

        if self.latday.nc_pref == 0 || self.londay.n_pref == 0 {
            return Err(PlotError::Config {
                message: "Preferred number of contours must be at least 1".to_string(),
            });
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(PlotError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        // Validate interpolation method
        match self.render.interpolation.as_str() {
            "nearest" | "bilinear" => {}
            _ => {
                return Err(PlotError::Config {
                    message: format!(
                        "Invalid interpolation method: {}. Must be one of: nearest, bilinear",
                        self.render.interpolation
                    ),
                });
            }
        }

        Ok(())
    }

    /// Rasterizer options
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            interpolation: self.render.interpolation.clone(),
            ..RenderOptions::default()
        }
    }

    /// Figure size in pixels for a `rows` x `cols` group
    pub fn figure_size(&self, rows: usize, cols: usize) -> (u32, u32) {
        (
            self.render.width_per_panel * cols as u32,
            self.render.height_per_panel * rows as u32,
        )
    }

    /// Options for `contourf_latday`, combining config defaults and flags
    pub fn latday_options(&self, args: &Args) -> LatDayOptions {
        let mut opts = LatDayOptions {
            is_precip: args.precip,
            clev: requested_levels(args),
            nc_pref: self.latday.nc_pref,
            grid: self.latday.grid,
            ind_nm: self.latday.ind_nm.clone(),
            ..LatDayOptions::default()
        };
        if let Some(xlims) = args.xlims {
            opts.xlims = xlims;
        }
        if let Some(ylims) = args.ylims {
            opts.ylims = ylims;
        }
        if !args.dlist.is_empty() {
            opts.dlist = Some(args.dlist.clone());
        }
        opts
    }

    /// Options for `contourf_londay`, combining config defaults and flags
    pub fn londay_options(&self, args: &Args) -> LonDayOptions {
        LonDayOptions {
            clev: requested_levels(args),
            n_pref: self.londay.n_pref,
            ..LonDayOptions::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            latday: LatDayConfig::default(),
            londay: LonDayConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width_per_panel: default_panel_width(),
            height_per_panel: default_panel_height(),
            interpolation: default_interpolation(),
        }
    }
}

impl Default for LatDayConfig {
    fn default() -> Self {
        Self {
            nc_pref: default_n_pref(),
            ind_nm: default_ind_nm(),
            grid: false,
        }
    }
}

impl Default for LonDayConfig {
    fn default() -> Self {
        Self {
            n_pref: default_n_pref(),
        }
    }
}

// Default value functions for serde
fn default_panel_width() -> u32 {
    crate::figure::DEFAULT_PANEL_WIDTH
}

fn default_panel_height() -> u32 {
    crate::figure::DEFAULT_PANEL_HEIGHT
}

fn default_interpolation() -> String {
    "bilinear".to_string()
}

fn default_n_pref() -> usize {
    40
}

fn default_ind_nm() -> String {
    "onset".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
