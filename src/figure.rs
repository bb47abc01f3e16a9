//! Retained figure model.
//!
//! A [`FigGroup`] is a grid of [`Axes`] with a current position. Plot
//! routines draw into the current axes; nothing is rasterized until the group
//! is handed to [`crate::render`].

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::contour::{validate_levels, Extend};
use crate::error::{PlotError, Result};

/// Default panel size in pixels
pub const DEFAULT_PANEL_WIDTH: u32 = 400;
pub const DEFAULT_PANEL_HEIGHT: u32 = 300;

/// An RGBA color
pub type Rgba = [u8; 4];

pub const BLACK: Rgba = [0, 0, 0, 255];

/// Parse a matplotlib-style color: single-letter codes (`"k"`, `"r"`, ...),
/// grayscale strings (`"0.5"`), or `#rrggbb`.
pub fn parse_color(color: &str) -> Result<Rgba> {
    let color = color.trim();
    let named = match color {
        "k" | "black" => Some([0, 0, 0, 255]),
        "w" | "white" => Some([255, 255, 255, 255]),
        "r" | "red" => Some([255, 0, 0, 255]),
        "g" | "green" => Some([0, 128, 0, 255]),
        "b" | "blue" => Some([0, 0, 255, 255]),
        "c" | "cyan" => Some([0, 191, 191, 255]),
        "m" | "magenta" => Some([191, 0, 191, 255]),
        "y" | "yellow" => Some([191, 191, 0, 255]),
        _ => None,
    };
    if let Some(color) = named {
        return Ok(color);
    }

    if let Some(hex) = color.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            if let (Ok(r), Ok(g), Ok(b)) = (channel(0), channel(2), channel(4)) {
                return Ok([r, g, b, 255]);
            }
        }
    } else if let Ok(level) = color.parse::<f64>() {
        if (0.0..=1.0).contains(&level) {
            let v = (level * 255.0).round() as u8;
            return Ok([v, v, v, 255]);
        }
    }

    Err(PlotError::invalid(
        "color",
        format!("Unrecognized color: {}", color),
    ))
}

/// Font weight of a text annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    #[default]
    Bold,
}

/// A text annotation placed in axes-fraction coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    /// (x, y) as fractions of the axes box, origin bottom-left
    pub pos: (f64, f64),
    pub fontsize: f32,
    pub fontweight: FontWeight,
}

/// Stroke style of a reference line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Rgba,
    /// On/off dash lengths in pixels; `None` draws a solid line
    pub dashes: Option<(u32, u32)>,
}

impl LineStyle {
    pub fn solid(color: Rgba) -> Self {
        Self {
            color,
            dashes: None,
        }
    }

    pub fn dashed(color: Rgba, on: u32, off: u32) -> Self {
        Self {
            color,
            dashes: Some((on, off)),
        }
    }
}

/// A vertical or horizontal reference line at a data coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefLine {
    pub position: f64,
    pub style: LineStyle,
}

/// Tick label policy for an axis
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickLabels {
    /// Derived from tick positions
    #[default]
    Auto,
    Custom(Vec<String>),
    Hidden,
}

/// One filled contour layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContourFill {
    /// Column coordinates
    pub x: Vec<f64>,
    /// Row coordinates
    pub y: Vec<f64>,
    /// Values with shape `(y.len(), x.len())`
    pub values: Array2<f32>,
    pub levels: Vec<f64>,
    /// Colormap name, resolved with [`crate::colormaps::get_colormap`]
    pub cmap: String,
    pub extend: Extend,
}

impl ContourFill {
    /// Coordinate extent `(min, max)` of a vector
    fn extent(coords: &[f64]) -> Option<(f64, f64)> {
        let lo = coords.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = coords.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (lo <= hi).then_some((lo, hi))
    }

    pub fn x_extent(&self) -> Option<(f64, f64)> {
        Self::extent(&self.x)
    }

    pub fn y_extent(&self) -> Option<(f64, f64)> {
        Self::extent(&self.y)
    }
}

/// Colorbar attached to the axes' last filled contour
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Colorbar {
    /// Tick positions; `None` places a tick at every level
    pub ticks: Option<Vec<f64>>,
}

/// Everything a plot call configures on one subplot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Axes {
    pub layers: Vec<ContourFill>,
    pub colorbar: Option<Colorbar>,
    pub clim: Option<(f64, f64)>,
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    pub xticks: Option<Vec<f64>>,
    pub yticks: Option<Vec<f64>>,
    pub xticklabels: TickLabels,
    pub grid: bool,
    pub vlines: Vec<RefLine>,
    pub hlines: Vec<RefLine>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub texts: Vec<Annotation>,
}

impl Axes {
    /// Add a filled contour layer.
    pub fn contourf(
        &mut self,
        x: Vec<f64>,
        y: Vec<f64>,
        values: Array2<f32>,
        levels: Vec<f64>,
        cmap: &str,
        extend: Extend,
    ) -> Result<()> {
        if values.dim() != (y.len(), x.len()) {
            return Err(PlotError::invalid(
                "values",
                format!(
                    "shape {:?} does not match y ({}) by x ({})",
                    values.shape(),
                    y.len(),
                    x.len()
                ),
            ));
        }
        validate_levels(&levels)?;

        self.layers.push(ContourFill {
            x,
            y,
            values,
            levels,
            cmap: cmap.to_string(),
            extend,
        });
        Ok(())
    }

    /// Attach a colorbar for the most recent filled contour.
    pub fn colorbar(&mut self, ticks: Option<Vec<f64>>) -> Result<()> {
        if self.layers.is_empty() {
            return Err(PlotError::invalid(
                "colorbar",
                "no filled contour to attach a colorbar to",
            ));
        }
        self.colorbar = Some(Colorbar { ticks });
        Ok(())
    }

    /// Set the color limits; `None` keeps the level range.
    pub fn set_clim(&mut self, clim: Option<(f64, f64)>) {
        self.clim = clim;
    }

    pub fn set_xlim(&mut self, lo: f64, hi: f64) {
        self.xlim = Some((lo, hi));
    }

    pub fn set_ylim(&mut self, lo: f64, hi: f64) {
        self.ylim = Some((lo, hi));
    }

    pub fn set_xticks(&mut self, ticks: Vec<f64>) {
        self.xticks = Some(ticks);
    }

    pub fn set_yticks(&mut self, ticks: Vec<f64>) {
        self.yticks = Some(ticks);
    }

    pub fn set_xticklabels(&mut self, labels: TickLabels) {
        self.xticklabels = labels;
    }

    pub fn set_grid(&mut self, on: bool) {
        self.grid = on;
    }

    pub fn axvline(&mut self, x: f64, style: LineStyle) {
        self.vlines.push(RefLine {
            position: x,
            style,
        });
    }

    pub fn axhline(&mut self, y: f64, style: LineStyle) {
        self.hlines.push(RefLine {
            position: y,
            style,
        });
    }

    pub fn set_xlabel(&mut self, label: impl Into<String>) {
        self.xlabel = Some(label.into());
    }

    pub fn set_ylabel(&mut self, label: impl Into<String>) {
        self.ylabel = Some(label.into());
    }

    pub fn text(&mut self, annotation: Annotation) {
        self.texts.push(annotation);
    }

    /// The layer the colorbar describes
    pub fn mappable(&self) -> Option<&ContourFill> {
        self.layers.last()
    }

    /// Effective x limits: explicit limits, else the extent of all layers
    pub fn view_xlim(&self) -> Option<(f64, f64)> {
        self.xlim.or_else(|| union(self.layers.iter().filter_map(|l| l.x_extent())))
    }

    /// Effective y limits: explicit limits, else the extent of all layers
    pub fn view_ylim(&self) -> Option<(f64, f64)> {
        self.ylim.or_else(|| union(self.layers.iter().filter_map(|l| l.y_extent())))
    }

    /// Color normalization range for the mappable layer
    pub fn color_limits(&self) -> Option<(f64, f64)> {
        if self.clim.is_some() {
            return self.clim;
        }
        let levels = &self.mappable()?.levels;
        Some((*levels.first()?, *levels.last()?))
    }

    /// Tick label strings actually shown on the x axis
    pub fn xtick_label_text(&self) -> Vec<String> {
        match &self.xticklabels {
            TickLabels::Hidden => Vec::new(),
            TickLabels::Custom(labels) => labels.clone(),
            TickLabels::Auto => self
                .xticks
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|t| format_tick(*t))
                .collect(),
        }
    }
}

fn union(extents: impl Iterator<Item = (f64, f64)>) -> Option<(f64, f64)> {
    extents.fold(None, |acc, (lo, hi)| match acc {
        Some((alo, ahi)) => Some((f64::min(alo, lo), f64::max(ahi, hi))),
        None => Some((lo, hi)),
    })
}

/// Integral ticks print without a decimal point
pub fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// A grid of subplots with a current position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigGroup {
    nrow: usize,
    ncol: usize,
    row: usize,
    col: usize,
    /// Whether `next` has selected a subplot yet
    started: bool,
    axes: Vec<Axes>,
    pub width: u32,
    pub height: u32,
    /// Title over the whole group, exported with the scene
    pub suptitle: Option<String>,
}

impl FigGroup {
    /// Create an `nrow` x `ncol` group with the default panel size.
    pub fn new(nrow: usize, ncol: usize) -> Result<Self> {
        if nrow == 0 || ncol == 0 {
            return Err(PlotError::invalid(
                "layout",
                format!("a figure group needs at least one row and column, got {}x{}", nrow, ncol),
            ));
        }
        Ok(Self {
            nrow,
            ncol,
            row: 0,
            col: 0,
            started: false,
            axes: vec![Axes::default(); nrow * ncol],
            width: DEFAULT_PANEL_WIDTH * ncol as u32,
            height: DEFAULT_PANEL_HEIGHT * nrow as u32,
            suptitle: None,
        })
    }

    /// Override the pixel size of the whole figure
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_suptitle(mut self, title: Option<String>) -> Self {
        self.suptitle = title;
        self
    }

    pub fn nrow(&self) -> usize {
        self.nrow
    }

    pub fn ncol(&self) -> usize {
        self.ncol
    }

    /// Row of the current subplot
    pub fn row(&self) -> usize {
        self.row
    }

    /// Column of the current subplot
    pub fn col(&self) -> usize {
        self.col
    }

    /// Make `(row, col)` the current subplot and return it.
    pub fn subplot(&mut self, row: usize, col: usize) -> Result<&mut Axes> {
        if row >= self.nrow || col >= self.ncol {
            return Err(PlotError::invalid(
                "subplot",
                format!(
                    "({}, {}) is outside a {}x{} figure group",
                    row, col, self.nrow, self.ncol
                ),
            ));
        }
        self.row = row;
        self.col = col;
        self.started = true;
        Ok(&mut self.axes[row * self.ncol + col])
    }

    /// Advance to the next subplot in row-major order. The first call
    /// selects `(0, 0)`.
    pub fn next(&mut self) -> Result<&mut Axes> {
        if !self.started {
            return self.subplot(0, 0);
        }
        let (mut row, mut col) = (self.row, self.col + 1);
        if col == self.ncol {
            col = 0;
            row += 1;
        }
        self.subplot(row, col)
    }

    pub fn current(&self) -> &Axes {
        &self.axes[self.row * self.ncol + self.col]
    }

    pub fn current_mut(&mut self) -> &mut Axes {
        let idx = self.row * self.ncol + self.col;
        &mut self.axes[idx]
    }

    /// Subplot at `(row, col)` without changing the current position
    pub fn axes(&self, row: usize, col: usize) -> Option<&Axes> {
        if row >= self.nrow || col >= self.ncol {
            return None;
        }
        self.axes.get(row * self.ncol + col)
    }

    /// All subplots in row-major order with their positions
    pub fn iter_axes(&self) -> impl Iterator<Item = ((usize, usize), &Axes)> {
        let ncol = self.ncol;
        self.axes
            .iter()
            .enumerate()
            .map(move |(i, ax)| ((i / ncol, i % ncol), ax))
    }
}
