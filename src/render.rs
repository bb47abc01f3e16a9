//! Rasterization of figure groups.
//!
//! Each subplot gets a plot rectangle and a colorbar strip. Filled contours
//! are painted pixel by pixel: the pixel centre is mapped to data
//! coordinates, sampled with an [`Interpolator`], classified into a contour
//! band and colored. Text is carried in the scene JSON, not rasterized.

use chrono::{DateTime, Utc};
use image::{ImageBuffer, ImageFormat, Rgba as Pixel, RgbaImage};
use serde::Serialize;
use std::io::Cursor;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::colormaps::{get_colormap, Colormap};
use crate::contour::{classify, Band};
use crate::error::{PlotError, Result};
use crate::figure::{Axes, ContourFill, FigGroup, LineStyle, RefLine, Rgba, BLACK};
use crate::interpolation::{get_interpolator, Grid, Interpolator};
use crate::logging::log_timed_operation;

const WHITE: Rgba = [255, 255, 255, 255];
const GRID_COLOR: Rgba = [176, 176, 176, 255];
const TICK_LENGTH: u32 = 4;

/// Fractions of the panel used by the plot box and colorbar
const PLOT_LEFT: f64 = 0.14;
const PLOT_RIGHT: f64 = 0.78;
const PLOT_TOP: f64 = 0.08;
const PLOT_BOTTOM: f64 = 0.86;
const CBAR_LEFT: f64 = 0.83;
const CBAR_RIGHT: f64 = 0.87;

/// Rendering options
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Interpolation used to sample fields at pixel centres
    pub interpolation: String,
    pub background: Rgba,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            interpolation: "bilinear".to_string(),
            background: WHITE,
        }
    }
}

/// Pixel rectangle, `x1`/`y1` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Rect {
    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    pub fn center(&self) -> (u32, u32) {
        (self.x0 + self.width() / 2, self.y0 + self.height() / 2)
    }
}

/// Where a subplot's plot box and colorbar land in the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    pub plot: Rect,
    pub colorbar: Rect,
}

/// Layout of subplot `(row, col)` in a `width` x `height` figure
pub fn panel_layout(grp: &FigGroup, row: usize, col: usize) -> PanelLayout {
    let pw = grp.width as f64 / grp.ncol() as f64;
    let ph = grp.height as f64 / grp.nrow() as f64;
    let px = col as f64 * pw;
    let py = row as f64 * ph;

    let x = |frac: f64| (px + frac * pw).round() as u32;
    let y = |frac: f64| (py + frac * ph).round() as u32;

    PanelLayout {
        plot: Rect {
            x0: x(PLOT_LEFT),
            y0: y(PLOT_TOP),
            x1: x(PLOT_RIGHT),
            y1: y(PLOT_BOTTOM),
        },
        colorbar: Rect {
            x0: x(CBAR_LEFT),
            y0: y(PLOT_TOP),
            x1: x(CBAR_RIGHT),
            y1: y(PLOT_BOTTOM),
        },
    }
}

/// Colors of one contour layer, resolved once per layer
struct BandColors {
    under: Rgba,
    levels: Vec<Rgba>,
    over: Rgba,
}

impl BandColors {
    fn new(layer: &ContourFill, cmap: &dyn Colormap, clim: (f64, f64)) -> Self {
        let (lo, hi) = (clim.0 as f32, clim.1 as f32);
        let levels = layer
            .levels
            .windows(2)
            .map(|w| cmap.map(((w[0] + w[1]) / 2.0) as f32, lo, hi))
            .collect();
        Self {
            under: cmap.map_normalized(0.0),
            levels,
            over: cmap.map_normalized(1.0),
        }
    }

    fn color(&self, band: Band) -> Option<Rgba> {
        match band {
            Band::Under => Some(self.under),
            Band::Level(i) => self.levels.get(i).copied(),
            Band::Over => Some(self.over),
            Band::Masked => None,
        }
    }
}

/// Linear map from a data interval onto a pixel span
#[derive(Debug, Clone, Copy)]
struct AxisMap {
    lo: f64,
    hi: f64,
    p0: u32,
    p1: u32,
    /// Pixel coordinates grow opposite to data coordinates (y axis)
    flipped: bool,
}

impl AxisMap {
    fn valid(&self) -> bool {
        self.hi != self.lo && self.p1 > self.p0
    }

    /// Data coordinate at the centre of pixel `p`
    fn data_at(&self, p: u32) -> f64 {
        let t = (p - self.p0) as f64 + 0.5;
        let frac = t / (self.p1 - self.p0) as f64;
        let frac = if self.flipped { 1.0 - frac } else { frac };
        self.lo + frac * (self.hi - self.lo)
    }

    /// Pixel holding data coordinate `v`, if inside the span
    fn pixel_at(&self, v: f64) -> Option<u32> {
        let frac = (v - self.lo) / (self.hi - self.lo);
        if !(0.0..=1.0).contains(&frac) {
            return None;
        }
        let frac = if self.flipped { 1.0 - frac } else { frac };
        let span = (self.p1 - self.p0) as f64;
        let p = self.p0 as f64 + (frac * span).floor();
        Some((p as u32).min(self.p1 - 1))
    }
}

/// Rasterize a figure group.
pub fn render_figure(grp: &FigGroup, opts: &RenderOptions) -> Result<RgbaImage> {
    if grp.width == 0 || grp.height == 0 {
        return Err(PlotError::ImageGeneration {
            message: format!("figure size {}x{} is empty", grp.width, grp.height),
        });
    }

    let interpolator = get_interpolator(&opts.interpolation)?;

    log_timed_operation("render_figure", || -> Result<RgbaImage> {
        let mut img: RgbaImage =
            ImageBuffer::from_pixel(grp.width, grp.height, Pixel(opts.background));

        for ((row, col), ax) in grp.iter_axes() {
            let layout = panel_layout(grp, row, col);
            render_axes(&mut img, ax, &layout, interpolator.as_ref())?;
        }

        debug!(
            width = grp.width,
            height = grp.height,
            panels = grp.nrow() * grp.ncol(),
            interpolation = interpolator.name(),
            "Figure rasterized"
        );
        Ok(img)
    })
}

fn render_axes(
    img: &mut RgbaImage,
    ax: &Axes,
    layout: &PanelLayout,
    interpolator: &dyn Interpolator,
) -> Result<()> {
    let plot = layout.plot;
    let (xlim, ylim) = match (ax.view_xlim(), ax.view_ylim()) {
        (Some(xlim), Some(ylim)) => (xlim, ylim),
        _ => {
            draw_frame(img, plot);
            return Ok(());
        }
    };

    let xmap = AxisMap {
        lo: xlim.0,
        hi: xlim.1,
        p0: plot.x0,
        p1: plot.x1,
        flipped: false,
    };
    let ymap = AxisMap {
        lo: ylim.0,
        hi: ylim.1,
        p0: plot.y0,
        p1: plot.y1,
        flipped: true,
    };

    if xmap.valid() && ymap.valid() {
        for layer in &ax.layers {
            fill_layer(img, ax, layer, &xmap, &ymap, interpolator)?;
        }

        if ax.grid {
            let solid = LineStyle::solid(GRID_COLOR);
            for &x in ax.xticks.as_deref().unwrap_or_default() {
                if let Some(px) = xmap.pixel_at(x) {
                    draw_vline(img, px, plot.y0, plot.y1, &solid);
                }
            }
            for &y in ax.yticks.as_deref().unwrap_or_default() {
                if let Some(py) = ymap.pixel_at(y) {
                    draw_hline(img, py, plot.x0, plot.x1, &solid);
                }
            }
        }

        for RefLine { position, style } in &ax.vlines {
            if let Some(px) = xmap.pixel_at(*position) {
                draw_vline(img, px, plot.y0, plot.y1, style);
            }
        }
        for RefLine { position, style } in &ax.hlines {
            if let Some(py) = ymap.pixel_at(*position) {
                draw_hline(img, py, plot.x0, plot.x1, style);
            }
        }

        draw_ticks(img, ax, &xmap, &ymap, plot);
    }

    draw_frame(img, plot);

    if ax.colorbar.is_some() {
        draw_colorbar(img, ax, layout.colorbar)?;
    }

    Ok(())
}

fn fill_layer(
    img: &mut RgbaImage,
    ax: &Axes,
    layer: &ContourFill,
    xmap: &AxisMap,
    ymap: &AxisMap,
    interpolator: &dyn Interpolator,
) -> Result<()> {
    let cmap = get_colormap(&layer.cmap)?;
    let clim = ax.color_limits().unwrap_or((0.0, 1.0));
    let colors = BandColors::new(layer, cmap.as_ref(), clim);
    let grid = Grid::new(layer.values.view(), &layer.y, &layer.x);

    for py in ymap.p0..ymap.p1 {
        let y = ymap.data_at(py);
        for px in xmap.p0..xmap.p1 {
            let x = xmap.data_at(px);
            let color = interpolator
                .sample(&grid, y, x)
                .and_then(|v| colors.color(classify(v, &layer.levels, layer.extend)));
            if let Some(color) = color {
                put(img, px, py, color);
            }
        }
    }
    Ok(())
}

fn draw_ticks(img: &mut RgbaImage, ax: &Axes, xmap: &AxisMap, ymap: &AxisMap, plot: Rect) {
    for &x in ax.xticks.as_deref().unwrap_or_default() {
        if let Some(px) = xmap.pixel_at(x) {
            for dy in 0..TICK_LENGTH {
                put(img, px, plot.y1 + dy, BLACK);
            }
        }
    }
    for &y in ax.yticks.as_deref().unwrap_or_default() {
        if let Some(py) = ymap.pixel_at(y) {
            for dx in 1..=TICK_LENGTH {
                if let Some(px) = plot.x0.checked_sub(dx) {
                    put(img, px, py, BLACK);
                }
            }
        }
    }
}

/// Stacked color bands, with an extra cell at each extended end
fn draw_colorbar(img: &mut RgbaImage, ax: &Axes, rect: Rect) -> Result<()> {
    let layer = match ax.mappable() {
        Some(layer) => layer,
        None => return Ok(()),
    };
    let cmap = get_colormap(&layer.cmap)?;
    let clim = ax.color_limits().unwrap_or((0.0, 1.0));
    let colors = BandColors::new(layer, cmap.as_ref(), clim);

    let mut cells: Vec<Rgba> = Vec::with_capacity(colors.levels.len() + 2);
    if layer.extend.covers_min() {
        cells.push(colors.under);
    }
    cells.extend(colors.levels.iter().copied());
    if layer.extend.covers_max() {
        cells.push(colors.over);
    }
    if cells.is_empty() || rect.height() == 0 {
        return Ok(());
    }

    let cell_height = rect.height() as f64 / cells.len() as f64;
    for py in rect.y0..rect.y1 {
        // Bottom of the strip is the lowest band
        let from_bottom = (rect.y1 - 1 - py) as f64;
        let idx = ((from_bottom / cell_height) as usize).min(cells.len() - 1);
        for px in rect.x0..rect.x1 {
            put(img, px, py, cells[idx]);
        }
    }

    // Tick marks on the right edge, over the level span of the strip
    let first_cell = usize::from(layer.extend.covers_min()) as f64;
    let (lo, hi) = match (layer.levels.first(), layer.levels.last()) {
        (Some(&lo), Some(&hi)) if hi > lo => (lo, hi),
        _ => return Ok(()),
    };
    let ticks = ax
        .colorbar
        .as_ref()
        .and_then(|cb| cb.ticks.clone())
        .unwrap_or_else(|| layer.levels.clone());
    let band_span = colors.levels.len() as f64 * cell_height;
    for tick in ticks {
        if !(lo..=hi).contains(&tick) {
            continue;
        }
        let offset = first_cell * cell_height + (tick - lo) / (hi - lo) * band_span;
        let py = (rect.y1 as f64 - offset).round().max(rect.y0 as f64) as u32;
        let py = py.min(rect.y1 - 1);
        for dx in 0..TICK_LENGTH {
            put(img, rect.x1 + dx, py, BLACK);
        }
    }

    draw_frame(img, rect);
    Ok(())
}

fn put(img: &mut RgbaImage, x: u32, y: u32, color: Rgba) {
    if x < img.width() && y < img.height() {
        img.put_pixel(x, y, Pixel(color));
    }
}

/// Whether position `i` along a line is inked for the given dash pattern
fn inked(style: &LineStyle, i: u32) -> bool {
    match style.dashes {
        Some((on, off)) if on + off > 0 => i % (on + off) < on,
        _ => true,
    }
}

fn draw_vline(img: &mut RgbaImage, x: u32, y0: u32, y1: u32, style: &LineStyle) {
    for (i, y) in (y0..y1).enumerate() {
        if inked(style, i as u32) {
            put(img, x, y, style.color);
        }
    }
}

fn draw_hline(img: &mut RgbaImage, y: u32, x0: u32, x1: u32, style: &LineStyle) {
    for (i, x) in (x0..x1).enumerate() {
        if inked(style, i as u32) {
            put(img, x, y, style.color);
        }
    }
}

fn draw_frame(img: &mut RgbaImage, rect: Rect) {
    if rect.width() == 0 || rect.height() == 0 {
        return;
    }
    let solid = LineStyle::solid(BLACK);
    draw_hline(img, rect.y0, rect.x0, rect.x1, &solid);
    draw_hline(img, rect.y1 - 1, rect.x0, rect.x1, &solid);
    draw_vline(img, rect.x0, rect.y0, rect.y1, &solid);
    draw_vline(img, rect.x1 - 1, rect.y0, rect.y1, &solid);
}

/// Encode an image as PNG bytes
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let start = Instant::now();
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| PlotError::ImageGeneration {
            message: format!("Failed to encode PNG: {}", e),
        })?;

    debug!(
        encoding_duration_ms = start.elapsed().as_millis() as u64,
        "Image encoded successfully"
    );
    Ok(buffer.into_inner())
}

/// Render a figure group and write it to `path` as PNG
pub fn save_png(grp: &FigGroup, path: &Path, opts: &RenderOptions) -> Result<()> {
    let img = render_figure(grp, opts)?;
    let bytes = encode_png(&img)?;
    std::fs::write(path, &bytes)?;

    info!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        bytes = bytes.len(),
        "Figure saved"
    );
    Ok(())
}

#[derive(Serialize)]
struct SceneExport<'a> {
    generator: &'static str,
    version: &'static str,
    rendered_at: DateTime<Utc>,
    figure: &'a FigGroup,
}

/// The figure model as pretty-printed JSON, including text the rasterizer
/// does not draw
pub fn scene_json(grp: &FigGroup) -> Result<String> {
    let export = SceneExport {
        generator: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        rendered_at: Utc::now(),
        figure: grp,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}
