//! Figure helpers for onset-relative composites.
//!
//! Each function draws into the current subplot of a [`FigGroup`]:
//!
//! - [`add_labels`] annotates successive subplots (`a`, `b`, `c`, ...)
//! - [`contourf_latday`] draws a latitude vs. relative-day filled contour
//! - [`contourf_londay`] draws a longitude vs. relative-day filled contour

use tracing::debug;

use crate::contour::{cinterval, clevels, count_levels, precip_levels, ContourLevels, Extend};
use crate::error::{PlotError, Result};
use crate::field::Field;
use crate::figure::{
    format_tick, parse_color, Annotation, FigGroup, FontWeight, LineStyle, TickLabels, BLACK,
};

/// Colormap and extension for precipitation-like fields
const PRECIP_CMAP: &str = "PuBuGn";
/// Colormap and extension for signed fields
const ANOMALY_CMAP: &str = "RdBu_r";

/// Positions for [`add_labels`], in axes-fraction coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum LabelPositions {
    /// One position shared by every label
    Single((f64, f64)),
    /// One position per label
    PerLabel(Vec<(f64, f64)>),
}

impl LabelPositions {
    fn get(&self, i: usize) -> Result<(f64, f64)> {
        match self {
            LabelPositions::Single(pos) => Ok(*pos),
            LabelPositions::PerLabel(positions) => positions.get(i).copied().ok_or_else(|| {
                PlotError::invalid(
                    "pos",
                    format!("no position for label {} ({} given)", i, positions.len()),
                )
            }),
        }
    }
}

impl From<(f64, f64)> for LabelPositions {
    fn from(pos: (f64, f64)) -> Self {
        LabelPositions::Single(pos)
    }
}

impl From<Vec<(f64, f64)>> for LabelPositions {
    fn from(positions: Vec<(f64, f64)>) -> Self {
        LabelPositions::PerLabel(positions)
    }
}

/// Annotate subplots with labels, one per subplot in row-major order.
///
/// Starts at `(0, 0)` and wraps to the next row after `grp.ncol()` columns.
/// The current subplot is left at the last labelled panel.
pub fn add_labels<S: AsRef<str>>(
    grp: &mut FigGroup,
    labels: &[S],
    pos: &LabelPositions,
    fontsize: f32,
    fontweight: FontWeight,
) -> Result<()> {
    let (mut row, mut col) = (0, 0);
    for (i, label) in labels.iter().enumerate() {
        let position = pos.get(i)?;
        grp.subplot(row, col)?.text(Annotation {
            text: label.as_ref().to_string(),
            pos: position,
            fontsize,
            fontweight,
        });

        col += 1;
        if col == grp.ncol() {
            col = 0;
            row += 1;
        }
    }

    debug!(count = labels.len(), "Added subplot labels");
    Ok(())
}

/// Options for [`contourf_latday`]
#[derive(Debug, Clone)]
pub struct LatDayOptions {
    /// Precipitation-like field: sequential colormap, levels from zero
    pub is_precip: bool,
    pub clev: ContourLevels,
    /// Colorbar ticks
    pub cticks: Option<Vec<f64>>,
    /// Color limits
    pub climits: Option<(f64, f64)>,
    /// Preferred number of contour intervals when choosing automatically
    pub nc_pref: usize,
    pub xlims: (f64, f64),
    pub xticks: Vec<f64>,
    /// Latitude window; also used to subset the field
    pub ylims: (f64, f64),
    pub yticks: Vec<f64>,
    /// Days to mark with vertical lines
    pub dlist: Option<Vec<f64>>,
    pub grid: bool,
    /// Name of the reference event for the x label
    pub ind_nm: String,
    pub xlabels: bool,
}

impl Default for LatDayOptions {
    fn default() -> Self {
        Self {
            is_precip: false,
            clev: ContourLevels::Auto,
            cticks: None,
            climits: None,
            nc_pref: 40,
            xlims: (-120.0, 200.0),
            xticks: arange(-120.0, 201.0, 30.0),
            ylims: (-60.0, 60.0),
            yticks: arange(-60.0, 61.0, 20.0),
            dlist: None,
            grid: false,
            ind_nm: "onset".to_string(),
            xlabels: true,
        }
    }
}

/// Filled contour of a field on a latitude x relative-day grid.
///
/// The field is subset to `ylims` in latitude and drawn with days along x and
/// latitude along y. Fields with negative values get levels symmetric about
/// zero. The y label is only set in the first column.
pub fn contourf_latday(grp: &mut FigGroup, var: &Field, opts: &LatDayOptions) -> Result<()> {
    let var = var.subset("lat", opts.ylims)?;
    let vals = var.grid("lat", "dayrel")?;
    let lat = var.coord("lat")?.to_vec();
    let days = var.coord("dayrel")?.to_vec();

    let symmetric = var.min().map_or(false, |m| m < 0.0);
    let (cmap, extend) = if opts.is_precip {
        (PRECIP_CMAP, Extend::Max)
    } else {
        (ANOMALY_CMAP, Extend::Both)
    };

    let flat: Vec<f32> = vals.iter().copied().collect();
    let levels = match &opts.clev {
        ContourLevels::Auto => {
            let cint = cinterval(&flat, opts.nc_pref, symmetric)?;
            clevels(&flat, cint, symmetric)?
        }
        ContourLevels::Interval(cint) if opts.is_precip => precip_levels(*cint)?,
        ContourLevels::Interval(cint) => clevels(&flat, *cint, symmetric)?,
        ContourLevels::Count(n) => count_levels(&flat, *n, symmetric)?,
        ContourLevels::Explicit(levels) => levels.clone(),
    };

    debug!(
        var = %var.name,
        symmetric = symmetric,
        nlevels = levels.len(),
        cmap = cmap,
        extend = ?extend,
        "Drawing latitude-day contours"
    );

    let col = grp.col();
    let ax = grp.current_mut();
    ax.contourf(days, lat, vals, levels, cmap, extend)?;
    ax.colorbar(opts.cticks.clone())?;
    ax.set_clim(opts.climits);
    ax.set_xlim(opts.xlims.0, opts.xlims.1);
    ax.set_xticks(opts.xticks.clone());
    ax.set_ylim(opts.ylims.0, opts.ylims.1);
    ax.set_yticks(opts.yticks.clone());
    ax.set_grid(opts.grid);

    if let Some(dlist) = &opts.dlist {
        for &d0 in dlist {
            ax.axvline(d0, LineStyle::solid(BLACK));
        }
    }

    if opts.xlabels {
        let labels = opts.xticks.iter().map(|t| format_tick(*t)).collect();
        ax.set_xticklabels(TickLabels::Custom(labels));
        ax.set_xlabel(format!("Days Since {}", capitalize(&opts.ind_nm)));
    } else {
        ax.set_xticklabels(TickLabels::Hidden);
    }

    if col == 0 {
        ax.set_ylabel("Latitude");
    }

    Ok(())
}

/// Options for [`contourf_londay`]
#[derive(Debug, Clone)]
pub struct LonDayOptions {
    pub clev: ContourLevels,
    /// Preferred number of contour intervals when choosing automatically
    pub n_pref: usize,
    pub yticks: Vec<f64>,
}

impl Default for LonDayOptions {
    fn default() -> Self {
        Self {
            clev: ContourLevels::Auto,
            n_pref: 40,
            yticks: arange(-120.0, 201.0, 30.0),
        }
    }
}

/// Filled contour of a field on a longitude x relative-day grid.
///
/// Levels are always symmetric about zero. A dashed gray line marks day 0.
/// The x label is only set in the bottom row and the y label only in the
/// first column.
pub fn contourf_londay(grp: &mut FigGroup, var: &Field, opts: &LonDayOptions) -> Result<()> {
    let lon = var.coord("lon")?.to_vec();
    let days = var.coord("dayrel")?.to_vec();
    let vals = var.grid("dayrel", "lon")?;

    let flat: Vec<f32> = vals.iter().copied().collect();
    let levels = match &opts.clev {
        ContourLevels::Auto => {
            let cint = cinterval(&flat, opts.n_pref, true)?;
            clevels(&flat, cint, true)?
        }
        ContourLevels::Interval(cint) => clevels(&flat, *cint, true)?,
        ContourLevels::Count(n) => count_levels(&flat, *n, true)?,
        ContourLevels::Explicit(levels) => levels.clone(),
    };

    debug!(
        var = %var.name,
        nlevels = levels.len(),
        "Drawing longitude-day contours"
    );

    let (row, col, last_row) = (grp.row(), grp.col(), grp.nrow() - 1);
    let ax = grp.current_mut();
    ax.contourf(lon, days, vals, levels, ANOMALY_CMAP, Extend::Both)?;
    ax.colorbar(None)?;
    ax.set_yticks(opts.yticks.clone());
    ax.axhline(0.0, LineStyle::dashed(parse_color("0.5")?, 6, 1));

    if row == last_row {
        ax.set_xlabel("Longitude");
    }
    if col == 0 {
        ax.set_ylabel("Days Since Onset");
    }

    Ok(())
}

/// Evenly spaced values in `[start, stop)`
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || !step.is_finite() {
        return Vec::new();
    }
    (0..)
        .map(|k| start + k as f64 * step)
        .take_while(|&v| v < stop)
        .collect()
}

/// Upper-case the first character and lower-case the rest
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
