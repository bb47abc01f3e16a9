//! Contour interval and level selection.
//!
//! `cinterval` picks a "nice" spacing for a field, `clevels` turns that spacing
//! into level thresholds, and [`classify`] decides which filled band a value
//! falls in.

use serde::{Deserialize, Serialize};

use crate::error::{PlotError, Result};
use crate::field::{finite_max, finite_min};

/// Mantissas for candidate contour intervals (times a power of ten)
const NICE_MANTISSAS: [f64; 4] = [1.0, 2.0, 2.5, 5.0];

/// Upper bound for precipitation levels given as a bare interval
const PRECIP_LEVEL_MAX: f64 = 10.0;

/// Most levels a generated level set may hold
pub const MAX_LEVELS: usize = 10_000;

/// How the caller asked for contour levels
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ContourLevels {
    /// Choose interval and levels from the data
    #[default]
    Auto,
    /// Fixed spacing, levels derived from the data range
    Interval(f64),
    /// About this many bands at a nice spacing over the data range
    Count(usize),
    /// Exact level values, strictly increasing
    Explicit(Vec<f64>),
}

impl From<f64> for ContourLevels {
    fn from(cint: f64) -> Self {
        ContourLevels::Interval(cint)
    }
}

impl From<usize> for ContourLevels {
    fn from(n: usize) -> Self {
        ContourLevels::Count(n)
    }
}

impl From<Vec<f64>> for ContourLevels {
    /// A one-element list is treated as an interval.
    fn from(levels: Vec<f64>) -> Self {
        match levels.as_slice() {
            [cint] => ContourLevels::Interval(*cint),
            _ => ContourLevels::Explicit(levels),
        }
    }
}

/// Which out-of-range regions get their own color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extend {
    /// Values outside the levels are left unfilled
    #[default]
    Neither,
    /// Values below the first level are filled
    Min,
    /// Values above the last level are filled
    Max,
    /// Both ends are filled
    Both,
}

impl Extend {
    pub fn covers_min(self) -> bool {
        matches!(self, Extend::Min | Extend::Both)
    }

    pub fn covers_max(self) -> bool {
        matches!(self, Extend::Max | Extend::Both)
    }
}

/// The filled region a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Below the first level (extended)
    Under,
    /// Between `levels[i]` and `levels[i + 1]`
    Level(usize),
    /// Above the last level (extended)
    Over,
    /// Not filled
    Masked,
}

/// Sign filter applied by [`clevels_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PosNeg {
    #[default]
    Both,
    /// Keep levels >= 0
    Pos,
    /// Keep levels <= 0
    Neg,
}

/// Options for [`clevels_with`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ClevelOptions {
    /// Levels symmetric about zero
    pub symmetric: bool,
    pub posneg: PosNeg,
    /// Drop the zero level
    pub omitzero: bool,
}

/// Finite data range, widened to `[-m, m]` when symmetric.
fn data_range(values: &[f32], symmetric: bool) -> Result<(f64, f64)> {
    let lo = finite_min(values.iter().copied());
    let hi = finite_max(values.iter().copied());
    let (lo, hi) = match (lo, hi) {
        (Some(lo), Some(hi)) => (lo as f64, hi as f64),
        _ => {
            return Err(PlotError::EmptyData {
                message: "no finite values to contour".to_string(),
            })
        }
    };

    if symmetric {
        let m = lo.abs().max(hi.abs());
        Ok((-m, m))
    } else {
        Ok((lo, hi))
    }
}

/// Choose a contour interval so that roughly `n_pref` intervals span the data.
///
/// Candidates are 1, 2, 2.5 and 5 times a power of ten; the one whose interval
/// count is closest to `n_pref` wins, ties going to the finer interval.
pub fn cinterval(values: &[f32], n_pref: usize, symmetric: bool) -> Result<f64> {
    if n_pref == 0 {
        return Err(PlotError::invalid("n_pref", "must be at least 1"));
    }

    let (lo, hi) = data_range(values, symmetric)?;
    let range = hi - lo;

    if range <= 0.0 {
        let magnitude = hi.abs();
        if magnitude == 0.0 {
            return Ok(1.0);
        }
        return Ok(10f64.powi(magnitude.log10().floor() as i32));
    }

    let target = n_pref as f64;
    let exponent = (range / target).log10().floor() as i32;

    let mut best = f64::NAN;
    let mut best_diff = f64::INFINITY;
    for e in (exponent - 1)..=(exponent + 1) {
        let scale = 10f64.powi(e);
        for mantissa in NICE_MANTISSAS {
            let cint = mantissa * scale;
            let diff = (range / cint - target).abs();
            if diff < best_diff {
                best = cint;
                best_diff = diff;
            }
        }
    }

    Ok(best)
}

/// Default contour interval and levels for a field.
///
/// Fields with negative values get levels symmetric about zero, as in
/// latitude-day plots.
pub fn auto_levels(values: &[f32], n_pref: usize) -> Result<(f64, Vec<f64>)> {
    let symmetric = finite_min(values.iter().copied()).map_or(false, |m| m < 0.0);
    let cint = cinterval(values, n_pref, symmetric)?;
    Ok((cint, clevels(values, cint, symmetric)?))
}

/// Contour levels covering the data at spacing `cint`.
pub fn clevels(values: &[f32], cint: f64, symmetric: bool) -> Result<Vec<f64>> {
    clevels_with(
        values,
        cint,
        ClevelOptions {
            symmetric,
            ..Default::default()
        },
    )
}

/// Contour levels with sign filtering and zero omission.
///
/// Levels run from `cint * floor(min / cint)` to `cint * ceil(max / cint)`.
/// A degenerate range still yields two levels so there is one band to fill.
pub fn clevels_with(values: &[f32], cint: f64, opts: ClevelOptions) -> Result<Vec<f64>> {
    if !cint.is_finite() || cint <= 0.0 {
        return Err(PlotError::invalid(
            "cint",
            format!("contour interval must be positive, got {}", cint),
        ));
    }

    let (lo, hi) = data_range(values, opts.symmetric)?;
    let (start, end) = ((lo / cint).floor(), (hi / cint).ceil());
    check_level_count(end - start + 1.0, cint)?;

    let start = start as i64;
    let mut end = end as i64;
    if end <= start {
        end = start + 1;
    }

    let levels = (start..=end)
        .map(|k| k as f64 * cint)
        .filter(|&level| match opts.posneg {
            PosNeg::Both => true,
            PosNeg::Pos => level >= 0.0,
            PosNeg::Neg => level <= 0.0,
        })
        .filter(|&level| !(opts.omitzero && level == 0.0))
        .collect();

    Ok(levels)
}

/// Precipitation levels `0, cint, 2 cint, ...` up to 10.
pub fn precip_levels(cint: f64) -> Result<Vec<f64>> {
    if !cint.is_finite() || cint <= 0.0 {
        return Err(PlotError::invalid(
            "clev",
            format!("precipitation interval must be positive, got {}", cint),
        ));
    }

    check_level_count(PRECIP_LEVEL_MAX / cint + 1.0, cint)?;

    let limit = PRECIP_LEVEL_MAX + cint / 2.0;
    Ok((0..)
        .map(|k| k as f64 * cint)
        .take_while(|&level| level < limit)
        .collect())
}

/// About `n` bands at the spacing [`cinterval`] picks for `n`.
pub fn count_levels(values: &[f32], n: usize, symmetric: bool) -> Result<Vec<f64>> {
    if n == 0 {
        return Err(PlotError::invalid("clev", "level count must be at least 1"));
    }
    let cint = cinterval(values, n, symmetric)?;
    clevels(values, cint, symmetric)
}

fn check_level_count(count: f64, cint: f64) -> Result<()> {
    if !count.is_finite() || count > MAX_LEVELS as f64 {
        return Err(PlotError::invalid(
            "cint",
            format!(
                "interval {} would produce more than {} levels",
                cint, MAX_LEVELS
            ),
        ));
    }
    Ok(())
}

/// Check that explicit levels can define filled bands.
pub fn validate_levels(levels: &[f64]) -> Result<()> {
    if levels.len() < 2 {
        return Err(PlotError::invalid(
            "clev",
            format!("at least two levels are required, got {}", levels.len()),
        ));
    }
    if levels.iter().any(|l| !l.is_finite()) {
        return Err(PlotError::invalid("clev", "levels must be finite"));
    }
    if levels.windows(2).any(|w| w[1] <= w[0]) {
        return Err(PlotError::invalid(
            "clev",
            "levels must be strictly increasing",
        ));
    }
    Ok(())
}

/// Band that `value` falls in.
///
/// Band `i` holds `levels[i] < v <= levels[i + 1]`; the first band also holds
/// `v == levels[0]`.
pub fn classify(value: f32, levels: &[f64], extend: Extend) -> Band {
    let (first, last) = match (levels.first(), levels.last()) {
        (Some(&first), Some(&last)) if levels.len() >= 2 => (first, last),
        _ => return Band::Masked,
    };
    if !value.is_finite() {
        return Band::Masked;
    }

    let v = value as f64;
    if v < first {
        return if extend.covers_min() {
            Band::Under
        } else {
            Band::Masked
        };
    }
    if v > last {
        return if extend.covers_max() {
            Band::Over
        } else {
            Band::Masked
        };
    }

    let below = levels.partition_point(|&l| l < v);
    Band::Level(below.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cinterval_picks_nice_spacing() {
        let values = [-10.0, 0.0, 10.0];
        assert_eq!(cinterval(&values, 20, true).unwrap(), 1.0);

        let values = [0.0, 3.1, 7.3];
        assert!((cinterval(&values, 40, false).unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_cinterval_symmetric_widens_range() {
        // Asymmetric data [-1, 9]: symmetric range is [-9, 9]
        let values = [-1.0, 9.0];
        let plain = cinterval(&values, 10, false).unwrap();
        let symmetric = cinterval(&values, 10, true).unwrap();
        assert_eq!(plain, 1.0);
        assert_eq!(symmetric, 2.0);
    }

    #[test]
    fn test_cinterval_constant_and_empty() {
        assert_eq!(cinterval(&[0.0, 0.0], 10, false).unwrap(), 1.0);
        assert_eq!(cinterval(&[42.0], 10, false).unwrap(), 10.0);
        assert!(cinterval(&[f32::NAN], 10, false).is_err());
        assert!(cinterval(&[1.0, 2.0], 0, false).is_err());
    }

    #[test]
    fn test_auto_levels() {
        let (cint, levels) = auto_levels(&[-3.0, 9.5], 9).unwrap();
        assert_eq!(cint, 2.0);
        assert_eq!(levels.first(), Some(&-10.0));
        assert_eq!(levels.last(), Some(&10.0));

        let (cint, levels) = auto_levels(&[0.0, 3.1, 7.3], 40).unwrap();
        assert!((cint - 0.2).abs() < 1e-12);
        assert_eq!(levels[0], 0.0);
        assert!(auto_levels(&[f32::NAN], 40).is_err());
    }

    #[test]
    fn test_clevels_cover_data() {
        let values = [-3.2, 7.9];
        let levels = clevels(&values, 2.0, false).unwrap();
        assert_eq!(levels, vec![-4.0, -2.0, 0.0, 2.0, 4.0, 6.0, 8.0]);

        let levels = clevels(&values, 2.0, true).unwrap();
        assert_eq!(levels.first(), Some(&-8.0));
        assert_eq!(levels.last(), Some(&8.0));
        assert_eq!(levels.len(), 9);
    }

    #[test]
    fn test_clevels_options() {
        let values = [-3.0, 3.0];
        let opts = ClevelOptions {
            symmetric: true,
            posneg: PosNeg::Pos,
            omitzero: true,
        };
        assert_eq!(clevels_with(&values, 1.0, opts).unwrap(), vec![1.0, 2.0, 3.0]);

        let opts = ClevelOptions {
            posneg: PosNeg::Neg,
            ..Default::default()
        };
        assert_eq!(
            clevels_with(&values, 1.0, opts).unwrap(),
            vec![-3.0, -2.0, -1.0, 0.0]
        );
    }

    #[test]
    fn test_clevels_degenerate_and_invalid() {
        assert_eq!(clevels(&[2.0, 2.0], 1.0, false).unwrap(), vec![2.0, 3.0]);
        assert!(clevels(&[1.0], 0.0, false).is_err());
        assert!(clevels(&[1.0], f64::NAN, false).is_err());
    }

    #[test]
    fn test_level_count_is_bounded() {
        let result = clevels(&[0.0, 1000.0], 1e-4, false);
        assert!(matches!(result, Err(PlotError::InvalidParameter { .. })));
        assert!(clevels(&[0.0, 1.0], 1e-300, false).is_err());
        assert!(clevels(&[-1.0, 1.0], f64::MIN_POSITIVE, true).is_err());

        let result = precip_levels(1e-5);
        assert!(matches!(result, Err(PlotError::InvalidParameter { .. })));
        assert_eq!(precip_levels(0.01).unwrap().len(), 1001);
        assert!(count_levels(&[0.0, 1.0], 1_000_000, false).is_err());
    }

    #[test]
    fn test_count_levels() {
        let values = [-4.0, 1.5, 4.0];
        assert_eq!(
            count_levels(&values, 8, true).unwrap(),
            vec![-4.0, -3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0, 4.0]
        );
        // Asymmetric data keeps its own range
        assert_eq!(
            count_levels(&[0.0, 10.0], 5, false).unwrap(),
            vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]
        );
        assert!(count_levels(&values, 0, true).is_err());
        assert_eq!(ContourLevels::from(10usize), ContourLevels::Count(10));
    }

    #[test]
    fn test_precip_levels() {
        assert_eq!(
            precip_levels(2.0).unwrap(),
            vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]
        );
        assert_eq!(precip_levels(3.0).unwrap(), vec![0.0, 3.0, 6.0, 9.0]);
        assert!(precip_levels(-1.0).is_err());
    }

    #[test]
    fn test_contour_levels_from_list() {
        assert_eq!(ContourLevels::from(vec![0.5]), ContourLevels::Interval(0.5));
        assert_eq!(
            ContourLevels::from(vec![0.0, 1.0]),
            ContourLevels::Explicit(vec![0.0, 1.0])
        );
    }

    #[test]
    fn test_validate_levels() {
        assert!(validate_levels(&[0.0, 1.0, 2.0]).is_ok());
        assert!(validate_levels(&[0.0]).is_err());
        assert!(validate_levels(&[0.0, 0.0]).is_err());
        assert!(validate_levels(&[1.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn test_classify() {
        let levels = [0.0, 1.0, 2.0];

        assert_eq!(classify(0.0, &levels, Extend::Neither), Band::Level(0));
        assert_eq!(classify(0.5, &levels, Extend::Neither), Band::Level(0));
        assert_eq!(classify(1.0, &levels, Extend::Neither), Band::Level(0));
        assert_eq!(classify(1.0001, &levels, Extend::Neither), Band::Level(1));
        assert_eq!(classify(2.0, &levels, Extend::Neither), Band::Level(1));

        assert_eq!(classify(-0.1, &levels, Extend::Neither), Band::Masked);
        assert_eq!(classify(-0.1, &levels, Extend::Min), Band::Under);
        assert_eq!(classify(-0.1, &levels, Extend::Max), Band::Masked);
        assert_eq!(classify(2.5, &levels, Extend::Max), Band::Over);
        assert_eq!(classify(2.5, &levels, Extend::Both), Band::Over);
        assert_eq!(classify(f32::NAN, &levels, Extend::Both), Band::Masked);
    }
}
