//! Test data generation utilities.
//!
//! Synthetic onset composites as in-memory fields, and a NetCDF writer for
//! the same patterns.

use ndarray::Array2;
use onsetplot::Field;
use std::f64::consts::PI;

/// Relative days -120..=200 every 5 days
pub fn days() -> Vec<f64> {
    (0..=64).map(|i| -120.0 + 5.0 * i as f64).collect()
}

/// Latitudes -90..=90 every 5 degrees
pub fn lats() -> Vec<f64> {
    (0..=36).map(|i| -90.0 + 5.0 * i as f64).collect()
}

/// Longitudes 40..=120 every 2.5 degrees
pub fn lons() -> Vec<f64> {
    (0..=32).map(|i| 40.0 + 2.5 * i as f64).collect()
}

/// A `(dayrel, x)` field filled from `f(day, x)`
pub fn day_field(
    name: &str,
    x_dim: &str,
    xs: Vec<f64>,
    f: impl Fn(f64, f64) -> f64,
) -> Field {
    let days = days();
    let values = Array2::from_shape_fn((days.len(), xs.len()), |(i, j)| f(days[i], xs[j]) as f32);
    Field::from_grid(name, ("dayrel", days), (x_dim, xs), values).unwrap()
}

/// Zonal wind anomaly: positive north of the equator after onset, negative before
pub fn wind_anomaly_latday() -> Field {
    day_field("U200", "lat", lats(), |day, lat| {
        12.5 * (day / 120.0).tanh() * (lat * PI / 180.0).sin()
    })
}

/// Precipitation ramping up at onset over the northern tropics
pub fn precip_latday() -> Field {
    day_field("PRECTOT", "lat", lats(), |day, lat| {
        let onset = 1.0 / (1.0 + (-day / 10.0).exp());
        let band = (-((lat - 15.0) / 12.0).powi(2)).exp();
        1.0 + 11.0 * onset * band
    })
}

/// Meridional wind anomaly propagating eastward
pub fn wind_anomaly_londay() -> Field {
    day_field("V850", "lon", lons(), |day, lon| {
        4.0 * ((lon - 40.0) / 20.0 - day / 30.0).sin()
    })
}

/// Write the three composites to a NetCDF file.
#[cfg(feature = "netcdf")]
pub fn create_composite_nc(path: &std::path::Path) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;

    let days = days();
    let lats = lats();
    let lons = lons();

    file.add_dimension("dayrel", days.len())?;
    file.add_dimension("lat", lats.len())?;
    file.add_dimension("lon", lons.len())?;

    file.add_attribute("title", "Onset composite test data")?;
    file.add_attribute("institution", "onsetplot test suite")?;

    {
        let mut var = file.add_variable::<f64>("dayrel", &["dayrel"])?;
        var.put_attribute("units", "days relative to onset")?;
        var.put_values(&days, ..)?;
    }
    {
        let mut var = file.add_variable::<f64>("lat", &["lat"])?;
        var.put_attribute("units", "degrees_north")?;
        var.put_values(&lats, ..)?;
    }
    {
        let mut var = file.add_variable::<f64>("lon", &["lon"])?;
        var.put_attribute("units", "degrees_east")?;
        var.put_values(&lons, ..)?;
    }

    for (field, long_name) in [
        (wind_anomaly_latday(), "Zonal wind at 200 hPa"),
        (precip_latday(), "Total precipitation"),
        (wind_anomaly_londay(), "Meridional wind at 850 hPa"),
    ] {
        let dims: Vec<&str> = field.dims.iter().map(String::as_str).collect();
        let mut var = file.add_variable::<f32>(&field.name, &dims)?;
        var.put_attribute("long_name", long_name)?;
        let data: Vec<f32> = field.values.iter().copied().collect();
        var.put_values(&data, ..)?;
    }

    Ok(())
}
