//! Labeled numeric arrays.
//!
//! A [`Field`] is an N-dimensional `f32` array whose axes carry names and
//! coordinate vectors, e.g. a composite on `(dayrel, lat)`. Plot routines only
//! read from fields; they never keep them around.

use ndarray::{Array2, ArrayD, Axis, Ix2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{PlotError, Result};

/// Accepted spellings for each canonical coordinate name.
const COORD_ALIASES: &[(&str, &[&str])] = &[
    ("lat", &["lat", "latitude", "lats", "YDim"]),
    ("lon", &["lon", "longitude", "lons", "XDim"]),
    ("dayrel", &["dayrel", "day"]),
];

/// Possible attribute values attached to a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// String attribute
    Text(String),
    /// Numeric attribute (stored as f64 for simplicity)
    Number(f64),
    /// Array of numbers
    NumberArray(Vec<f64>),
}

/// A labeled N-dimensional array with one coordinate vector per dimension
#[derive(Debug, Clone)]
pub struct Field {
    /// Variable name
    pub name: String,
    /// Dimension names, in axis order
    pub dims: Vec<String>,
    /// Coordinate values keyed by dimension name
    pub coords: HashMap<String, Vec<f64>>,
    /// Data values
    pub values: ArrayD<f32>,
    /// Variable attributes (units, long_name, ...)
    pub attributes: HashMap<String, AttributeValue>,
}

impl Field {
    /// Create a field, checking that every dimension has a coordinate vector
    /// whose length matches the corresponding axis.
    pub fn new(
        name: impl Into<String>,
        dims: Vec<String>,
        coords: HashMap<String, Vec<f64>>,
        values: ArrayD<f32>,
    ) -> Result<Self> {
        if dims.len() != values.ndim() {
            return Err(PlotError::invalid(
                "dims",
                format!(
                    "{} dimension names given for a {}-dimensional array",
                    dims.len(),
                    values.ndim()
                ),
            ));
        }

        for (axis, dim) in dims.iter().enumerate() {
            let coord = coords
                .get(dim)
                .ok_or_else(|| PlotError::CoordinateNotFound { name: dim.clone() })?;
            if coord.len() != values.len_of(Axis(axis)) {
                return Err(PlotError::invalid(
                    "coords",
                    format!(
                        "coordinate {} has {} values but axis {} has length {}",
                        dim,
                        coord.len(),
                        axis,
                        values.len_of(Axis(axis))
                    ),
                ));
            }
        }

        Ok(Self {
            name: name.into(),
            dims,
            coords,
            values,
            attributes: HashMap::new(),
        })
    }

    /// Convenience constructor for 2-D fields: `values` has shape
    /// `(y_coord.len(), x_coord.len())`.
    pub fn from_grid(
        name: impl Into<String>,
        (y_dim, y_coord): (&str, Vec<f64>),
        (x_dim, x_coord): (&str, Vec<f64>),
        values: Array2<f32>,
    ) -> Result<Self> {
        let mut coords = HashMap::new();
        coords.insert(y_dim.to_string(), y_coord);
        coords.insert(x_dim.to_string(), x_coord);
        Self::new(
            name,
            vec![y_dim.to_string(), x_dim.to_string()],
            coords,
            values.into_dyn(),
        )
    }

    /// Attach an attribute
    pub fn with_attribute(mut self, key: &str, value: AttributeValue) -> Self {
        self.attributes.insert(key.to_string(), value);
        self
    }

    /// Resolve a canonical coordinate name (or any alias) to the dimension
    /// name actually used by this field.
    pub fn dim_name(&self, name: &str) -> Result<&str> {
        if let Some(dim) = self.dims.iter().find(|d| d.as_str() == name) {
            return Ok(dim.as_str());
        }

        let aliases = COORD_ALIASES
            .iter()
            .find(|(canonical, aliases)| *canonical == name || aliases.contains(&name))
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[]);

        self.dims
            .iter()
            .find(|d| aliases.contains(&d.as_str()))
            .map(|d| d.as_str())
            .ok_or_else(|| PlotError::CoordinateNotFound {
                name: name.to_string(),
            })
    }

    /// Coordinate values for a dimension, alias-aware
    pub fn coord(&self, name: &str) -> Result<&[f64]> {
        let dim = self.dim_name(name)?;
        self.coords
            .get(dim)
            .map(|c| c.as_slice())
            .ok_or_else(|| PlotError::CoordinateNotFound {
                name: name.to_string(),
            })
    }

    /// Axis index of a dimension, alias-aware
    pub fn axis_of(&self, name: &str) -> Result<usize> {
        let dim = self.dim_name(name)?;
        self.dims
            .iter()
            .position(|d| d == dim)
            .ok_or_else(|| PlotError::CoordinateNotFound {
                name: name.to_string(),
            })
    }

    /// Keep only the points whose `name` coordinate lies within the closed
    /// interval spanned by `bounds` (in either order).
    pub fn subset(&self, name: &str, bounds: (f64, f64)) -> Result<Field> {
        let axis = self.axis_of(name)?;
        let dim = self.dims[axis].clone();
        let (lo, hi) = if bounds.0 <= bounds.1 {
            bounds
        } else {
            (bounds.1, bounds.0)
        };

        let coord = self.coord(&dim)?;
        let keep: Vec<usize> = coord
            .iter()
            .enumerate()
            .filter(|(_, c)| **c >= lo && **c <= hi)
            .map(|(i, _)| i)
            .collect();

        let mut coords = self.coords.clone();
        coords.insert(dim, keep.iter().map(|&i| coord[i]).collect());

        Ok(Field {
            name: self.name.clone(),
            dims: self.dims.clone(),
            coords,
            values: self.values.select(Axis(axis), &keep),
            attributes: self.attributes.clone(),
        })
    }

    /// Minimum over finite values
    pub fn min(&self) -> Option<f32> {
        finite_min(self.values.iter().copied())
    }

    /// Maximum over finite values
    pub fn max(&self) -> Option<f32> {
        finite_max(self.values.iter().copied())
    }

    /// Reverse the axis order
    pub fn transpose(&self) -> Field {
        let mut dims = self.dims.clone();
        dims.reverse();
        Field {
            name: self.name.clone(),
            dims,
            coords: self.coords.clone(),
            values: self.values.clone().reversed_axes(),
            attributes: self.attributes.clone(),
        }
    }

    /// Extract a 2-D grid with rows along `y` and columns along `x`,
    /// transposing the stored array when needed.
    pub fn grid(&self, y: &str, x: &str) -> Result<Array2<f32>> {
        if self.values.ndim() != 2 {
            return Err(PlotError::invalid(
                "field",
                format!(
                    "{} has {} dimensions ({}); a 2-D field is required",
                    self.name,
                    self.values.ndim(),
                    self.dims.join(", ")
                ),
            ));
        }

        let y_axis = self.axis_of(y)?;
        let x_axis = self.axis_of(x)?;
        if y_axis == x_axis {
            return Err(PlotError::invalid(
                "field",
                format!("{} and {} refer to the same dimension", y, x),
            ));
        }

        let view = self.values.view().into_dimensionality::<Ix2>()?;
        if y_axis == 0 {
            Ok(view.to_owned())
        } else {
            Ok(view.t().to_owned())
        }
    }

    /// Total number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the field holds no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Minimum of the finite values in an iterator
pub fn finite_min(values: impl Iterator<Item = f32>) -> Option<f32> {
    values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        Some(m) if m <= v => Some(m),
        _ => Some(v),
    })
}

/// Maximum of the finite values in an iterator
pub fn finite_max(values: impl Iterator<Item = f32>) -> Option<f32> {
    values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        Some(m) if m >= v => Some(m),
        _ => Some(v),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn day_lat_field() -> Field {
        // 3 days x 5 latitudes
        let values = array![
            [1.0, 2.0, 3.0, 4.0, 5.0],
            [6.0, 7.0, 8.0, 9.0, 10.0],
            [11.0, 12.0, 13.0, 14.0, 15.0]
        ];
        Field::from_grid(
            "precip",
            ("dayrel", vec![-1.0, 0.0, 1.0]),
            ("latitude", vec![-80.0, -40.0, 0.0, 40.0, 80.0]),
            values,
        )
        .unwrap()
    }

    #[test]
    fn test_coord_aliases() {
        let field = day_lat_field();
        assert_eq!(field.coord("lat").unwrap(), &[-80.0, -40.0, 0.0, 40.0, 80.0]);
        assert_eq!(field.coord("latitude").unwrap().len(), 5);
        assert_eq!(field.coord("day").unwrap(), &[-1.0, 0.0, 1.0]);
        assert_eq!(field.dim_name("lat").unwrap(), "latitude");

        match field.coord("lon") {
            Err(PlotError::CoordinateNotFound { name }) => assert_eq!(name, "lon"),
            other => panic!("Expected CoordinateNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_new_rejects_mismatched_coords() {
        let mut coords = HashMap::new();
        coords.insert("lat".to_string(), vec![0.0, 1.0]);
        coords.insert("lon".to_string(), vec![0.0, 1.0, 2.0]);
        let values = ArrayD::<f32>::zeros(vec![2, 2]);

        let result = Field::new(
            "bad",
            vec!["lat".to_string(), "lon".to_string()],
            coords,
            values,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_subset_is_inclusive() {
        let field = day_lat_field();
        let sub = field.subset("lat", (-40.0, 40.0)).unwrap();

        assert_eq!(sub.coord("lat").unwrap(), &[-40.0, 0.0, 40.0]);
        assert_eq!(sub.values.shape(), &[3, 3]);
        assert_eq!(sub.values[[0, 0]], 2.0);
        assert_eq!(sub.values[[2, 2]], 14.0);

        // Reversed bounds select the same band
        let reversed = field.subset("lat", (40.0, -40.0)).unwrap();
        assert_eq!(reversed.coord("lat").unwrap(), sub.coord("lat").unwrap());
    }

    #[test]
    fn test_subset_can_be_empty() {
        let field = day_lat_field();
        let sub = field.subset("lat", (10.0, 20.0)).unwrap();
        assert!(sub.coord("lat").unwrap().is_empty());
        assert!(sub.is_empty());
        assert_eq!(sub.min(), None);
    }

    #[test]
    fn test_grid_transposes_by_name() {
        let field = day_lat_field();

        let lat_day = field.grid("lat", "dayrel").unwrap();
        assert_eq!(lat_day.shape(), &[5, 3]);
        assert_eq!(lat_day[[0, 2]], 11.0);

        let day_lat = field.grid("dayrel", "lat").unwrap();
        assert_eq!(day_lat.shape(), &[3, 5]);
        assert_eq!(day_lat[[2, 0]], 11.0);

        let transposed = field.transpose();
        assert_eq!(transposed.dims, vec!["latitude", "dayrel"]);
        assert_eq!(transposed.grid("lat", "dayrel").unwrap(), lat_day);
    }

    #[test]
    fn test_min_max_ignore_nan() {
        let values = array![[f32::NAN, -2.0], [3.5, f32::INFINITY]];
        let field = Field::from_grid(
            "u",
            ("dayrel", vec![0.0, 1.0]),
            ("lon", vec![0.0, 1.0]),
            values,
        )
        .unwrap();

        assert_eq!(field.min(), Some(-2.0));
        assert_eq!(field.max(), Some(3.5));
    }

    #[test]
    fn test_attribute_value_serialization() {
        let text = AttributeValue::Text("mm/day".to_string());
        assert_eq!(serde_json::to_string(&text).unwrap(), r#""mm/day""#);

        let number = AttributeValue::Number(42.0);
        assert_eq!(serde_json::to_string(&number).unwrap(), "42.0");
    }
}
