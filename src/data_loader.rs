//! NetCDF data loading functionality.
//!
//! Reads single variables out of a NetCDF file into [`Field`]s, together with
//! the coordinate variable of each of their dimensions.

use ndarray::{ArrayD, IxDyn};
use netcdf::{Attribute, Variable as NetCDFVariable};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::{PlotError, Result};
use crate::field::{AttributeValue, Field};
use crate::logging::{log_field_load_stats, log_operation_end, log_operation_start};

/// Summary of one variable in a file
#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
    pub name: String,
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub dtype: String,
}

/// Load variable `var_name` from the NetCDF file at `path`.
///
/// Values are read as `f32`; fill and missing values become NaN, and packed
/// data is unpacked with `scale_factor` and `add_offset`.
pub fn load_field(path: &Path, var_name: &str) -> Result<Field> {
    let start = Instant::now();
    log_operation_start("load_field", Some(var_name));

    let file = open_file(path)?;
    let var = file
        .variable(var_name)
        .ok_or_else(|| PlotError::VariableNotFound {
            name: var_name.to_string(),
        })?;

    if !is_supported_variable(&var) {
        return Err(PlotError::invalid(
            "var",
            format!(
                "variable {} has unsupported type {:?}",
                var_name,
                var.vartype()
            ),
        ));
    }

    let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

    let mut coords = HashMap::new();
    for (dim, &len) in dims.iter().zip(&shape) {
        let values = match file.variable(dim) {
            Some(coord_var) if coord_var.dimensions().len() == 1 => {
                extract_coordinate_values(&coord_var)?
            }
            _ => {
                warn!("Created default coordinates for dimension: {}", dim);
                (0..len).map(|i| i as f64).collect()
            }
        };
        coords.insert(dim.clone(), values);
    }

    let mut attributes = HashMap::new();
    for attr in var.attributes() {
        let value = convert_attribute(&attr)?;
        attributes.insert(attr.name().to_string(), value);
    }

    let data: Vec<f32> = var.get_values::<f32, _>(..)?;
    let mut values = ArrayD::from_shape_vec(IxDyn(&shape), data)?;
    mask_missing(&mut values, &attributes);
    unpack(&mut values, &attributes);

    let mut field = Field::new(var_name, dims, coords, values)?;
    field.attributes = attributes;

    log_field_load_stats(
        &path.display().to_string(),
        var_name,
        &field.dims,
        &shape,
    );
    log_operation_end("load_field", start, true);
    Ok(field)
}

/// Names, dimensions and types of the plottable variables in a file
pub fn list_variables(path: &Path) -> Result<Vec<VariableInfo>> {
    let file = open_file(path)?;

    let mut infos = Vec::new();
    for var in file.variables() {
        if !is_supported_variable(&var) {
            debug!("Skipping unsupported variable: {}", var.name());
            continue;
        }
        infos.push(VariableInfo {
            name: var.name().to_string(),
            dims: var.dimensions().iter().map(|d| d.name()).collect(),
            shape: var.dimensions().iter().map(|d| d.len()).collect(),
            dtype: format!("{:?}", var.vartype()),
        });
    }
    infos.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(infos)
}

/// Global attributes of a file
pub fn global_attributes(path: &Path) -> Result<HashMap<String, AttributeValue>> {
    let file = open_file(path)?;
    let mut attributes = HashMap::new();
    for attr in file.attributes() {
        let value = convert_attribute(&attr)?;
        attributes.insert(attr.name().to_string(), value);
    }
    Ok(attributes)
}

fn open_file(path: &Path) -> Result<netcdf::File> {
    // Check if the file exists
    if !path.exists() {
        return Err(PlotError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }

    let file = netcdf::open(path)?;
    debug!("Opened NetCDF file: {}", path.display());
    Ok(file)
}

/// Check if a variable has a numeric type we can read as f32
fn is_supported_variable(var: &NetCDFVariable) -> bool {
    use netcdf::types::{BasicType, VariableType};

    matches!(
        var.vartype(),
        VariableType::Basic(BasicType::Byte)
            | VariableType::Basic(BasicType::Short)
            | VariableType::Basic(BasicType::Int)
            | VariableType::Basic(BasicType::Float)
            | VariableType::Basic(BasicType::Double)
    )
}

/// Convert a NetCDF attribute to our AttributeValue enum
fn convert_attribute(attr: &Attribute) -> Result<AttributeValue> {
    use netcdf::AttributeValue as NcAttributeValue;

    let value = attr.value()?;

    let converted = match value {
        NcAttributeValue::Str(s) => AttributeValue::Text(s),
        NcAttributeValue::Uchar(v) => AttributeValue::Number(v as f64),
        NcAttributeValue::Schar(v) => AttributeValue::Number(v as f64),
        NcAttributeValue::Short(v) => AttributeValue::Number(v as f64),
        NcAttributeValue::Int(v) => AttributeValue::Number(v as f64),
        NcAttributeValue::Float(v) => AttributeValue::Number(v as f64),
        NcAttributeValue::Double(v) => AttributeValue::Number(v),
        NcAttributeValue::Shorts(v) => {
            AttributeValue::NumberArray(v.into_iter().map(f64::from).collect())
        }
        NcAttributeValue::Ints(v) => {
            AttributeValue::NumberArray(v.into_iter().map(f64::from).collect())
        }
        NcAttributeValue::Floats(v) => {
            AttributeValue::NumberArray(v.into_iter().map(f64::from).collect())
        }
        NcAttributeValue::Doubles(v) => AttributeValue::NumberArray(v),
        other => AttributeValue::Text(format!("{:?}", other)),
    };
    Ok(converted)
}

/// Read a 1-D coordinate variable as f64
fn extract_coordinate_values(var: &NetCDFVariable) -> Result<Vec<f64>> {
    if is_supported_variable(var) {
        return Ok(var.get_values::<f64, _>(..)?);
    }

    let len = var.dimensions()[0].len();
    warn!(
        "Unsupported coordinate variable type: {:?}, using indices instead",
        var.vartype()
    );
    Ok((0..len).map(|i| i as f64).collect())
}

/// Replace `_FillValue` and `missing_value` entries with NaN
fn mask_missing(values: &mut ArrayD<f32>, attributes: &HashMap<String, AttributeValue>) {
    let sentinels: Vec<f32> = ["_FillValue", "missing_value"]
        .iter()
        .filter_map(|key| match attributes.get(*key) {
            Some(AttributeValue::Number(v)) => Some(*v as f32),
            _ => None,
        })
        .collect();

    if sentinels.is_empty() {
        return;
    }
    values.mapv_inplace(|v| if sentinels.contains(&v) { f32::NAN } else { v });
}

/// Apply `value * scale_factor + add_offset` to packed data
fn unpack(values: &mut ArrayD<f32>, attributes: &HashMap<String, AttributeValue>) {
    let number = |key: &str| match attributes.get(key) {
        Some(AttributeValue::Number(v)) => Some(*v),
        _ => None,
    };
    let (scale, offset) = match (number("scale_factor"), number("add_offset")) {
        (None, None) => return,
        (scale, offset) => (scale.unwrap_or(1.0), offset.unwrap_or(0.0)),
    };

    debug!(scale, offset, "Unpacking variable");
    values.mapv_inplace(|v| (v as f64 * scale + offset) as f32);
}
