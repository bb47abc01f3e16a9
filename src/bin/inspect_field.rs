//! Print the variables of a NetCDF file, or a summary of one of them.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use onsetplot::contour::auto_levels;
use onsetplot::data_loader::{global_attributes, list_variables, load_field};
use onsetplot::field::AttributeValue;

/// Preferred number of contour intervals, as in the plotting defaults
const AUTO_N_PREF: usize = 40;

#[derive(Parser, Debug)]
#[command(name = "inspect_field")]
#[command(author, version, about = "Inspect NetCDF composites before plotting")]
struct Args {
    /// NetCDF file to inspect
    file: PathBuf,

    /// Variable to summarize
    #[arg(short, long)]
    var: Option<String>,
}

fn format_attribute(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Text(s) => s.clone(),
        AttributeValue::Number(n) => n.to_string(),
        AttributeValue::NumberArray(v) => format!("{:?}", v),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Inspecting NetCDF file: {}", args.file.display());

    let Some(var_name) = args.var else {
        let globals = global_attributes(&args.file)
            .with_context(|| format!("reading {}", args.file.display()))?;
        println!("\nGlobal Attributes:");
        let mut keys: Vec<_> = globals.keys().collect();
        keys.sort();
        for key in keys {
            println!("  {}: {}", key, format_attribute(&globals[key]));
        }

        println!("\nVariables:");
        for info in list_variables(&args.file)? {
            let dims: Vec<String> = info
                .dims
                .iter()
                .zip(&info.shape)
                .map(|(d, n)| format!("{} = {}", d, n))
                .collect();
            println!("  {} ({}) [{}]", info.name, info.dtype, dims.join(", "));
        }
        return Ok(());
    };

    let field = load_field(&args.file, &var_name)
        .with_context(|| format!("loading variable {}", var_name))?;

    println!("\nVariable: {}", field.name);
    for dim in &field.dims {
        let coord = field.coord(dim)?;
        match (coord.first(), coord.last()) {
            (Some(first), Some(last)) => {
                println!("  {} = {} [{} .. {}]", dim, coord.len(), first, last)
            }
            _ => println!("  {} = 0", dim),
        }
    }

    let mut keys: Vec<_> = field.attributes.keys().collect();
    keys.sort();
    for key in keys {
        println!("    {}: {}", key, format_attribute(&field.attributes[key]));
    }

    match (field.min(), field.max()) {
        (Some(min), Some(max)) => {
            println!("\nRange: {} .. {}", min, max);
            let values: Vec<f32> = field.values.iter().copied().collect();
            let (cint, levels) = auto_levels(&values, AUTO_N_PREF)?;
            println!("Contour interval: {} ({} levels)", cint, levels.len());
        }
        _ => println!("\nRange: no finite values"),
    }
    let nan_count = field.values.iter().filter(|v| v.is_nan()).count();
    println!("Missing: {} of {}", nan_count, field.len());

    Ok(())
}
