//! onsetplot - filled contour figures of onset-relative composites
//!
//! This is the main entry point for the onsetplot command line tool.

use std::time::Instant;
use tracing::{error, info};

use onsetplot::config::{Args, PlotKind};
use onsetplot::data_loader::load_field;
use onsetplot::figure::{FigGroup, FontWeight};
use onsetplot::plots::{add_labels, contourf_latday, contourf_londay, LabelPositions};
use onsetplot::render::{save_png, scene_json};
use onsetplot::{generate_run_id, init_tracing, log_error, Config, PlotError, Result};

/// Panel label placement, in axes fractions
const LABEL_POS: (f64, f64) = (-0.12, 1.04);
const LABEL_FONTSIZE: f32 = 14.0;

fn main() {
    if let Err(e) = run() {
        log_error(&e, "onsetplot");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Load configuration
    let (config, args) = Config::load()?;

    // Validate configuration
    config.validate().map_err(|e| {
        eprintln!("Invalid configuration: {}", e);
        e
    })?;

    init_tracing(&config.log_level);

    let run_id = generate_run_id();
    let start = Instant::now();
    info!(
        run_id = %run_id,
        version = env!("CARGO_PKG_VERSION"),
        file = %args.netcdf_file.display(),
        "Starting onsetplot"
    );

    let panels = args.rows * args.cols;
    if args.vars.len() > panels {
        return Err(PlotError::invalid(
            "var",
            format!(
                "{} variables do not fit in a {}x{} figure group",
                args.vars.len(),
                args.rows,
                args.cols
            ),
        ));
    }

    let (width, height) = config.figure_size(args.rows, args.cols);
    let mut grp = FigGroup::new(args.rows, args.cols)?
        .with_size(width, height)
        .with_suptitle(args.title.clone());

    for var_name in &args.vars {
        let field = load_field(&args.netcdf_file, var_name).map_err(|e| {
            error!(var = %var_name, "Failed to load variable: {}", e);
            e
        })?;

        grp.next()?;
        match args.kind {
            PlotKind::Latday => contourf_latday(&mut grp, &field, &config.latday_options(&args))?,
            PlotKind::Londay => contourf_londay(&mut grp, &field, &config.londay_options(&args))?,
        }
    }

    if !args.labels.is_empty() {
        add_labels(
            &mut grp,
            &args.labels,
            &LabelPositions::Single(LABEL_POS),
            LABEL_FONTSIZE,
            FontWeight::Bold,
        )?;
    }

    save_png(&grp, &args.output, &config.render_options())?;

    if let Some(scene_path) = &args.scene {
        std::fs::write(scene_path, scene_json(&grp)?)?;
        info!(path = %scene_path.display(), "Scene written");
    }

    info!(
        run_id = %run_id,
        output = %args.output.display(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Done"
    );
    Ok(())
}
