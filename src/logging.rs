//! Logging utilities for onsetplot.
//!
//! Structured `tracing` helpers shared by the library and the binaries.

use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Initialize the tracing subscriber with the given log level.
/// `RUST_LOG` takes precedence when set.
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    // A second initialization (e.g. from tests) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .try_init();
}

/// Log the start of a load, plot or render step
pub fn log_operation_start(operation: &str, subject: Option<&str>) {
    match subject {
        Some(subject) => info!(operation, subject, "Starting"),
        None => info!(operation, "Starting"),
    }
}

/// Log the completion of a significant operation
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    if success {
        info!(operation, duration_ms, "Finished");
    } else {
        warn!(operation, duration_ms, "Finished with warnings");
    }
}

/// Log an operation with timing and result in a single statement
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let run_id = Uuid::new_v4();

    debug!(operation, run_id = %run_id, "Starting timed step");

    let result = f();

    debug!(
        operation,
        run_id = %run_id,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Timed step finished"
    );

    result
}

/// Log what was read for a field
pub fn log_field_load_stats(file_path: &str, var_name: &str, dims: &[String], shape: &[usize]) {
    info!(
        operation = "field_load",
        file_path = file_path,
        var = var_name,
        dims = %dims.join(", "),
        shape = ?shape,
        memory_kb = shape.iter().product::<usize>() * std::mem::size_of::<f32>() / 1024,
        "Field loaded"
    );
}

/// Log an error with context
pub fn log_error(error: &crate::error::PlotError, context: &str) {
    error!(error = %error, context, "onsetplot failed");
}

/// Generate a unique run ID
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}
