//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads database settings from the environment
//! - runs the load or analysis pipeline
//! - prints reports/plots
//! - writes optional exports

use std::fs::create_dir_all;

use clap::Parser;
use tracing::info;

use crate::cli::{AnalyzeArgs, Command, LoadArgs};
use crate::config::DbConfig;
use crate::error::AppError;
use crate::store::{InMemoryStore, PgStore, TABLE};

pub mod pipeline;

/// Entry point for the `clima` binary.
pub fn run() -> Result<(), AppError> {
    crate::logging::init_logging();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Load(args) => handle_load(args),
        Command::Analyze(args) => handle_analyze(args),
    }
}

fn handle_load(args: LoadArgs) -> Result<(), AppError> {
    let normalized = pipeline::normalize_file(&args.csv)?;

    if let Some(path) = &args.export {
        crate::io::export::write_observations_csv(path, &normalized.observations)?;
        info!(file = %path.display(), "wrote normalized export");
    }

    if args.dry_run {
        let mut store = InMemoryStore::new();
        let rows = pipeline::run_load(&mut store, &normalized)?;
        println!("Dry run: {rows} rows normalized, database not touched");
        return Ok(());
    }

    let config = DbConfig::from_env()?;
    let mut store = PgStore::connect(&config)?;
    let rows = pipeline::run_load(&mut store, &normalized)?;
    println!("Loaded {rows} rows into {TABLE}");
    Ok(())
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = DbConfig::from_env()?;
    let mut store = PgStore::connect(&config)?;
    let run = pipeline::run_analysis(&mut store, args.top)?;
    let analysis = &run.analysis;

    // Print terminal output.
    println!("{}", crate::report::format_head(&run.observations, crate::report::HEAD_ROWS));
    println!("{}", crate::report::format_summary(&analysis.summary));

    if !args.no_plot {
        println!(
            "{}",
            crate::plot::render_series_plot(&run.observations, args.width, args.height)
        );
    }

    println!("{}", crate::report::format_top_humidity(&analysis.top_humidity));
    println!(
        "{}",
        crate::report::format_correlation(analysis.correlation, analysis.band)
    );

    if !args.no_plot {
        println!(
            "{}",
            crate::plot::render_scatter_plot(&run.observations, args.width, args.height)
        );
    }

    // Optional chart files.
    if let Some(dir) = &args.svg_dir {
        create_dir_all(dir)
            .map_err(|e| AppError::new(2, format!("Failed to create chart dir '{}': {e}", dir.display())))?;
        let series = dir.join(crate::plot::SERIES_FILE);
        let scatter = dir.join(crate::plot::SCATTER_FILE);
        crate::plot::write_series_svg(&series, &run.observations, &args.title)?;
        crate::plot::write_scatter_svg(&scatter, &run.observations)?;
        info!(dir = %dir.display(), "wrote SVG charts");
    }

    Ok(())
}
