//! Command-line parsing for the weather readings loader/analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the normalization, storage, and statistics code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Input export read by `clima load` when `--csv` is not given.
pub const DEFAULT_CSV: &str = "datos_guayas.csv";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "clima", version, about = "Load and analyze daily T2M/RH2M weather readings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands. Each one is an independent batch run.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize a weather export and append it to `public.lecturas`.
    Load(LoadArgs),
    /// Read `public.lecturas` back and print statistics, correlation and plots.
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct LoadArgs {
    /// Export file to load.
    #[arg(long, value_name = "CSV", default_value = DEFAULT_CSV)]
    pub csv: PathBuf,

    /// Normalize and report, but do not touch the database.
    #[arg(long)]
    pub dry_run: bool,

    /// Also write the normalized table (`fecha,t2m,rh2m`) to this CSV file.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Number of most humid days to list.
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Write `lecturas_series.svg` and `lecturas_scatter.svg` into this directory.
    #[arg(long, value_name = "DIR")]
    pub svg_dir: Option<PathBuf>,

    /// Title of the SVG line chart.
    #[arg(long, default_value = "T2M and RH2M")]
    pub title: String,
}
