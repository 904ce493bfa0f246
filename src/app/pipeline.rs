//! Shared pipeline logic behind the `load` and `analyze` commands.
//!
//! Keeping the workflow here (rather than in the command handlers) lets the
//! whole load -> store -> analyze path run against `InMemoryStore` in tests:
//! export text -> normalize -> append | read back -> statistics

use std::path::Path;

use tracing::info;

use crate::domain::Observation;
use crate::error::AppError;
use crate::io::ingest::{Normalized, normalize_with_report};
use crate::report::{Analysis, analyze};
use crate::store::ObservationStore;

/// Outputs of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    /// Stored rows, ascending by date.
    pub observations: Vec<Observation>,
    pub analysis: Analysis,
}

/// Read an export file. Invalid UTF-8 is replaced rather than rejected.
pub fn read_export(path: &Path) -> Result<String, AppError> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::new(2, format!("Failed to read export '{}': {e}", path.display())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read and normalize an export file.
pub fn normalize_file(path: &Path) -> Result<Normalized, AppError> {
    let raw = read_export(path)?;
    let normalized = normalize_with_report(&raw)?;
    info!(
        file = %path.display(),
        header_line = normalized.header_line,
        date_encoding = normalized.strategy.display_name(),
        rows_read = normalized.rows_read,
        rows_kept = normalized.observations.len(),
        "normalized export"
    );
    Ok(normalized)
}

/// Append a normalized batch. Returns the number of rows written.
pub fn run_load<S: ObservationStore + ?Sized>(store: &mut S, normalized: &Normalized) -> Result<usize, AppError> {
    Ok(store.append(&normalized.observations)?)
}

/// Read every stored row and compute the analysis.
pub fn run_analysis<S: ObservationStore + ?Sized>(store: &mut S, top_n: usize) -> Result<AnalysisRun, AppError> {
    let observations = store.read_all()?;
    let analysis = analyze(&observations, top_n);
    Ok(AnalysisRun {
        observations,
        analysis,
    })
}
