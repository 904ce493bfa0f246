//! Export the normalized table to CSV.
//!
//! The layout (`fecha,t2m,rh2m`) mirrors `public.lecturas`, so the file can be
//! bulk-loaded elsewhere or diffed against the database contents.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::Observation;
use crate::error::AppError;

/// Write observations to a CSV file.
pub fn write_observations_csv(path: &Path, observations: &[Observation]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_observations(file, observations)
}

/// Write observations as CSV to any writer.
pub fn write_observations<W: Write>(writer: W, observations: &[Observation]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);
    if observations.is_empty() {
        // `serialize` only emits the header alongside the first record.
        wtr.write_record(["fecha", "t2m", "rh2m"])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;
    }
    for obs in observations {
        wtr.serialize(obs)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    wtr.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
