//! Input/output helpers.
//!
//! - export text ingest + normalization (`ingest`)
//! - normalized table export to CSV (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
