//! Domain types shared by the load and analysis pipelines.
//!
//! This module defines:
//!
//! - the normalized `Observation` record (one row of `public.lecturas`)
//! - recognized export column aliases (`ColumnAlias`)
//! - date reconstruction strategies (`DateStrategy`)

pub mod types;

pub use types::*;
