//! `clima-agro` library crate.
//!
//! The binary (`clima`) is a thin wrapper around this library so that:
//!
//! - the normalizer, statistics and report formatting are testable without
//!   spawning processes or a database
//! - the load and analyze commands share one pipeline module

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod plot;
pub mod report;
pub mod store;
