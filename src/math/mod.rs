//! Numeric summaries of the stored readings: descriptive statistics,
//! Pearson correlation, and top-N selection.

pub mod correlation;
pub mod describe;

pub use correlation::*;
pub use describe::*;
