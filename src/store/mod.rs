//! Persistence for normalized observations.
//!
//! The pipelines only talk to `ObservationStore`; `PgStore` is the real
//! backend and `InMemoryStore` backs dry runs and tests.

use crate::domain::Observation;
use crate::error::StoreError;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Fully qualified table holding the readings.
pub const TABLE: &str = "public.lecturas";

/// Append-only observation storage.
pub trait ObservationStore {
    /// Append all observations as one unit. Returns the number of rows written.
    fn append(&mut self, observations: &[Observation]) -> Result<usize, StoreError>;

    /// Every stored observation, ascending by date.
    fn read_all(&mut self) -> Result<Vec<Observation>, StoreError>;
}
