//! In-memory `ObservationStore`.

use tracing::debug;

use crate::domain::Observation;
use crate::error::StoreError;
use crate::store::ObservationStore;

/// Keeps appended rows in insertion order, like a heap table without an index.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    rows: Vec<Observation>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl ObservationStore for InMemoryStore {
    fn append(&mut self, observations: &[Observation]) -> Result<usize, StoreError> {
        self.rows.extend_from_slice(observations);
        debug!(rows = observations.len(), total = self.rows.len(), "appended to in-memory store");
        Ok(observations.len())
    }

    fn read_all(&mut self) -> Result<Vec<Observation>, StoreError> {
        // Stable sort: rows sharing a date across loads keep append order.
        let mut rows = self.rows.clone();
        rows.sort_by_key(|o| o.date);
        Ok(rows)
    }
}
