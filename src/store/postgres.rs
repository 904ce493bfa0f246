//! Postgres-backed `ObservationStore` for `public.lecturas`.
//!
//! sqlx is async-only, so the store owns a current-thread Tokio runtime and
//! blocks on it. Callers see a plain synchronous API.

use std::time::Duration;

use chrono::NaiveDate;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use tokio::runtime::{Builder, Runtime};
use tracing::{info, warn};

use crate::config::DbConfig;
use crate::domain::Observation;
use crate::error::StoreError;
use crate::store::ObservationStore;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Rows per INSERT statement (3 binds each; Postgres caps binds at 65535).
const INSERT_BATCH: usize = 1000;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS public.lecturas (\
     fecha DATE, \
     t2m DOUBLE PRECISION, \
     rh2m DOUBLE PRECISION)";

const INSERT_SQL: &str = "INSERT INTO public.lecturas (fecha, t2m, rh2m) ";

// Casts tolerate tables created with `real`/`numeric` columns.
const SELECT_SQL: &str =
    "SELECT fecha, t2m::float8 AS t2m, rh2m::float8 AS rh2m FROM public.lecturas ORDER BY fecha";

type LecturaRow = (Option<NaiveDate>, Option<f64>, Option<f64>);

pub struct PgStore {
    runtime: Runtime,
    pool: PgPool,
}

impl PgStore {
    pub fn connect(config: &DbConfig) -> Result<Self, StoreError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;

        let pool = runtime
            .block_on(
                PgPoolOptions::new()
                    .max_connections(1)
                    .acquire_timeout(CONNECT_TIMEOUT)
                    .connect_with(config.connect_options()),
            )
            .map_err(|source| StoreError::Connect {
                target: config.target(),
                source,
            })?;

        info!(db = %config.target(), "connected to Postgres");
        Ok(Self { runtime, pool })
    }
}

impl ObservationStore for PgStore {
    fn append(&mut self, observations: &[Observation]) -> Result<usize, StoreError> {
        let pool = &self.pool;
        self.runtime.block_on(async move {
            let mut tx = pool.begin().await.map_err(query_err("begin transaction"))?;

            sqlx::query(CREATE_TABLE_SQL)
                .execute(&mut *tx)
                .await
                .map_err(query_err("create table"))?;

            for chunk in observations.chunks(INSERT_BATCH) {
                insert_query(chunk)
                    .build()
                    .execute(&mut *tx)
                    .await
                    .map_err(query_err("insert rows"))?;
            }

            tx.commit().await.map_err(query_err("commit"))?;
            Ok::<_, StoreError>(())
        })?;

        info!(rows = observations.len(), "appended rows to public.lecturas");
        Ok(observations.len())
    }

    fn read_all(&mut self) -> Result<Vec<Observation>, StoreError> {
        let rows: Vec<LecturaRow> = self
            .runtime
            .block_on(sqlx::query_as::<_, LecturaRow>(SELECT_SQL).fetch_all(&self.pool))
            .map_err(query_err("select rows"))?;

        let fetched = rows.len();
        let observations: Vec<Observation> = rows
            .into_iter()
            .filter_map(|(date, t2m, rh2m)| Some(Observation::new(date?, finite(t2m), finite(rh2m))))
            .collect();

        if observations.len() < fetched {
            warn!(rows = fetched - observations.len(), "skipped stored rows with NULL fecha");
        }
        info!(rows = observations.len(), "read rows from public.lecturas");
        Ok(observations)
    }
}

fn insert_query(chunk: &[Observation]) -> QueryBuilder<'_, Postgres> {
    let mut qb = QueryBuilder::new(INSERT_SQL);
    qb.push_values(chunk, |mut row, obs| {
        row.push_bind(obs.date)
            .push_bind(obs.temperature)
            .push_bind(obs.humidity);
    });
    qb
}

fn query_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |source| StoreError::Query { context, source }
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_query_binds_three_columns_per_row() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let rows = vec![
            Observation::new(date, Some(28.12), Some(80.46)),
            Observation::new(date.succ_opt().unwrap(), None, None),
        ];
        let qb = insert_query(&rows);
        assert_eq!(
            qb.sql(),
            "INSERT INTO public.lecturas (fecha, t2m, rh2m) VALUES ($1, $2, $3), ($4, $5, $6)"
        );
    }

    #[test]
    fn batch_stays_under_bind_limit() {
        assert!(INSERT_BATCH * 3 <= u16::MAX as usize);
    }

    #[test]
    fn stored_nan_reads_back_as_missing() {
        assert_eq!(finite(Some(f64::NAN)), None);
        assert_eq!(finite(Some(1.5)), Some(1.5));
        assert_eq!(finite(None), None);
    }
}
