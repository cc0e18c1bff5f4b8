//! PostgreSQL readiness check: one pooled checkout and `SELECT 1`.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{ReadinessProbe, ReadinessProbeError};

use super::pool::DbPool;

/// Diesel implementation of [`ReadinessProbe`].
#[derive(Clone)]
pub struct DieselReadinessProbe {
    pool: DbPool,
}

impl DieselReadinessProbe {
    /// Create a probe that checks out connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadinessProbe for DieselReadinessProbe {
    async fn check(&self) -> Result<(), ReadinessProbeError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| ReadinessProbeError::unavailable(error.to_string()))?;

        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map_err(|error| {
                debug!(%error, "readiness query failed");
                ReadinessProbeError::unavailable(error.to_string())
            })?;
        Ok(())
    }
}
