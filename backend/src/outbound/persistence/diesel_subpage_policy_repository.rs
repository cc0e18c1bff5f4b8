//! PostgreSQL-backed subpage policy lookup.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SubpagePolicyRepository, SubpagePolicyRepositoryError};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::{domains, votable_domains};

/// Diesel implementation of [`SubpagePolicyRepository`].
///
/// A domain allows subpage voting when any of its entity rows carries the
/// flag; domains without rows default to whole-domain voting.
#[derive(Clone)]
pub struct DieselSubpagePolicyRepository {
    pool: DbPool,
}

impl DieselSubpagePolicyRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> SubpagePolicyRepositoryError {
    map_pool_error(error, SubpagePolicyRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> SubpagePolicyRepositoryError {
    map_diesel_error(
        error,
        SubpagePolicyRepositoryError::query,
        SubpagePolicyRepositoryError::connection,
    )
}

#[async_trait]
impl SubpagePolicyRepository for DieselSubpagePolicyRepository {
    async fn is_subpage_voting_allowed(
        &self,
        hostname: &str,
    ) -> Result<bool, SubpagePolicyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        diesel::select(exists(
            votable_domains::table
                .inner_join(domains::table)
                .filter(domains::name.eq(hostname))
                .filter(votable_domains::allow_subpage_voting.eq(true)),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel)
    }
}
