//! PostgreSQL-backed get-or-create for domains and votable entities.
//!
//! Both inserts use `ON CONFLICT DO NOTHING` followed by a re-read, so
//! concurrent first accesses converge on the same row without surfacing a
//! uniqueness error.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{EntityCatalogRepository, EntityCatalogRepositoryError, effective_path};
use crate::domain::{DomainRecord, VotableEntity};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DomainRow, NewDomainRow, NewVotableEntityRow, VotableEntityRow};
use super::pool::{DbPool, PoolError};
use super::schema::{domains, votable_domains};

/// Diesel implementation of [`EntityCatalogRepository`].
#[derive(Clone)]
pub struct DieselEntityCatalogRepository {
    pool: DbPool,
}

impl DieselEntityCatalogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> EntityCatalogRepositoryError {
    map_pool_error(error, EntityCatalogRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> EntityCatalogRepositoryError {
    map_diesel_error(
        error,
        EntityCatalogRepositoryError::query,
        EntityCatalogRepositoryError::connection,
    )
}

fn to_entity(row: VotableEntityRow) -> Result<VotableEntity, EntityCatalogRepositoryError> {
    VotableEntity::try_from(row).map_err(EntityCatalogRepositoryError::query)
}

async fn find_domain(
    conn: &mut AsyncPgConnection,
    name: &str,
) -> Result<Option<DomainRecord>, EntityCatalogRepositoryError> {
    let row = domains::table
        .filter(domains::name.eq(name))
        .select(DomainRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel)?;
    Ok(row.map(DomainRecord::from))
}

async fn ensure_domain(
    conn: &mut AsyncPgConnection,
    name: &str,
) -> Result<DomainRecord, EntityCatalogRepositoryError> {
    if let Some(domain) = find_domain(conn, name).await? {
        return Ok(domain);
    }

    let inserted = diesel::insert_into(domains::table)
        .values(&NewDomainRow { name })
        .on_conflict(domains::name)
        .do_nothing()
        .execute(conn)
        .await
        .map_err(map_diesel)?;
    debug!(domain = name, inserted, "domain registered");

    find_domain(conn, name)
        .await?
        .ok_or_else(|| EntityCatalogRepositoryError::query("domain missing after insert"))
}

async fn find_entity(
    conn: &mut AsyncPgConnection,
    domain_id: i64,
    path: Option<&str>,
) -> Result<Option<VotableEntity>, EntityCatalogRepositoryError> {
    let query = votable_domains::table
        .filter(votable_domains::domain_id.eq(domain_id))
        .select(VotableEntityRow::as_select())
        .into_boxed();
    let query = match path {
        Some(path) => query.filter(votable_domains::path.eq(path)),
        None => query.filter(votable_domains::path.is_null()),
    };

    let row = query
        .first::<VotableEntityRow>(conn)
        .await
        .optional()
        .map_err(map_diesel)?;
    row.map(to_entity).transpose()
}

#[async_trait]
impl EntityCatalogRepository for DieselEntityCatalogRepository {
    async fn get_or_create_entity(
        &self,
        hostname: &str,
        path: Option<String>,
        subpage_allowed: bool,
    ) -> Result<VotableEntity, EntityCatalogRepositoryError> {
        let path = effective_path(path, subpage_allowed);
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let domain = ensure_domain(&mut conn, hostname).await?;
        if let Some(entity) = find_entity(&mut conn, domain.id, path.as_deref()).await? {
            return Ok(entity);
        }

        // No conflict target: either partial unique index may reject the row.
        let inserted = diesel::insert_into(votable_domains::table)
            .values(&NewVotableEntityRow {
                domain_id: domain.id,
                path: path.as_deref(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        debug!(domain = hostname, path = ?path, inserted, "votable entity materialised");

        find_entity(&mut conn, domain.id, path.as_deref())
            .await?
            .ok_or_else(|| EntityCatalogRepositoryError::query("entity missing after insert"))
    }
}
