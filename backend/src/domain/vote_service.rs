//! Vote ledger domain service.
//!
//! Implements the `get-votes` and `vote` use cases on top of three driven
//! ports. Validation and URL resolution happen before any storage call, so a
//! rejected request never touches the ledger.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::domain_resolver::{self, ResolveError, ResolvedUrl};
use crate::domain::ports::{
    CastVoteRequest, EntityCatalogRepository, EntityCatalogRepositoryError, LedgerOutcome,
    SubpagePolicyRepository, SubpagePolicyRepositoryError, TallyQuery, VoteCommand,
    VoteLedgerRepository, VoteLedgerRepositoryError,
};
use crate::domain::{
    Error, InvalidDirection, Tally, TallySnapshot, VotableEntity, VoteDirection, VoteOutcome,
};

const UNSUPPORTED_DOMAIN_MESSAGE: &str = "Domain not supported.";
const UNKNOWN_DIRECTION_MESSAGE: &str = "Site not found.";

/// Vote service implementing [`TallyQuery`] and [`VoteCommand`].
#[derive(Clone)]
pub struct VoteService<P, C, L> {
    policy_repo: Arc<P>,
    catalog_repo: Arc<C>,
    ledger_repo: Arc<L>,
}

impl<P, C, L> VoteService<P, C, L> {
    /// Create a new service with the given repositories.
    pub fn new(policy_repo: Arc<P>, catalog_repo: Arc<C>, ledger_repo: Arc<L>) -> Self {
        Self {
            policy_repo,
            catalog_repo,
            ledger_repo,
        }
    }
}

impl<P, C, L> VoteService<P, C, L>
where
    P: SubpagePolicyRepository,
    C: EntityCatalogRepository,
    L: VoteLedgerRepository,
{
    fn map_resolve_error(error: ResolveError) -> Error {
        debug!(code = error.code(), %error, "url rejected");
        Error::not_found(UNSUPPORTED_DOMAIN_MESSAGE).with_details(json!({
            "code": error.code(),
        }))
    }

    fn map_direction_error(error: InvalidDirection) -> Error {
        Error::not_found(UNKNOWN_DIRECTION_MESSAGE).with_details(json!({
            "code": "invalid_direction",
            "direction": error.value,
        }))
    }

    fn map_policy_error(error: SubpagePolicyRepositoryError) -> Error {
        match error {
            SubpagePolicyRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("subpage policy unavailable: {message}"))
            }
            SubpagePolicyRepositoryError::Query { message } => {
                Error::internal(format!("subpage policy lookup failed: {message}"))
            }
        }
    }

    fn map_catalog_error(error: EntityCatalogRepositoryError) -> Error {
        match error {
            EntityCatalogRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("entity catalogue unavailable: {message}"))
            }
            EntityCatalogRepositoryError::Query { message } => {
                Error::internal(format!("entity catalogue error: {message}"))
            }
        }
    }

    fn map_ledger_error(error: VoteLedgerRepositoryError) -> Error {
        match error {
            VoteLedgerRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("vote ledger unavailable: {message}"))
            }
            VoteLedgerRepositoryError::Query { message } => {
                Error::internal(format!("vote ledger error: {message}"))
            }
            VoteLedgerRepositoryError::EntityMissing { entity_id } => {
                Error::internal(format!("votable entity {entity_id} disappeared"))
            }
            VoteLedgerRepositoryError::VotingClosed { entity_id } => {
                Error::forbidden("Voting is closed for this site.").with_details(json!({
                    "code": "voting_closed",
                    "entityId": entity_id,
                }))
            }
        }
    }

    /// Materialise the entity the resolved URL counts against.
    async fn entity_for(&self, resolved: &ResolvedUrl) -> Result<VotableEntity, Error> {
        let subpage_allowed = self
            .policy_repo
            .is_subpage_voting_allowed(&resolved.hostname)
            .await
            .map_err(Self::map_policy_error)?;

        self.catalog_repo
            .get_or_create_entity(&resolved.hostname, resolved.path.clone(), subpage_allowed)
            .await
            .map_err(Self::map_catalog_error)
    }

    fn snapshot(resolved: ResolvedUrl, tally: Tally) -> TallySnapshot {
        TallySnapshot::new(resolved.hostname, resolved.path, tally)
    }
}

#[async_trait]
impl<P, C, L> TallyQuery for VoteService<P, C, L>
where
    P: SubpagePolicyRepository,
    C: EntityCatalogRepository,
    L: VoteLedgerRepository,
{
    async fn tally(&self, url: &str) -> Result<TallySnapshot, Error> {
        let resolved = domain_resolver::resolve(url).map_err(Self::map_resolve_error)?;
        let entity = self.entity_for(&resolved).await?;
        Ok(Self::snapshot(resolved, Tally::from(&entity)))
    }
}

#[async_trait]
impl<P, C, L> VoteCommand for VoteService<P, C, L>
where
    P: SubpagePolicyRepository,
    C: EntityCatalogRepository,
    L: VoteLedgerRepository,
{
    async fn cast_vote(&self, request: CastVoteRequest) -> Result<VoteOutcome, Error> {
        let direction: VoteDirection = request
            .direction
            .parse()
            .map_err(Self::map_direction_error)?;
        let resolved = domain_resolver::resolve(&request.url).map_err(Self::map_resolve_error)?;
        let entity = self.entity_for(&resolved).await?;

        let outcome = self
            .ledger_repo
            .apply_vote(request.user_id, entity.entity_id, direction)
            .await
            .map_err(Self::map_ledger_error)?;

        Ok(match outcome {
            LedgerOutcome::Recorded(tally) => {
                VoteOutcome::Recorded(Self::snapshot(resolved, tally))
            }
            LedgerOutcome::Duplicate(tally) => {
                debug!(
                    user_id = %request.user_id,
                    entity_id = entity.entity_id,
                    "duplicate vote ignored"
                );
                VoteOutcome::Duplicate(Self::snapshot(resolved, tally))
            }
        })
    }
}

#[cfg(test)]
#[path = "vote_service_tests.rs"]
mod tests;
