//! Domain ports for the vote ledger's hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters; driving
//! ports ([`TallyQuery`], [`VoteCommand`]) are consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod entity_catalog_repository;
mod readiness_probe;
mod subpage_policy_repository;
mod tally_query;
mod vote_command;
mod vote_ledger_repository;

#[cfg(test)]
pub use entity_catalog_repository::MockEntityCatalogRepository;
pub use entity_catalog_repository::{
    EntityCatalogRepository, EntityCatalogRepositoryError, FixtureEntityCatalogRepository,
    effective_path,
};
#[cfg(test)]
pub use readiness_probe::MockReadinessProbe;
pub use readiness_probe::{FixtureReadinessProbe, ReadinessProbe, ReadinessProbeError};
#[cfg(test)]
pub use subpage_policy_repository::MockSubpagePolicyRepository;
pub use subpage_policy_repository::{
    FixtureSubpagePolicyRepository, SubpagePolicyRepository, SubpagePolicyRepositoryError,
};
#[cfg(test)]
pub use tally_query::MockTallyQuery;
pub use tally_query::{FixtureTallyQuery, TallyQuery};
#[cfg(test)]
pub use vote_command::MockVoteCommand;
pub use vote_command::{CastVoteRequest, FixtureVoteCommand, VoteCommand};
#[cfg(test)]
pub use vote_ledger_repository::MockVoteLedgerRepository;
pub use vote_ledger_repository::{
    FixtureVoteLedgerRepository, LedgerOutcome, VoteLedgerRepository, VoteLedgerRepositoryError,
};
