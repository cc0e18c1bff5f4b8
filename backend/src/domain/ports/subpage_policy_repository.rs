//! Port for looking up a domain's subpage voting policy.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by subpage policy adapters.
    pub enum SubpagePolicyRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "subpage policy repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "subpage policy repository query failed: {message}",
    }
}

/// Port answering whether a domain's paths get independent tallies.
///
/// The flag is domain-scoped and carried on whichever entity row exists for
/// the domain. Adapters return `false` when the domain has no rows yet, so an
/// unseen domain is always materialised as a single domain-level entity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubpagePolicyRepository: Send + Sync {
    /// Return `true` when votes on `hostname/<path>` count per path.
    async fn is_subpage_voting_allowed(
        &self,
        hostname: &str,
    ) -> Result<bool, SubpagePolicyRepositoryError>;
}

/// Fixture that treats every domain as whole-domain voting.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSubpagePolicyRepository;

#[async_trait]
impl SubpagePolicyRepository for FixtureSubpagePolicyRepository {
    async fn is_subpage_voting_allowed(
        &self,
        _hostname: &str,
    ) -> Result<bool, SubpagePolicyRepositoryError> {
        Ok(false)
    }
}
