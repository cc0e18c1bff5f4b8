//! Port for lazily materialising domain and votable-entity rows.

use async_trait::async_trait;

use crate::domain::VotableEntity;

use super::define_port_error;

define_port_error! {
    /// Errors raised by entity catalogue adapters.
    pub enum EntityCatalogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "entity catalogue connection failed: {message}",
        /// Query or insert failed during execution.
        Query { message: String } =>
            "entity catalogue query failed: {message}",
    }
}

/// Get-or-create access to votable entities.
///
/// # Contract
///
/// - The effective key is `(hostname, path)` when `subpage_allowed` is true and
///   `(hostname, None)` otherwise.
/// - A missing `domains` row is created first; a missing entity is inserted
///   with zero counters, `voting_allowed = true` and
///   `allow_subpage_voting = false`, then read back.
/// - Concurrent first accesses for the same key must converge on one row. A
///   lost insert race is "already exists", never an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityCatalogRepository: Send + Sync {
    /// Return the entity for the effective key, creating rows as needed.
    async fn get_or_create_entity(
        &self,
        hostname: &str,
        path: Option<String>,
        subpage_allowed: bool,
    ) -> Result<VotableEntity, EntityCatalogRepositoryError>;
}

/// Effective path under the subpage policy.
///
/// # Examples
/// ```
/// use factcheck::domain::ports::effective_path;
///
/// assert_eq!(effective_path(Some("a".to_owned()), false), None);
/// assert_eq!(effective_path(Some("a".to_owned()), true).as_deref(), Some("a"));
/// ```
pub fn effective_path(path: Option<String>, subpage_allowed: bool) -> Option<String> {
    path.filter(|_| subpage_allowed)
}

/// Fixture returning a fresh zero-tally entity for every key.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEntityCatalogRepository;

#[async_trait]
impl EntityCatalogRepository for FixtureEntityCatalogRepository {
    async fn get_or_create_entity(
        &self,
        _hostname: &str,
        path: Option<String>,
        subpage_allowed: bool,
    ) -> Result<VotableEntity, EntityCatalogRepositoryError> {
        Ok(VotableEntity {
            entity_id: 1,
            domain_id: 1,
            path: effective_path(path, subpage_allowed),
            upvotes: 0,
            downvotes: 0,
            voting_allowed: true,
            allow_subpage_voting: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("a"), false, None)]
    #[case(Some("a"), true, Some("a"))]
    #[case(None, true, None)]
    fn effective_path_follows_policy(
        #[case] path: Option<&str>,
        #[case] allowed: bool,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(
            effective_path(path.map(str::to_owned), allowed).as_deref(),
            expected
        );
    }

    #[tokio::test]
    async fn fixture_rolls_paths_up_when_subpages_disallowed() {
        let entity = FixtureEntityCatalogRepository
            .get_or_create_entity("example.com", Some("a".to_owned()), false)
            .await
            .expect("fixture succeeds");
        assert!(entity.path.is_none());
        assert_eq!((entity.upvotes, entity.downvotes), (0, 0));
    }
}
