//! Driving port for casting votes.

use async_trait::async_trait;

use crate::domain::domain_resolver::resolve;
use crate::domain::{Error, TallySnapshot, UserId, VoteDirection, VoteOutcome};

/// Request to cast one vote.
///
/// `direction` is the raw path segment; the service validates it before any
/// URL resolution or storage access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastVoteRequest {
    /// Authenticated voter.
    pub user_id: UserId,
    /// URL the vote targets, as supplied by the client.
    pub url: String,
    /// Requested direction, expected to be `up` or `down`.
    pub direction: String,
}

/// Domain use-case port for the `vote` flow.
///
/// A validated request yields either [`VoteOutcome::Recorded`] with the new
/// counters or [`VoteOutcome::Duplicate`] with the unchanged ones. Callers
/// must not retry a duplicate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteCommand: Send + Sync {
    /// Cast a vote.
    ///
    /// # Errors
    ///
    /// - `not_found` for an invalid direction or an unsupported URL.
    /// - `forbidden` when voting has been closed on the entity.
    /// - `service_unavailable` or `internal` for storage failures.
    async fn cast_vote(&self, request: CastVoteRequest) -> Result<VoteOutcome, Error>;
}

/// Fixture command that accepts every vote as the first one cast.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVoteCommand;

#[async_trait]
impl VoteCommand for FixtureVoteCommand {
    async fn cast_vote(&self, request: CastVoteRequest) -> Result<VoteOutcome, Error> {
        let direction: VoteDirection = request
            .direction
            .parse()
            .map_err(|_| Error::not_found("Site not found."))?;
        let resolved = resolve(&request.url)
            .map_err(|_| Error::not_found("Domain not supported."))?;
        let mut snapshot = TallySnapshot::empty(resolved.hostname, resolved.path);
        match direction {
            VoteDirection::Up => snapshot.upvotes = 1,
            VoteDirection::Down => snapshot.downvotes = 1,
        }
        Ok(VoteOutcome::Recorded(snapshot))
    }
}
