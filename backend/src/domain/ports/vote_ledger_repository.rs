//! Port for the atomic vote-recording operation.

use async_trait::async_trait;

use crate::domain::{Tally, UserId, VoteDirection};

use super::define_port_error;

define_port_error! {
    /// Errors raised by vote ledger adapters.
    pub enum VoteLedgerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "vote ledger connection failed: {message}",
        /// Query failed during execution; the transaction was rolled back.
        Query { message: String } =>
            "vote ledger query failed: {message}",
        /// The entity row vanished between lookup and vote.
        EntityMissing { entity_id: i64 } =>
            "votable entity {entity_id} does not exist",
        /// The entity exists but its `voting_allowed` flag is off.
        VotingClosed { entity_id: i64 } =>
            "voting is closed for entity {entity_id}",
    }
}

/// What the ledger did with a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOutcome {
    /// Counter incremented and vote row inserted in one transaction.
    Recorded(Tally),
    /// A vote by this user already existed; nothing changed.
    Duplicate(Tally),
}

/// Atomic vote recording.
///
/// # Contract
///
/// `apply_vote` performs, as one all-or-nothing unit:
///
/// 1. increment `upvotes` or `downvotes` of `entity_id` by exactly one and
///    read back both counters;
/// 2. insert `(user_id, entity_id, direction.vote_value())`.
///
/// When step 2 hits the `(user_id, entity_id)` uniqueness rule the whole unit
/// is undone and [`LedgerOutcome::Duplicate`] carries the unchanged counters.
/// Concurrent calls on one entity never lose increments: counters are
/// modified with a relative update, never read-modify-write in the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteLedgerRepository: Send + Sync {
    /// Record one vote by `user_id` on `entity_id`.
    async fn apply_vote(
        &self,
        user_id: UserId,
        entity_id: i64,
        direction: VoteDirection,
    ) -> Result<LedgerOutcome, VoteLedgerRepositoryError>;
}

/// Fixture that records every vote against a zeroed entity.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVoteLedgerRepository;

#[async_trait]
impl VoteLedgerRepository for FixtureVoteLedgerRepository {
    async fn apply_vote(
        &self,
        _user_id: UserId,
        _entity_id: i64,
        direction: VoteDirection,
    ) -> Result<LedgerOutcome, VoteLedgerRepositoryError> {
        let tally = match direction {
            VoteDirection::Up => Tally {
                upvotes: 1,
                downvotes: 0,
            },
            VoteDirection::Down => Tally {
                upvotes: 0,
                downvotes: 1,
            },
        };
        Ok(LedgerOutcome::Recorded(tally))
    }
}
