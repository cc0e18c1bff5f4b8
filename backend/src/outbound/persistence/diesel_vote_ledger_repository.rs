//! PostgreSQL-backed vote ledger.
//!
//! `apply_vote` increments the counter and records the vote inside one
//! transaction. The increment is a relative `UPDATE .. RETURNING`, so
//! concurrent votes serialise on the entity row lock and none is lost. A
//! `user_votes` primary-key violation rolls the increment back.
//!
//! A repeat vote is reported as a duplicate even after voting has closed on
//! the entity; only first-time voters see `VotingClosed`.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{LedgerOutcome, VoteLedgerRepository, VoteLedgerRepositoryError};
use crate::domain::{Tally, UserId, UserVote, VoteDirection};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{UserVoteRow, tally_from_columns};
use super::pool::{DbPool, PoolError};
use super::schema::{user_votes, votable_domains};

/// Diesel implementation of [`VoteLedgerRepository`].
#[derive(Clone)]
pub struct DieselVoteLedgerRepository {
    pool: DbPool,
}

impl DieselVoteLedgerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Reasons the vote transaction was rolled back.
#[derive(Debug)]
enum VoteTxError {
    /// `user_votes` already holds a row for this user and entity.
    AlreadyVoted,
    /// The guarded increment matched no row.
    NotIncremented,
    Diesel(DieselError),
}

impl From<DieselError> for VoteTxError {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

fn map_pool(error: PoolError) -> VoteLedgerRepositoryError {
    map_pool_error(error, VoteLedgerRepositoryError::connection)
}

fn map_diesel(error: DieselError) -> VoteLedgerRepositoryError {
    map_diesel_error(
        error,
        VoteLedgerRepositoryError::query,
        VoteLedgerRepositoryError::connection,
    )
}

fn to_tally((upvotes, downvotes): (i64, i64)) -> Result<Tally, VoteLedgerRepositoryError> {
    tally_from_columns(upvotes, downvotes).map_err(VoteLedgerRepositoryError::query)
}

fn map_vote_insert_error(error: DieselError) -> VoteTxError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            VoteTxError::AlreadyVoted
        }
        other => VoteTxError::Diesel(other),
    }
}

async fn increment(
    conn: &mut AsyncPgConnection,
    entity_id: i64,
    direction: VoteDirection,
) -> Result<Option<(i64, i64)>, DieselError> {
    use votable_domains::dsl;

    let target = votable_domains::table
        .filter(dsl::entity_id.eq(entity_id))
        .filter(dsl::voting_allowed.eq(true));
    let counters = (dsl::upvotes, dsl::downvotes);

    let updated = match direction {
        VoteDirection::Up => {
            diesel::update(target)
                .set(dsl::upvotes.eq(dsl::upvotes + 1_i64))
                .returning(counters)
                .get_result(conn)
                .await
        }
        VoteDirection::Down => {
            diesel::update(target)
                .set(dsl::downvotes.eq(dsl::downvotes + 1_i64))
                .returning(counters)
                .get_result(conn)
                .await
        }
    };
    updated.optional()
}

async fn read_entity_state(
    conn: &mut AsyncPgConnection,
    entity_id: i64,
) -> Result<Option<(i64, i64, bool)>, VoteLedgerRepositoryError> {
    votable_domains::table
        .filter(votable_domains::entity_id.eq(entity_id))
        .select((
            votable_domains::upvotes,
            votable_domains::downvotes,
            votable_domains::voting_allowed,
        ))
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel)
}

async fn has_voted(
    conn: &mut AsyncPgConnection,
    user_id: UserId,
    entity_id: i64,
) -> Result<bool, VoteLedgerRepositoryError> {
    diesel::select(exists(
        user_votes::table
            .filter(user_votes::user_id.eq(user_id.get()))
            .filter(user_votes::entity_id.eq(entity_id)),
    ))
    .get_result::<bool>(conn)
    .await
    .map_err(map_diesel)
}

#[async_trait]
impl VoteLedgerRepository for DieselVoteLedgerRepository {
    async fn apply_vote(
        &self,
        user_id: UserId,
        entity_id: i64,
        direction: VoteDirection,
    ) -> Result<LedgerOutcome, VoteLedgerRepositoryError> {
        let vote = UserVoteRow::from(UserVote {
            user_id,
            entity_id,
            vote_value: direction.vote_value(),
        });
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let result: Result<(i64, i64), VoteTxError> = conn
            .transaction(|conn| {
                async move {
                    let counters = increment(conn, entity_id, direction)
                        .await?
                        .ok_or(VoteTxError::NotIncremented)?;

                    diesel::insert_into(user_votes::table)
                        .values(&vote)
                        .execute(conn)
                        .await
                        .map_err(map_vote_insert_error)?;

                    Ok::<_, VoteTxError>(counters)
                }
                .scope_boxed()
            })
            .await;

        match result {
            Ok(counters) => Ok(LedgerOutcome::Recorded(to_tally(counters)?)),
            Err(VoteTxError::AlreadyVoted) => {
                debug!(user_id = %user_id, entity_id, "vote already recorded; rolled back");
                let (upvotes, downvotes, _) = read_entity_state(&mut conn, entity_id)
                    .await?
                    .ok_or_else(|| VoteLedgerRepositoryError::entity_missing(entity_id))?;
                Ok(LedgerOutcome::Duplicate(to_tally((upvotes, downvotes))?))
            }
            Err(VoteTxError::NotIncremented) => {
                match read_entity_state(&mut conn, entity_id).await? {
                    None => Err(VoteLedgerRepositoryError::entity_missing(entity_id)),
                    Some((upvotes, downvotes, false)) => {
                        if has_voted(&mut conn, user_id, entity_id).await? {
                            debug!(user_id = %user_id, entity_id, "repeat vote on closed entity");
                            Ok(LedgerOutcome::Duplicate(to_tally((upvotes, downvotes))?))
                        } else {
                            Err(VoteLedgerRepositoryError::voting_closed(entity_id))
                        }
                    }
                    Some((_, _, true)) => Err(VoteLedgerRepositoryError::query(
                        "entity reopened while vote was in flight",
                    )),
                }
            }
            Err(VoteTxError::Diesel(error)) => Err(map_diesel(error)),
        }
    }
}
