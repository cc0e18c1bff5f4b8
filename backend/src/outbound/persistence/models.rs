//! Internal Diesel row structs for the vote ledger tables.
//!
//! These types never leave the persistence layer; adapters convert them into
//! domain records before returning.

use diesel::prelude::*;

use crate::domain::{DomainRecord, Tally, UserVote, VotableEntity};

use super::schema::{domains, user_votes, votable_domains};

/// Row struct for reading from the domains table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = domains)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DomainRow {
    pub id: i64,
    pub name: String,
}

impl From<DomainRow> for DomainRecord {
    fn from(row: DomainRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

/// Insertable struct for registering a domain.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = domains)]
pub(crate) struct NewDomainRow<'a> {
    pub name: &'a str,
}

/// Row struct for reading from the votable_domains table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = votable_domains)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VotableEntityRow {
    pub entity_id: i64,
    pub domain_id: i64,
    pub path: Option<String>,
    pub upvotes: i64,
    pub downvotes: i64,
    pub voting_allowed: bool,
    pub allow_subpage_voting: bool,
}

impl TryFrom<VotableEntityRow> for VotableEntity {
    type Error = String;

    fn try_from(row: VotableEntityRow) -> Result<Self, Self::Error> {
        let Tally { upvotes, downvotes } = tally_from_columns(row.upvotes, row.downvotes)?;
        Ok(Self {
            entity_id: row.entity_id,
            domain_id: row.domain_id,
            path: row.path,
            upvotes,
            downvotes,
            voting_allowed: row.voting_allowed,
            allow_subpage_voting: row.allow_subpage_voting,
        })
    }
}

/// Insertable struct for a fresh entity; counters and flags use column
/// defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = votable_domains)]
pub(crate) struct NewVotableEntityRow<'a> {
    pub domain_id: i64,
    pub path: Option<&'a str>,
}

/// Insertable struct for recording a vote.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_votes)]
pub(crate) struct UserVoteRow {
    pub user_id: i64,
    pub entity_id: i64,
    pub vote_value: bool,
}

impl From<UserVote> for UserVoteRow {
    fn from(vote: UserVote) -> Self {
        Self {
            user_id: vote.user_id.get(),
            entity_id: vote.entity_id,
            vote_value: vote.vote_value,
        }
    }
}

/// Convert the `(upvotes, downvotes)` column pair into a domain tally.
///
/// The columns carry `CHECK (>= 0)` constraints; a negative value means the
/// schema has drifted.
pub(crate) fn tally_from_columns(upvotes: i64, downvotes: i64) -> Result<Tally, String> {
    let upvotes =
        u64::try_from(upvotes).map_err(|_| format!("upvotes column is negative: {upvotes}"))?;
    let downvotes = u64::try_from(downvotes)
        .map_err(|_| format!("downvotes column is negative: {downvotes}"))?;
    Ok(Tally { upvotes, downvotes })
}
