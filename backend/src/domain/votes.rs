//! Vote ledger domain model.
//!
//! Records here mirror the three persisted tables (`domains`,
//! `votable_domains`, `user_votes`) and are built by adapters at the storage
//! boundary. Tallies returned to clients are [`TallySnapshot`]s.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::UserId;

/// Direction of a single vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteDirection {
    /// Counts towards `upvotes`.
    Up,
    /// Counts towards `downvotes`.
    Down,
}

/// Raised when a direction segment is neither `up` nor `down`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("vote direction must be `up` or `down`, got `{value}`")]
pub struct InvalidDirection {
    /// The rejected input.
    pub value: String,
}

impl VoteDirection {
    /// Path segment form used by the HTTP surface.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// Persisted `user_votes.vote_value`: `true` for up.
    pub fn vote_value(self) -> bool {
        matches!(self, Self::Up)
    }
}

impl FromStr for VoteDirection {
    type Err = InvalidDirection;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(InvalidDirection {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registrable domain row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRecord {
    pub id: i64,
    /// Lower-cased registrable domain, unique across rows.
    pub name: String,
}

/// One countable unit: a whole domain (`path == None`) or one first-level
/// path beneath it.
///
/// `allow_subpage_voting` is domain-scoped; it is carried on whichever entity
/// row exists for the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotableEntity {
    pub entity_id: i64,
    pub domain_id: i64,
    pub path: Option<String>,
    pub upvotes: u64,
    pub downvotes: u64,
    pub voting_allowed: bool,
    pub allow_subpage_voting: bool,
}

/// A recorded vote. At most one exists per `(user_id, entity_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserVote {
    pub user_id: UserId,
    pub entity_id: i64,
    pub vote_value: bool,
}

/// Counter pair read from an entity row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub upvotes: u64,
    pub downvotes: u64,
}

impl From<&VotableEntity> for Tally {
    fn from(entity: &VotableEntity) -> Self {
        Self {
            upvotes: entity.upvotes,
            downvotes: entity.downvotes,
        }
    }
}

type TallyTuple = (String, Option<String>, u64, u64);

/// Client-facing tally for a requested URL.
///
/// Serialises as the JSON array `[domain, path, upvotes, downvotes]`. The
/// `path` is the requested first path segment even when the counters belong
/// to the domain-level entity.
///
/// # Examples
/// ```
/// use factcheck::domain::TallySnapshot;
///
/// let snapshot = TallySnapshot::empty("news.example", Some("world".to_owned()));
/// let json = serde_json::to_string(&snapshot).expect("serialise");
/// assert_eq!(json, r#"["news.example","world",0,0]"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TallyTuple", from = "TallyTuple")]
pub struct TallySnapshot {
    pub domain: String,
    pub path: Option<String>,
    pub upvotes: u64,
    pub downvotes: u64,
}

impl TallySnapshot {
    /// Build a snapshot from a resolved key and counters.
    pub fn new(domain: impl Into<String>, path: Option<String>, tally: Tally) -> Self {
        Self {
            domain: domain.into(),
            path,
            upvotes: tally.upvotes,
            downvotes: tally.downvotes,
        }
    }

    /// Zero tallies for a freshly materialised entity.
    pub fn empty(domain: impl Into<String>, path: Option<String>) -> Self {
        Self::new(domain, path, Tally::default())
    }
}

impl From<TallySnapshot> for TallyTuple {
    fn from(value: TallySnapshot) -> Self {
        (value.domain, value.path, value.upvotes, value.downvotes)
    }
}

impl From<TallyTuple> for TallySnapshot {
    fn from((domain, path, upvotes, downvotes): TallyTuple) -> Self {
        Self {
            domain,
            path,
            upvotes,
            downvotes,
        }
    }
}

/// Result of a vote request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The vote was counted; the snapshot holds the new counters.
    Recorded(TallySnapshot),
    /// The user had already voted on this entity; counters are unchanged.
    Duplicate(TallySnapshot),
}

impl VoteOutcome {
    /// Counters to return to the caller regardless of outcome.
    pub fn snapshot(&self) -> &TallySnapshot {
        match self {
            Self::Recorded(snapshot) | Self::Duplicate(snapshot) => snapshot,
        }
    }

    /// True when the ledger rejected a repeat vote.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }

    /// Stable label used in response headers and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Recorded(_) => "recorded",
            Self::Duplicate(_) => "duplicate",
        }
    }
}
