//! In-memory vote ledger for service and HTTP tests.
//!
//! [`InMemoryVoteStore`] implements all three driven ports behind one mutex so
//! it upholds the same guarantees as the Postgres adapters: one entity per
//! effective key, one vote per `(user, entity)`, counters equal to the number
//! of recorded votes in each direction.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    EntityCatalogRepository, EntityCatalogRepositoryError, LedgerOutcome,
    SubpagePolicyRepository, SubpagePolicyRepositoryError, VoteLedgerRepository,
    VoteLedgerRepositoryError, effective_path,
};
use crate::domain::{
    DomainRecord, Tally, UserId, UserVote, VotableEntity, VoteDirection, VoteService,
};

#[derive(Debug, Default)]
struct Ledger {
    domains: Vec<DomainRecord>,
    entities: Vec<VotableEntity>,
    votes: Vec<UserVote>,
    voters: HashSet<(i64, i64)>,
    by_key: HashMap<(i64, Option<String>), usize>,
}

impl Ledger {
    fn domain_id(&mut self, hostname: &str) -> i64 {
        if let Some(domain) = self.domains.iter().find(|d| d.name == hostname) {
            return domain.id;
        }
        let id = next_id(self.domains.len());
        self.domains.push(DomainRecord {
            id,
            name: hostname.to_owned(),
        });
        id
    }

    fn entity_mut(&mut self, entity_id: i64) -> Option<&mut VotableEntity> {
        self.entities.iter_mut().find(|e| e.entity_id == entity_id)
    }
}

fn next_id(len: usize) -> i64 {
    i64::try_from(len).map_or(i64::MAX, |n| n + 1)
}

/// Mutex-backed ledger shared by cloning.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVoteStore {
    inner: Arc<Mutex<Ledger>>,
}

/// Service wired to a single in-memory store.
pub type InMemoryVoteService = VoteService<InMemoryVoteStore, InMemoryVoteStore, InMemoryVoteStore>;

impl InMemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a [`VoteService`] whose three ports all share this store.
    pub fn service(&self) -> InMemoryVoteService {
        let shared = Arc::new(self.clone());
        VoteService::new(shared.clone(), shared.clone(), shared)
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        // A poisoned lock only means another test thread panicked.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Enable per-path tallies for `hostname`, creating its root entity.
    pub fn enable_subpage_voting(&self, hostname: &str) {
        let mut ledger = self.lock();
        let domain_id = ledger.domain_id(hostname);
        let key = (domain_id, None);
        if !ledger.by_key.contains_key(&key) {
            let index = ledger.entities.len();
            ledger.entities.push(VotableEntity {
                entity_id: next_id(index),
                domain_id,
                path: None,
                upvotes: 0,
                downvotes: 0,
                voting_allowed: true,
                allow_subpage_voting: false,
            });
            ledger.by_key.insert(key, index);
        }
        for entity in ledger.entities.iter_mut().filter(|e| e.domain_id == domain_id) {
            entity.allow_subpage_voting = true;
        }
    }

    /// Close an entity for voting.
    pub fn close_voting(&self, entity_id: i64) {
        if let Some(entity) = self.lock().entity_mut(entity_id) {
            entity.voting_allowed = false;
        }
    }

    /// Snapshot of every entity, in creation order.
    pub fn entities(&self) -> Vec<VotableEntity> {
        self.lock().entities.clone()
    }

    /// Snapshot of every recorded vote, in insertion order.
    pub fn votes(&self) -> Vec<UserVote> {
        self.lock().votes.clone()
    }
}

#[async_trait]
impl SubpagePolicyRepository for InMemoryVoteStore {
    async fn is_subpage_voting_allowed(
        &self,
        hostname: &str,
    ) -> Result<bool, SubpagePolicyRepositoryError> {
        let ledger = self.lock();
        let Some(domain) = ledger.domains.iter().find(|d| d.name == hostname) else {
            return Ok(false);
        };
        Ok(ledger
            .entities
            .iter()
            .any(|e| e.domain_id == domain.id && e.allow_subpage_voting))
    }
}

#[async_trait]
impl EntityCatalogRepository for InMemoryVoteStore {
    async fn get_or_create_entity(
        &self,
        hostname: &str,
        path: Option<String>,
        subpage_allowed: bool,
    ) -> Result<VotableEntity, EntityCatalogRepositoryError> {
        let mut ledger = self.lock();
        let domain_id = ledger.domain_id(hostname);
        let key = (domain_id, effective_path(path, subpage_allowed));
        if let Some(&index) = ledger.by_key.get(&key) {
            return Ok(ledger.entities[index].clone());
        }
        let index = ledger.entities.len();
        let entity = VotableEntity {
            entity_id: next_id(index),
            domain_id,
            path: key.1.clone(),
            upvotes: 0,
            downvotes: 0,
            voting_allowed: true,
            allow_subpage_voting: false,
        };
        ledger.entities.push(entity.clone());
        ledger.by_key.insert(key, index);
        Ok(entity)
    }
}

#[async_trait]
impl VoteLedgerRepository for InMemoryVoteStore {
    async fn apply_vote(
        &self,
        user_id: UserId,
        entity_id: i64,
        direction: VoteDirection,
    ) -> Result<LedgerOutcome, VoteLedgerRepositoryError> {
        let mut ledger = self.lock();
        let already_voted = ledger.voters.contains(&(user_id.get(), entity_id));
        let entity = ledger
            .entity_mut(entity_id)
            .ok_or_else(|| VoteLedgerRepositoryError::entity_missing(entity_id))?;

        if already_voted {
            return Ok(LedgerOutcome::Duplicate(Tally::from(&*entity)));
        }
        if !entity.voting_allowed {
            return Err(VoteLedgerRepositoryError::voting_closed(entity_id));
        }
        match direction {
            VoteDirection::Up => entity.upvotes += 1,
            VoteDirection::Down => entity.downvotes += 1,
        }
        let tally = Tally::from(&*entity);
        ledger.voters.insert((user_id.get(), entity_id));
        ledger.votes.push(UserVote {
            user_id,
            entity_id,
            vote_value: direction.vote_value(),
        });
        Ok(LedgerOutcome::Recorded(tally))
    }
}
