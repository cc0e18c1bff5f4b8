//! PostgreSQL persistence adapters using Diesel.
//!
//! Adapters implement the vote ledger's driven ports on top of `diesel-async`
//! connections checked out from a `bb8` pool. Row structs and table
//! definitions stay private to this module; adapters return domain records.
//!
//! # Example
//!
//! ```no_run
//! use factcheck::outbound::persistence::{DbPool, DieselVoteLedgerRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/factcheck")).await?;
//! let ledger = DieselVoteLedgerRepository::new(pool);
//! # let _ = ledger;
//! # Ok(())
//! # }
//! ```

mod diesel_entity_catalog_repository;
mod diesel_error_mapping;
mod diesel_readiness_probe;
mod diesel_subpage_policy_repository;
mod diesel_vote_ledger_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_entity_catalog_repository::DieselEntityCatalogRepository;
pub use diesel_readiness_probe::DieselReadinessProbe;
pub use diesel_subpage_policy_repository::DieselSubpagePolicyRepository;
pub use diesel_vote_ledger_repository::DieselVoteLedgerRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
