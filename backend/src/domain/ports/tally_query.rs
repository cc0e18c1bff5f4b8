//! Driving port for reading the tally behind a URL.
//!
//! Inbound adapters hand over the raw `url` query parameter; resolution,
//! lazy entity creation and subpage roll-up all happen behind this port.

use async_trait::async_trait;

use crate::domain::domain_resolver::resolve;
use crate::domain::{Error, TallySnapshot};

/// Domain use-case port for the `get-votes` flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TallyQuery: Send + Sync {
    /// Return the counters for `url`, creating a zeroed entity on first sight.
    ///
    /// # Errors
    ///
    /// - `not_found` when the URL is not https or has no registrable domain.
    /// - `service_unavailable` when storage cannot be reached.
    /// - `internal` for any other storage failure.
    async fn tally(&self, url: &str) -> Result<TallySnapshot, Error>;
}

/// Fixture query reporting zero votes for every URL.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTallyQuery;

#[async_trait]
impl TallyQuery for FixtureTallyQuery {
    async fn tally(&self, url: &str) -> Result<TallySnapshot, Error> {
        let resolved = resolve(url)
            .map_err(|_| Error::not_found("Domain not supported."))?;
        Ok(TallySnapshot::empty(resolved.hostname, resolved.path))
    }
}
