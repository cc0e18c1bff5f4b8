//! fact.check vote ledger service.
//!
//! Resolves URLs to their registrable domain, lazily materialises votable
//! entities and records at most one vote per user and entity.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use doc::ApiDoc;
pub use middleware::Trace;
