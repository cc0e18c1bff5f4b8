//! Domain primitives, ports and services for the vote ledger.
//!
//! Keeps URL canonicalisation, vote semantics and error taxonomy free
//! of transport and storage concerns. Inbound adapters call the driving ports
//! in [`ports`]; outbound adapters implement the driven ones.
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: transport-agnostic error payload.
//! - [`TraceId`]: per-request correlation identifier.
//! - [`UserId`]: authenticated voter identity.
//! - [`VoteService`]: implements [`ports::TallyQuery`] and [`ports::VoteCommand`].

pub mod domain_resolver;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user_id;
pub mod vote_service;
pub mod votes;

pub use self::domain_resolver::{ResolveError, ResolvedUrl};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user_id::{UserId, UserIdValidationError};
pub use self::vote_service::VoteService;
pub use self::votes::{
    DomainRecord, InvalidDirection, Tally, TallySnapshot, UserVote, VotableEntity, VoteDirection,
    VoteOutcome,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use factcheck::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
