//! Opaque identity of an authenticated voter.
//!
//! Identities are issued by the external login flow; the vote ledger only
//! ever receives them as explicit parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserIdValidationError {
    /// Identifiers are database keys and must be strictly positive.
    #[error("user id must be a positive integer, got {0}")]
    NotPositive(i64),
}

/// Stable user identifier.
///
/// # Examples
/// ```
/// use factcheck::domain::UserId;
///
/// let id = UserId::new(42).expect("positive id");
/// assert_eq!(id.get(), 42);
/// assert!(UserId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Validate and wrap a raw identifier.
    pub fn new(raw: i64) -> Result<Self, UserIdValidationError> {
        if raw <= 0 {
            return Err(UserIdValidationError::NotPositive(raw));
        }
        Ok(Self(raw))
    }

    /// The raw identifier as stored in `user_votes.user_id`.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserIdValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
