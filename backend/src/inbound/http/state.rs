//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and only see the driving
//! ports, so they stay testable without a database.

use std::sync::Arc;

use crate::domain::ports::{FixtureTallyQuery, FixtureVoteCommand, TallyQuery, VoteCommand};

/// Default target for unauthenticated vote requests.
pub const DEFAULT_LOGIN_URL: &str = "/login";

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub tally: Arc<dyn TallyQuery>,
    pub votes: Arc<dyn VoteCommand>,
    /// Where unauthenticated voters are redirected.
    pub login_url: String,
}

impl HttpState {
    /// Construct state from the two driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use factcheck::domain::ports::{FixtureTallyQuery, FixtureVoteCommand};
    /// use factcheck::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(Arc::new(FixtureTallyQuery), Arc::new(FixtureVoteCommand))
    ///     .with_login_url("/auth/login");
    /// assert_eq!(state.login_url, "/auth/login");
    /// ```
    pub fn new(tally: Arc<dyn TallyQuery>, votes: Arc<dyn VoteCommand>) -> Self {
        Self {
            tally,
            votes,
            login_url: DEFAULT_LOGIN_URL.to_owned(),
        }
    }

    /// Override the login redirect target.
    #[must_use]
    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = login_url.into();
        self
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(Arc::new(FixtureTallyQuery), Arc::new(FixtureVoteCommand))
    }
}
