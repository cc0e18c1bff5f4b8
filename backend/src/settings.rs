//! Service configuration loaded via OrthoConfig.
//!
//! Every field can be set with a `FACTCHECK_`-prefixed environment variable,
//! a command-line flag or a configuration file; accessors supply defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::http::session_config::{SESSION_KEY_DEFAULT_PATH, SessionToggles};
use crate::inbound::http::state::DEFAULT_LOGIN_URL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8085";
const DEFAULT_SAME_SITE: &str = "Strict";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// No database URL was supplied.
    #[error("FACTCHECK_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    /// The bind address is not a socket address.
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// A boolean setting holds something other than a recognised flag.
    #[error("invalid boolean for {name}: '{value}' (expected true/false, 1/0 or yes/no)")]
    InvalidBool { name: &'static str, value: String },
}

/// Top-level service settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FACTCHECK")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Path to the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`; parsed by [`AppSettings::session_toggles`].
    pub cookie_secure: Option<String>,
    /// `SameSite` policy for session cookies.
    pub same_site: Option<String>,
    /// Permit a generated session key when the key file is missing.
    pub allow_ephemeral_session_key: Option<String>,
    /// Redirect target for unauthenticated voters.
    pub login_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl AppSettings {
    /// Return the database URL or fail if unset.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Parse the bind address, falling back to `0.0.0.0:8085`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    pub fn login_url(&self) -> &str {
        self.login_url.as_deref().unwrap_or(DEFAULT_LOGIN_URL)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Session toggles for [`crate::inbound::http::session_config`].
    ///
    /// Cookies are `Secure` unless explicitly disabled.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBool`] when a flag cannot be parsed.
    pub fn session_toggles(&self) -> Result<SessionToggles, SettingsError> {
        let cookie_secure = flag(
            "FACTCHECK_COOKIE_SECURE",
            self.cookie_secure.as_deref(),
            true,
        )?;
        let allow_ephemeral = flag(
            "FACTCHECK_ALLOW_EPHEMERAL_SESSION_KEY",
            self.allow_ephemeral_session_key.as_deref(),
            false,
        )?;
        Ok(SessionToggles {
            key_file: self
                .session_key_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH)),
            cookie_secure,
            same_site: self
                .same_site
                .clone()
                .unwrap_or_else(|| DEFAULT_SAME_SITE.to_owned()),
            allow_ephemeral,
        })
    }
}

fn flag(name: &'static str, value: Option<&str>, default: bool) -> Result<bool, SettingsError> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Ok(true),
        "0" | "false" | "no" | "n" => Ok(false),
        _ => Err(SettingsError::InvalidBool {
            name,
            value: value.to_owned(),
        }),
    }
}
