//! Canonicalises URLs into `(registrable domain, first path segment)` keys.
//!
//! Resolution is pure string processing against the compiled-in public suffix
//! list: no DNS, no I/O, no shared state.
//!
//! ```text
//! https://www.example.co.uk/a/b/c?q=1  ->  ("example.co.uk", Some("a"))
//! https://example.com/%7Euser          ->  ("example.com", Some("~user"))
//! https://news.example                 ->  ("news.example", None)
//! http://example.com                   ->  UnsupportedScheme
//! ```

use std::borrow::Cow;

use url::{Host, Url};

const HTTPS_PREFIX: &str = "https://";

/// Reasons a URL cannot be turned into a votable key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The input does not start with `https://`.
    #[error("only https URLs are supported")]
    UnsupportedScheme,
    /// No registrable domain can be derived from the host.
    #[error("no registrable domain in `{input}`")]
    UnresolvableDomain { input: String },
}

impl ResolveError {
    /// Stable identifier reported in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedScheme => "unsupported_scheme",
            Self::UnresolvableDomain { .. } => "unresolvable_domain",
        }
    }

    fn unresolvable(input: &str) -> Self {
        Self::UnresolvableDomain {
            input: input.to_owned(),
        }
    }
}

/// Canonical key for a requested URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    /// Lower-cased registrable domain, e.g. `example.co.uk`.
    pub hostname: String,
    /// First path segment, percent-decoded, if the URL has a non-empty one.
    pub path: Option<String>,
}

/// Resolve `raw` into its registrable domain and first path segment.
///
/// # Errors
///
/// - [`ResolveError::UnsupportedScheme`] unless `raw` starts with `https://`
///   (compared case-insensitively); bare domains are rejected too.
/// - [`ResolveError::UnresolvableDomain`] when the URL is malformed, the host
///   is an IP literal, or the host is itself a public suffix.
///
/// # Examples
/// ```
/// use factcheck::domain::domain_resolver::{resolve, ResolveError};
///
/// let resolved = resolve("https://www.example.co.uk/a/b/c").expect("resolves");
/// assert_eq!(resolved.hostname, "example.co.uk");
/// assert_eq!(resolved.path.as_deref(), Some("a"));
///
/// assert_eq!(resolve("ftp://example.com"), Err(ResolveError::UnsupportedScheme));
/// ```
pub fn resolve(raw: &str) -> Result<ResolvedUrl, ResolveError> {
    let input = raw.trim();
    let has_https_prefix = input
        .get(..HTTPS_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(HTTPS_PREFIX));
    if !has_https_prefix {
        return Err(ResolveError::UnsupportedScheme);
    }

    let url = Url::parse(input).map_err(|_| ResolveError::unresolvable(input))?;
    let hostname = match url.host() {
        Some(Host::Domain(host)) => registrable_domain(host),
        _ => None,
    }
    .ok_or_else(|| ResolveError::unresolvable(input))?;

    let path = url
        .path_segments()
        .and_then(|mut segments| segments.next())
        .filter(|segment| !segment.is_empty())
        .map(decode_segment);

    Ok(ResolvedUrl { hostname, path })
}

/// Decode percent escapes so `%7Euser` and `~user` share one key. Escapes
/// that do not form valid UTF-8 are kept verbatim.
fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| segment.to_owned())
}

fn registrable_domain(host: &str) -> Option<String> {
    let host = host.strip_suffix('.').unwrap_or(host).to_ascii_lowercase();
    if host.is_empty() {
        return None;
    }
    psl::domain_str(&host).map(str::to_owned)
}
