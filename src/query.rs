//! Author queries.
//!
//! A seed can be given either as a display name or as something that already
//! carries the provider identifier: a profile URL such as
//! `https://dblp.org/pid/232/1606.html`, or a `pid:232/1606` shorthand.

use std::fmt;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::types::AuthorId;

/// Error for unusable query strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Blank input.
    #[error("empty author query")]
    Empty,
    /// A URL with no recognizable profile identifier.
    #[error("URL does not point to an author profile: {0}")]
    UnrecognizedUrl(String),
}

/// A request to a profile provider.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorQuery {
    /// Look up by provider identifier.
    Id(AuthorId),
    /// Look up by display name (whitespace collapsed).
    Name(String),
}

fn pid_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"/pid/([^?#]+?)(?:\.(?:html|xml|bib|rss))?(?:[?#].*)?$").unwrap()
    })
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Collapse runs of whitespace and trim.
pub fn collapse_whitespace(s: &str) -> String {
    whitespace_regex().replace_all(s.trim(), " ").into_owned()
}

/// Normalize a display name for matching: collapsed whitespace, lowercase.
pub fn normalize_name(s: &str) -> String {
    collapse_whitespace(s).to_lowercase()
}

impl AuthorQuery {
    /// Parse user input into a query.
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(QueryError::Empty);
        }

        if let Some(pid) = input.strip_prefix("pid:") {
            let pid = pid.trim();
            if pid.is_empty() {
                return Err(QueryError::Empty);
            }
            return Ok(Self::Id(AuthorId::new(pid)));
        }

        if input.starts_with("http://") || input.starts_with("https://") {
            return pid_url_regex()
                .captures(input)
                .and_then(|caps| caps.get(1))
                .map(|m| Self::Id(AuthorId::new(m.as_str())))
                .ok_or_else(|| QueryError::UnrecognizedUrl(input.to_string()));
        }

        Ok(Self::Name(collapse_whitespace(input)))
    }

    /// The identifier, for id queries.
    pub fn as_id(&self) -> Option<&AuthorId> {
        match self {
            Self::Id(id) => Some(id),
            Self::Name(_) => None,
        }
    }
}

impl fmt::Display for AuthorQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "pid:{}", id),
            Self::Name(name) => write!(f, "{}", name),
        }
    }
}
