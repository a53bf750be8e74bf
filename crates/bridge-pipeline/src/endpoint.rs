//! Endpoint classification from request paths.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Legacy handler a request is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Select,
    Update,
    Admin,
    Schema,
    Config,
    Unknown,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Select => "select",
            Endpoint::Update => "update",
            Endpoint::Admin => "admin",
            Endpoint::Schema => "schema",
            Endpoint::Config => "config",
            Endpoint::Unknown => "unknown",
        }
    }

    /// Classify a path (no query string). First matching pattern wins.
    pub fn classify(path: &str) -> Endpoint {
        ENDPOINT_PATTERNS
            .iter()
            .find(|(pattern, _)| pattern.is_match(path))
            .map(|(_, endpoint)| *endpoint)
            .unwrap_or(Endpoint::Unknown)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered classification table
static ENDPOINT_PATTERNS: Lazy<Vec<(Regex, Endpoint)>> = Lazy::new(|| {
    [
        (r"^/solr/[^/]+/select/?$", Endpoint::Select),
        (r"^/solr/[^/]+/update(/.*)?$", Endpoint::Update),
        (r"^/solr/admin(/.*)?$", Endpoint::Admin),
        (r"^/solr/[^/]+/admin(/.*)?$", Endpoint::Admin),
        (r"^/solr/[^/]+/schema(/.*)?$", Endpoint::Schema),
        (r"^/solr/[^/]+/config(/.*)?$", Endpoint::Config),
    ]
    .into_iter()
    .map(|(pattern, endpoint)| (Regex::new(pattern).unwrap(), endpoint))
    .collect()
});

/// Collection segment of a path
static COLLECTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/solr/([^/]+)/").unwrap());

/// Collection (core) name addressed by a path, if any.
pub fn collection(path: &str) -> Option<String> {
    COLLECTION_RE
        .captures(path)
        .map(|caps| caps[1].to_string())
        .filter(|name| name != "admin")
}
