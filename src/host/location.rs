//! Locations and route keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed location: pathname, query and fragment.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Always starts with `/`.
    pub pathname: String,
    /// Empty or starting with `?`.
    pub search: String,
    /// Empty or starting with `#`.
    pub hash: String,
}

impl Location {
    /// Parse an href such as `/experience?tab=2#taarcom`.
    ///
    /// An empty or relative pathname is rooted at `/`.
    pub fn parse(href: &str) -> Self {
        let (rest, hash) = match href.find('#') {
            Some(i) => (&href[..i], &href[i..]),
            None => (href, ""),
        };
        let (path, search) = match rest.find('?') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, ""),
        };
        let pathname = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        Self {
            pathname,
            search: search.to_string(),
            hash: hash.to_string(),
        }
    }

    /// Route identity: pathname plus search, fragment excluded.
    pub fn route_key(&self) -> RouteKey {
        RouteKey(format!("{}{}", self.pathname, self.search))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.pathname, self.search, self.hash)
    }
}

/// Pathname plus search. Two locations that differ only in their fragment
/// share a route key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteKey(String);

impl RouteKey {
    /// Build a key from an href; any fragment is dropped.
    pub fn new(href: &str) -> Self {
        Location::parse(href).route_key()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First pathname segment (`"about"` for `/about/team?x=1`, `""` for `/`).
    pub fn section(&self) -> &str {
        let path = self.0.split('?').next().unwrap_or("");
        path.trim_start_matches('/').split('/').next().unwrap_or("")
    }
}

impl From<&str> for RouteKey {
    fn from(href: &str) -> Self {
        Self::new(href)
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
