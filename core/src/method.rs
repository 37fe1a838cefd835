//! HTTP methods and the per-node handler table.
//!
//! Verbs are a closed enum rather than strings: the router keys handler
//! storage by verb, and a typo'd method should fail at the boundary where
//! the string enters, not silently never match.

use crate::RouterError;
use std::fmt;
use std::str::FromStr;

/// An HTTP request method.
///
/// The wildcard ("any method") is not a variant; it is expressed at
/// registration time via [`Router::add_any`](crate::Router::add_any) and in
/// config files as the string `ANY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "UPPERCASE")
)]
pub enum Method {
    /// `CONNECT`
    Connect,
    /// `DELETE`
    Delete,
    /// `GET`
    Get,
    /// `HEAD`
    Head,
    /// `OPTIONS`
    Options,
    /// `PATCH`
    Patch,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `TRACE`
    Trace,
}

impl Method {
    /// All methods, in `Allow`-header order.
    pub const ALL: [Method; 9] = [
        Method::Connect,
        Method::Delete,
        Method::Get,
        Method::Head,
        Method::Options,
        Method::Patch,
        Method::Post,
        Method::Put,
        Method::Trace,
    ];

    /// The canonical wire form of this method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Delete => "DELETE",
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = RouterError;

    /// Parses the canonical uppercase wire form. HTTP methods are
    /// case-sensitive, so `get` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONNECT" => Ok(Self::Connect),
            "DELETE" => Ok(Self::Delete),
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            "PATCH" => Ok(Self::Patch),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "TRACE" => Ok(Self::Trace),
            _ => Err(RouterError::InvalidMethod {
                method: s.to_string(),
            }),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Per-node handler table
// ═══════════════════════════════════════════════════════════════════════════════

/// Handler storage at one trie node: per-verb entries plus an optional
/// method-agnostic fallback.
///
/// A node rarely carries more than a couple of verbs, so entries live in a
/// small vector scanned linearly rather than a hash map per node.
#[derive(Debug, Clone)]
pub(crate) struct MethodTable<H> {
    entries: Vec<(Method, H)>,
    any: Option<H>,
}

impl<H> MethodTable<H> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            any: None,
        }
    }

    /// Registers `handler` under `method`, or as the `Any` fallback when
    /// `method` is `None`. Re-registration overwrites: last write wins.
    pub(crate) fn insert(&mut self, method: Option<Method>, handler: H) {
        match method {
            None => self.any = Some(handler),
            Some(m) => {
                if let Some(entry) = self.entries.iter_mut().find(|(em, _)| *em == m) {
                    entry.1 = handler;
                } else {
                    self.entries.push((m, handler));
                }
            }
        }
    }

    /// The handler servicing `method`: the verb entry if present, else the
    /// `Any` fallback.
    pub(crate) fn get(&self, method: Method) -> Option<&H> {
        self.entries
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, h)| h)
            .or(self.any.as_ref())
    }

    /// Whether any handler (verb or fallback) is registered here.
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.any.is_none()
    }

    /// Verbs this node can service, sorted, for a 405 `Allow` listing.
    ///
    /// When an `Any` fallback is registered every verb is serviceable, but
    /// then [`get`](Self::get) never misses and no 405 arises, so this only
    /// reports explicit entries.
    pub(crate) fn allowed(&self) -> Vec<Method> {
        let mut verbs: Vec<Method> = self.entries.iter().map(|(m, _)| *m).collect();
        verbs.sort_unstable();
        verbs
    }
}
