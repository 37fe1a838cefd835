//! `Router` — the public facade over the trie.
//!
//! Construction and serving are separate phases: every [`Router::add`]
//! completes before the first [`Router::find`], after which the router is
//! read-only and freely shared across request workers. Embedders that want
//! live route mutation wrap the whole router in their own reader–writer
//! discipline; the router itself carries no interior mutability.

use crate::binding::{BindingSink, RouteBindings};
use crate::method::Method;
use crate::pattern::RoutePattern;
use crate::trace::LookupTrace;
use crate::tree::{Captures, Node};
use crate::RouterError;
use std::fmt;

/// The result of resolving `(method, path)`.
///
/// The two misses are ordinary values, not errors: `NotFound` means no
/// registered pattern matches the path's shape, `MethodNotAllowed` means
/// the path matched a route that does not serve this verb. The caller maps
/// them to 404 / 405; the router never decides status codes.
#[derive(Debug)]
pub enum RouteOutcome<'r, H> {
    /// A handler serves this method and path.
    Matched(&'r H),
    /// The path matched a registered route, but not for this method.
    MethodNotAllowed {
        /// Verbs the matched route does serve, sorted, for an `Allow`
        /// header.
        allowed: Vec<Method>,
    },
    /// No registered route matches the path.
    NotFound,
}

impl<'r, H> RouteOutcome<'r, H> {
    /// The matched handler, if any.
    #[must_use]
    pub fn handler(&self) -> Option<&'r H> {
        match self {
            Self::Matched(handler) => Some(handler),
            _ => None,
        }
    }

    /// `true` on a full match.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// `true` when the path exists under another verb.
    #[must_use]
    pub fn is_method_not_allowed(&self) -> bool {
        matches!(self, Self::MethodNotAllowed { .. })
    }

    /// `true` when nothing matched the path.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// One registered route, as listed by [`Router::routes`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteInfo {
    /// The verb, or `None` for a method-agnostic registration.
    pub method: Option<Method>,
    /// The normalized pattern string.
    pub pattern: String,
}

/// A radix-trie URL router storing opaque handlers of type `H`.
///
/// The router stores and returns handlers; it never invokes or inspects
/// them. `Router<H>` is `Send + Sync` whenever `H` is, and lookups are pure
/// reads, so a built router needs no locking however many requests resolve
/// against it concurrently.
pub struct Router<H> {
    root: Node<H>,
    routes: Vec<RouteInfo>,
    max_params: usize,
}

impl<H> Router<H> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            routes: Vec::new(),
            max_params: 0,
        }
    }

    /// Registers `handler` for `method` on `pattern`.
    ///
    /// `pattern` uses `:name` for a single-segment parameter and `*name`
    /// for a trailing catch-all. Re-registering the same `(method,
    /// pattern)` overwrites the previous handler.
    ///
    /// # Errors
    ///
    /// Rejects malformed patterns ([`RouterError::EmptyParamName`],
    /// [`RouterError::CatchAllNotTerminal`], [`RouterError::TooManyParams`],
    /// [`RouterError::PatternTooLong`]) and parameter-name disagreements
    /// with already-registered routes
    /// ([`RouterError::ParamNameConflict`]). A failed call leaves routing
    /// behavior exactly as it was.
    pub fn add(&mut self, method: Method, pattern: &str, handler: H) -> Result<(), RouterError> {
        self.add_inner(Some(method), pattern, handler)
    }

    /// Registers `handler` for every method on `pattern`.
    ///
    /// Per-verb registrations on the same pattern take precedence over this
    /// fallback.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Router::add`].
    pub fn add_any(&mut self, pattern: &str, handler: H) -> Result<(), RouterError> {
        self.add_inner(None, pattern, handler)
    }

    fn add_inner(
        &mut self,
        method: Option<Method>,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouterError> {
        let parsed = RoutePattern::parse(pattern)?;
        self.root.insert_pattern(&parsed, method, handler)?;

        self.max_params = self.max_params.max(parsed.param_count());
        let info = RouteInfo {
            method,
            pattern: parsed.raw().to_string(),
        };
        if !self.routes.contains(&info) {
            self.routes.push(info);
        }
        Ok(())
    }

    /// Resolves `(method, path)`, writing parameter bindings and the
    /// matched pattern into `sink` on a full match.
    ///
    /// The sink is `reset` unconditionally, written only on
    /// [`RouteOutcome::Matched`], and never past its capacity. An empty
    /// path resolves as `/`. Matching is strict about trailing slashes:
    /// `/a` and `/a/` are distinct.
    pub fn find<S>(&self, method: Method, path: &str, sink: &mut S) -> RouteOutcome<'_, H>
    where
        S: BindingSink + ?Sized,
    {
        sink.reset();
        let path = if path.is_empty() { "/" } else { path };

        let mut captures = Captures::new();
        let Some(node) = self.root.lookup(path, &mut captures) else {
            return RouteOutcome::NotFound;
        };

        match node.handler_for(method) {
            Some(handler) => {
                let capacity = sink.capacity();
                for (i, (name, value)) in captures.iter().enumerate() {
                    if i == capacity {
                        break;
                    }
                    sink.bind(name, value);
                }
                if let Some(pattern) = node.pattern() {
                    sink.set_matched_pattern(pattern);
                }
                RouteOutcome::Matched(handler)
            }
            None => RouteOutcome::MethodNotAllowed {
                allowed: node.allowed_methods(),
            },
        }
    }

    /// [`find`](Self::find), plus a full trace of the walk.
    ///
    /// The outcome is identical to `find` on the same input; the trace
    /// records every attempted edge including backtracked ones. Allocates —
    /// a debugging tool, not the request path.
    pub fn find_with_trace<S>(
        &self,
        method: Method,
        path: &str,
        sink: &mut S,
    ) -> (RouteOutcome<'_, H>, LookupTrace)
    where
        S: BindingSink + ?Sized,
    {
        sink.reset();
        let path = if path.is_empty() { "/" } else { path };

        let mut captures = Captures::new();
        let mut steps = Vec::new();
        let Some(node) = self.root.lookup_traced(path, &mut captures, &mut steps) else {
            return (
                RouteOutcome::NotFound,
                LookupTrace {
                    steps,
                    matched_pattern: None,
                },
            );
        };

        let trace = LookupTrace {
            steps,
            matched_pattern: node.pattern().map(str::to_string),
        };

        let outcome = match node.handler_for(method) {
            Some(handler) => {
                let capacity = sink.capacity();
                for (i, (name, value)) in captures.iter().enumerate() {
                    if i == capacity {
                        break;
                    }
                    sink.bind(name, value);
                }
                if let Some(pattern) = node.pattern() {
                    sink.set_matched_pattern(pattern);
                }
                RouteOutcome::Matched(handler)
            }
            None => RouteOutcome::MethodNotAllowed {
                allowed: node.allowed_methods(),
            },
        };
        (outcome, trace)
    }

    /// Registered routes, in first-registration order.
    #[must_use]
    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The largest parameter count across registered routes. Size binding
    /// sinks with this.
    #[must_use]
    pub fn max_params(&self) -> usize {
        self.max_params
    }

    /// A [`RouteBindings`] sized for this router's routes.
    #[must_use]
    pub fn bindings(&self) -> RouteBindings {
        RouteBindings::new(self.max_params)
    }

    /// Builds a concrete path from a registered pattern and parameter
    /// values in left-to-right order.
    ///
    /// Returns `None` if `pattern` is not registered or `values` does not
    /// supply exactly one value per parameter.
    ///
    /// ```
    /// # use ruta::{Method, Router};
    /// let mut router = Router::new();
    /// router.add(Method::Get, "/users/:uid/files/*rest", "h").unwrap();
    /// assert_eq!(
    ///     router.reverse("/users/:uid/files/*rest", &["7", "a/b.txt"]),
    ///     Some("/users/7/files/a/b.txt".to_string()),
    /// );
    /// ```
    #[must_use]
    pub fn reverse(&self, pattern: &str, values: &[&str]) -> Option<String> {
        let parsed = RoutePattern::parse(pattern).ok()?;
        if !self.routes.iter().any(|r| r.pattern == parsed.raw()) {
            return None;
        }
        parsed.fill(values)
    }
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for Router<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes.len())
            .field("max_params", &self.max_params)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_find() {
        let mut router = Router::new();
        router.add(Method::Get, "/items", "list").unwrap();

        let mut sink = router.bindings();
        assert_eq!(
            router.find(Method::Get, "/items", &mut sink).handler(),
            Some(&"list")
        );
        assert!(router.find(Method::Get, "/missing", &mut sink).is_not_found());
    }

    #[test]
    fn test_re_registration_overwrites() {
        let mut router = Router::new();
        router.add(Method::Get, "/x", "h1").unwrap();
        router.add(Method::Get, "/x", "h2").unwrap();

        let mut sink = router.bindings();
        assert_eq!(router.find(Method::Get, "/x", &mut sink).handler(), Some(&"h2"));
        // Still one route listed.
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn test_method_not_allowed_reports_allowed_verbs() {
        let mut router = Router::new();
        router.add(Method::Get, "/items", "get").unwrap();
        router.add(Method::Put, "/items", "put").unwrap();

        let mut sink = router.bindings();
        match router.find(Method::Post, "/items", &mut sink) {
            RouteOutcome::MethodNotAllowed { allowed } => {
                assert_eq!(allowed, vec![Method::Get, Method::Put]);
            }
            other => panic!("expected MethodNotAllowed, got {other:?}"),
        }
        // Nothing was written into the sink for a 405.
        assert!(sink.is_empty());
        assert_eq!(sink.matched_pattern(), None);
    }

    #[test]
    fn test_any_registration_serves_every_verb() {
        let mut router = Router::new();
        router.add_any("/health", "any").unwrap();
        router.add(Method::Post, "/health", "post").unwrap();

        let mut sink = router.bindings();
        assert_eq!(
            router.find(Method::Get, "/health", &mut sink).handler(),
            Some(&"any")
        );
        // The explicit verb wins over the fallback.
        assert_eq!(
            router.find(Method::Post, "/health", &mut sink).handler(),
            Some(&"post")
        );
    }

    #[test]
    fn test_empty_path_resolves_as_root() {
        let mut router = Router::new();
        router.add(Method::Get, "/", "root").unwrap();

        let mut sink = router.bindings();
        assert_eq!(router.find(Method::Get, "", &mut sink).handler(), Some(&"root"));
    }

    #[test]
    fn test_trailing_slash_is_strict() {
        let mut router = Router::new();
        router.add(Method::Get, "/a", "bare").unwrap();
        router.add(Method::Get, "/a/", "slashed").unwrap();

        let mut sink = router.bindings();
        assert_eq!(router.find(Method::Get, "/a", &mut sink).handler(), Some(&"bare"));
        assert_eq!(
            router.find(Method::Get, "/a/", &mut sink).handler(),
            Some(&"slashed")
        );
    }

    #[test]
    fn test_routes_listing() {
        let mut router = Router::new();
        router.add(Method::Get, "/a", 1).unwrap();
        router.add(Method::Post, "/a", 2).unwrap();
        router.add_any("/b", 3).unwrap();

        assert_eq!(
            router.routes(),
            &[
                RouteInfo {
                    method: Some(Method::Get),
                    pattern: "/a".into()
                },
                RouteInfo {
                    method: Some(Method::Post),
                    pattern: "/a".into()
                },
                RouteInfo {
                    method: None,
                    pattern: "/b".into()
                },
            ]
        );
    }

    #[test]
    fn test_reverse_unregistered_pattern_is_none() {
        let mut router = Router::new();
        router.add(Method::Get, "/users/:id", "h").unwrap();

        assert_eq!(router.reverse("/users/:id", &["9"]), Some("/users/9".into()));
        assert_eq!(router.reverse("/other/:id", &["9"]), None);
        assert_eq!(router.reverse("/users/:id", &[]), None);
    }

    #[test]
    fn test_bindings_sized_to_routes() {
        let mut router = Router::new();
        assert_eq!(router.bindings().capacity(), 0);
        router.add(Method::Get, "/a/:x/:y/:z", "h").unwrap();
        assert_eq!(router.max_params(), 3);
        assert_eq!(router.bindings().capacity(), 3);
    }

    #[test]
    fn test_failed_add_leaves_router_unchanged() {
        let mut router = Router::new();
        router.add(Method::Get, "/a/:id", "h1").unwrap();
        assert!(router.add(Method::Get, "/a/:name", "h2").is_err());

        assert_eq!(router.len(), 1);
        let mut sink = router.bindings();
        assert!(router.find(Method::Get, "/a/7", &mut sink).is_matched());
        assert_eq!(sink.get("id"), Some("7"));
        assert_eq!(sink.get("name"), None);
    }

    #[test]
    fn test_router_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Router<String>>();
    }
}
