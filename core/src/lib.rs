//! ruta - radix-trie URL router
//!
//! A routing engine mapping `(method, path)` to a registered handler,
//! extracting `:name` path parameters and `*name` catch-alls along the way.
//!
//! # Architecture
//!
//! - [`Router<H>`] — public facade; build with [`Router::add`], resolve with
//!   [`Router::find`]. Handlers are opaque: the router stores and returns
//!   them, never invokes or inspects them.
//! - [`Method`] — HTTP verb; each trie node carries a per-verb handler table
//!   plus an optional method-agnostic fallback ([`Router::add_any`]).
//! - [`BindingSink`] — the per-request contract lookup writes into: ordered
//!   parameter bindings and the matched pattern. [`RouteBindings`] is the
//!   provided fixed-capacity, poolable implementation.
//! - [`RouteOutcome`] — matched / method-not-allowed / not-found. The two
//!   misses are ordinary values, not errors: the caller decides 404 vs 405.
//!
//! # Key Design Decisions
//!
//! 1. **Precedence is total**: static > param > catch-all at every node,
//!    with full backtracking. A request can match at most one route, and
//!    which one is independent of registration order.
//!
//! 2. **Build-then-serve**: `add` takes `&mut self`, `find` takes `&self`.
//!    Once construction finishes the router is a read-only structure, safe
//!    for any number of concurrent lookups without synchronization.
//!
//! 3. **Registration-time rejection**: ambiguous parameter names, misplaced
//!    catch-alls, and over-limit patterns fail [`Router::add`]; `find` is
//!    total over arbitrary input and cannot overflow a correctly sized sink.
//!
//! # Example
//!
//! ```
//! use ruta::prelude::*;
//!
//! let mut router = Router::new();
//! router.add(Method::Get, "/users/:id", "get_user")?;
//! router.add(Method::Get, "/users/new", "new_user_form")?;
//! router.add(Method::Get, "/files/*path", "serve_file")?;
//!
//! let mut bindings = router.bindings();
//! match router.find(Method::Get, "/users/42", &mut bindings) {
//!     RouteOutcome::Matched(handler) => {
//!         assert_eq!(*handler, "get_user");
//!         assert_eq!(bindings.get("id"), Some("42"));
//!         assert_eq!(bindings.matched_pattern(), Some("/users/:id"));
//!     }
//!     _ => unreachable!(),
//! }
//!
//! // Static wins over param at the same position.
//! assert_eq!(
//!     router.find(Method::Get, "/users/new", &mut bindings).handler(),
//!     Some(&"new_user_form"),
//! );
//! # Ok::<(), ruta::RouterError>(())
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod binding;
mod method;
mod pattern;
mod router;
mod trace;
mod tree;

#[cfg(feature = "config")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use binding::{BindingSink, RouteBindings};
pub use method::Method;
pub use router::{RouteInfo, RouteOutcome, Router};

// Trace types
pub use trace::{LookupStep, LookupTrace, StepKind};

// Config (feature-gated)
#[cfg(feature = "config")]
pub use config::{RouteConfig, RouteTableConfig};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use ruta::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BindingSink,
        LookupStep,
        LookupTrace,
        Method,
        RouteBindings,
        RouteInfo,
        RouteOutcome,
        Router,
        RouterError,
        StepKind,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum number of parameters (`:name` and `*name` combined) in one
/// registered pattern.
///
/// Binding sinks have a fixed capacity; bounding the parameter count at
/// registration time is what makes lookup incapable of overflowing one.
/// Enforced by [`Router::add`], never checked again on the request path.
pub const MAX_ROUTE_PARAMS: usize = 32;

/// Maximum length in bytes of a registered route pattern.
///
/// Patterns are configuration, not request input, so the limit is generous;
/// it exists to keep node prefixes and reverse-routing output bounded.
pub const MAX_PATTERN_LENGTH: usize = 8192;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from route registration and route-table loading.
///
/// These errors are caught when the routing table is built, not during
/// request servicing. A failed [`Router::add`] leaves the router matching
/// exactly what it matched before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// A `:` or `*` marker with no name behind it.
    EmptyParamName {
        /// The offending pattern.
        pattern: String,
    },
    /// A `*name` catch-all with path segments registered after it.
    CatchAllNotTerminal {
        /// The offending pattern.
        pattern: String,
    },
    /// A pattern declares more parameters than [`MAX_ROUTE_PARAMS`].
    TooManyParams {
        /// The offending pattern.
        pattern: String,
        /// Number of parameters the pattern declares.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// A pattern exceeds [`MAX_PATTERN_LENGTH`].
    PatternTooLong {
        /// Actual length of the pattern in bytes.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },
    /// Two patterns disagree on a parameter name at the same trie position.
    ///
    /// `/a/:id` and `/a/:name` describe the same structural route under two
    /// different names; which name a request would bind is ambiguous, so the
    /// second registration is rejected.
    ParamNameConflict {
        /// The pattern whose registration was rejected.
        pattern: String,
        /// The parameter name already registered at this position.
        existing: String,
        /// The conflicting name from the rejected pattern.
        conflicting: String,
    },
    /// A method string is not an HTTP verb (nor the `ANY` wildcard where
    /// one is accepted).
    InvalidMethod {
        /// The unrecognized method string.
        method: String,
    },
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyParamName { pattern } => {
                write!(
                    f,
                    "pattern \"{pattern}\" has a parameter marker with no name \
                     — write \":name\" or \"*name\""
                )
            }
            Self::CatchAllNotTerminal { pattern } => {
                write!(
                    f,
                    "pattern \"{pattern}\" continues after a \"*\" catch-all \
                     — a catch-all must be the final segment"
                )
            }
            Self::TooManyParams {
                pattern,
                count,
                max,
            } => {
                write!(
                    f,
                    "pattern \"{pattern}\" declares {count} parameters, but maximum allowed is {max}"
                )
            }
            Self::PatternTooLong { len, max } => {
                write!(f, "pattern length is {len}, but maximum allowed is {max}")
            }
            Self::ParamNameConflict {
                pattern,
                existing,
                conflicting,
            } => {
                write!(
                    f,
                    "pattern \"{pattern}\" names a parameter \"{conflicting}\" where \
                     \"{existing}\" is already registered — parameter names at the \
                     same position must agree"
                )
            }
            Self::InvalidMethod { method } => {
                write!(f, "\"{method}\" is not an HTTP method")
            }
        }
    }
}

impl std::error::Error for RouterError {}
