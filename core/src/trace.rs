//! Lookup trace types for debugging routing behavior.
//!
//! A trace records every edge the walk attempted, in order, including the
//! branches that died and were backtracked out of. Use
//! [`Router::find_with_trace`](crate::Router::find_with_trace) to see why a
//! path landed on the route it did — or on none at all.
//!
//! # INV: traced outcome == `find` outcome
//!
//! The outcome returned alongside a trace is always identical to what
//! [`Router::find`](crate::Router::find) returns for the same input; the
//! traced walk only adds recording.

use std::fmt;

/// Trace of a full lookup.
pub struct LookupTrace {
    /// Every attempted edge, in walk order. Backtracked attempts stay in
    /// the list with `matched == false`.
    pub steps: Vec<LookupStep>,
    /// The registered pattern the walk terminated on, if any.
    pub matched_pattern: Option<String>,
}

impl fmt::Debug for LookupTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupTrace")
            .field("steps", &self.steps)
            .field("matched_pattern", &self.matched_pattern)
            .finish()
    }
}

/// One attempted edge in a lookup.
#[derive(Clone, PartialEq, Eq)]
pub struct LookupStep {
    /// Which edge was tried and what it consumed.
    pub kind: StepKind,
    /// Whether the walk through this edge reached a route. `false` means
    /// the branch died and the walk backtracked past it.
    pub matched: bool,
}

impl fmt::Debug for LookupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupStep")
            .field("kind", &self.kind)
            .field("matched", &self.matched)
            .finish()
    }
}

/// The edge kinds a walk can attempt.
#[derive(Clone, PartialEq, Eq)]
pub enum StepKind {
    /// A static child; `prefix` is the literal text it required.
    Static {
        /// The node's compressed prefix.
        prefix: String,
    },
    /// A parametric child consuming one path segment.
    Param {
        /// The parameter name.
        name: String,
        /// The segment it consumed.
        value: String,
    },
    /// A catch-all child consuming the remainder.
    CatchAll {
        /// The parameter name.
        name: String,
        /// The remainder it consumed (possibly empty).
        value: String,
    },
}

impl fmt::Debug for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static { prefix } => f.debug_struct("Static").field("prefix", prefix).finish(),
            Self::Param { name, value } => f
                .debug_struct("Param")
                .field("name", name)
                .field("value", value)
                .finish(),
            Self::CatchAll { name, value } => f
                .debug_struct("CatchAll")
                .field("name", name)
                .field("value", value)
                .finish(),
        }
    }
}
