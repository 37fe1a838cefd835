//! The binding sink: where lookup writes what it extracted.
//!
//! The router does not own per-request state. Whatever does — a request
//! context, a test harness — implements [`BindingSink`] and hands it to
//! [`Router::find`](crate::Router::find), which fills it with parameter
//! bindings in root-to-leaf order and the matched pattern.
//!
//! [`RouteBindings`] is the provided implementation: fixed capacity chosen
//! at construction, parallel name/value slots reused in place so that a
//! pooled instance stops allocating once its buffers have warmed up.

use crate::MAX_ROUTE_PARAMS;
use std::fmt;

/// Mutable per-request sink for lookup results.
///
/// Lookup calls `reset` first, then `bind` once per parameter in
/// left-to-right pattern order, then `set_matched_pattern` — and only on a
/// successful match. It never binds more than `capacity` parameters.
pub trait BindingSink {
    /// Appends one parameter binding. Order of calls is binding order.
    fn bind(&mut self, name: &str, value: &str);

    /// Records the registered pattern the path matched.
    fn set_matched_pattern(&mut self, pattern: &str);

    /// Clears all bindings and the matched pattern.
    fn reset(&mut self);

    /// Fixed capacity in bindings. Lookup will not `bind` past it.
    fn capacity(&self) -> usize;
}

/// The provided [`BindingSink`]: parallel name/value arrays with a cursor.
///
/// Slots are `String`s reused across `reset` calls, so a pooled instance
/// serving sequential requests settles into zero allocation. An instance
/// must not be shared across concurrent requests; give each in-flight
/// request its own (pool them if churn matters).
#[derive(Clone)]
pub struct RouteBindings {
    names: Vec<String>,
    values: Vec<String>,
    len: usize,
    pattern: String,
}

impl RouteBindings {
    /// Creates a sink holding up to `capacity` bindings.
    ///
    /// Size it with [`Router::max_params`](crate::Router::max_params) (or
    /// use [`Router::bindings`](crate::Router::bindings), which does) so no
    /// registered route can exceed it.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            names: vec![String::new(); capacity],
            values: vec![String::new(); capacity],
            len: 0,
            pattern: String::new(),
        }
    }

    /// Number of bindings from the last lookup.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if the last lookup bound nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The value bound to `name`, first binding wins when a pattern repeats
    /// a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.names[..self.len]
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i].as_str())
    }

    /// The `i`th binding, in root-to-leaf order.
    #[must_use]
    pub fn param(&self, i: usize) -> Option<(&str, &str)> {
        if i < self.len {
            Some((self.names[i].as_str(), self.values[i].as_str()))
        } else {
            None
        }
    }

    /// All bindings in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names[..self.len]
            .iter()
            .map(String::as_str)
            .zip(self.values[..self.len].iter().map(String::as_str))
    }

    /// The pattern the last lookup matched, if it matched.
    #[must_use]
    pub fn matched_pattern(&self) -> Option<&str> {
        if self.pattern.is_empty() {
            None
        } else {
            Some(&self.pattern)
        }
    }
}

impl BindingSink for RouteBindings {
    fn bind(&mut self, name: &str, value: &str) {
        if self.len == self.names.len() {
            return;
        }
        let slot = self.len;
        self.names[slot].clear();
        self.names[slot].push_str(name);
        self.values[slot].clear();
        self.values[slot].push_str(value);
        self.len += 1;
    }

    fn set_matched_pattern(&mut self, pattern: &str) {
        self.pattern.clear();
        self.pattern.push_str(pattern);
    }

    fn reset(&mut self) {
        // Rewind the cursor; slot contents past it are unobservable and the
        // buffers keep their capacity for reuse.
        self.len = 0;
        self.pattern.clear();
    }

    fn capacity(&self) -> usize {
        self.names.len()
    }
}

impl Default for RouteBindings {
    /// A sink sized to [`MAX_ROUTE_PARAMS`], enough for any registrable
    /// route.
    fn default() -> Self {
        Self::new(MAX_ROUTE_PARAMS)
    }
}

impl fmt::Debug for RouteBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteBindings")
            .field("params", &self.iter().collect::<Vec<_>>())
            .field("matched_pattern", &self.matched_pattern())
            .field("capacity", &self.capacity())
            .finish()
    }
}
