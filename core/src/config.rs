//! Config types for declarative route tables.
//!
//! These types mirror the runtime registration API but are
//! serde-deserializable, so a route table can live in JSON or YAML and be
//! loaded in one step. Actions are names, not handlers: the embedder maps
//! each action string to a real handler at dispatch time, keeping handlers
//! opaque to this crate.
//!
//! ```yaml
//! routes:
//!   - { method: GET,  path: "/users/:id",   action: get_user }
//!   - { method: POST, path: "/users",       action: create_user }
//!   - { method: ANY,  path: "/health",      action: health }
//! ```

use crate::{Method, Router, RouterError};
use serde::Deserialize;

/// Method string accepted in config files: an uppercase HTTP verb, or this
/// wildcard meaning "any method".
const ANY_METHOD: &str = "ANY";

/// A declarative route table.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteTableConfig {
    /// Routes in registration order. Order does not affect matching
    /// (precedence is structural), but conflicts are reported against the
    /// earlier registration.
    pub routes: Vec<RouteConfig>,
}

/// One route in a [`RouteTableConfig`].
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    /// An uppercase HTTP verb, or `ANY` for a method-agnostic route.
    pub method: String,
    /// The route pattern (`:name` parameters, trailing `*name` catch-all).
    pub path: String,
    /// The action name bound to this route.
    pub action: String,
}

impl RouteTableConfig {
    /// Builds a [`Router`] whose handlers are the action names.
    ///
    /// # Errors
    ///
    /// Any [`RouterError`] a direct [`Router::add`] of the same routes
    /// would produce, plus [`RouterError::InvalidMethod`] for method
    /// strings that are neither a verb nor `ANY`.
    pub fn into_router(self) -> Result<Router<String>, RouterError> {
        let mut router = Router::new();
        for route in self.routes {
            if route.method == ANY_METHOD {
                router.add_any(&route.path, route.action)?;
            } else {
                let method: Method = route.method.parse()?;
                router.add(method, &route.path, route.action)?;
            }
        }
        Ok(router)
    }
}
