//! The radix trie: nodes, insertion with node splitting, lookup with
//! backtracking.
//!
//! # Structure
//!
//! Each node owns a compressed static `prefix` and up to three kinds of
//! children: static children keyed by the first byte of their prefixes
//! (exactly one per distinct leading byte), at most one parametric child,
//! and at most one catch-all child. Handlers hang off nodes in a per-method
//! table, so one shared tree serves every verb.
//!
//! # Precedence
//!
//! static > param > catch-all, applied at every node. Lookup backtracks: a
//! static walk that dies deeper in the tree unwinds and retries the param
//! child, then the catch-all. Which route a path hits is therefore total
//! and independent of registration order.

use crate::method::{Method, MethodTable};
use crate::pattern::{RoutePattern, Segment};
use crate::trace::{LookupStep, StepKind};
use crate::{RouterError, MAX_ROUTE_PARAMS};
use std::collections::HashMap;
use std::fmt;

/// What a node's own text means when matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// Matches its `prefix` byte-for-byte.
    Static,
    /// Consumes up to (not including) the next `/`, binding it to `name`.
    Param {
        /// Name bound when this node matches.
        name: String,
    },
    /// Consumes the remainder of the path, separators included.
    CatchAll {
        /// Name bound when this node matches.
        name: String,
    },
}

/// One trie vertex.
pub(crate) struct Node<H> {
    /// Static text owned by this node. Empty at the root and on
    /// param/catch-all nodes, whose text comes from the request.
    prefix: String,
    kind: NodeKind,
    /// Static children, keyed by the first byte of each child's prefix.
    statics: HashMap<u8, Node<H>>,
    param: Option<Box<Node<H>>>,
    catch_all: Option<Box<Node<H>>>,
    handlers: MethodTable<H>,
    /// The full registered pattern, present at terminals only.
    pattern: Option<String>,
}

impl<H> Node<H> {
    pub(crate) fn root() -> Self {
        Self::new_static(String::new())
    }

    fn new_static(prefix: String) -> Self {
        Self {
            prefix,
            kind: NodeKind::Static,
            statics: HashMap::new(),
            param: None,
            catch_all: None,
            handlers: MethodTable::new(),
            pattern: None,
        }
    }

    fn new_param(name: String) -> Self {
        Self {
            kind: NodeKind::Param { name },
            ..Self::new_static(String::new())
        }
    }

    fn new_catch_all(name: String) -> Self {
        Self {
            kind: NodeKind::CatchAll { name },
            ..Self::new_static(String::new())
        }
    }

    fn param_name(&self) -> &str {
        match &self.kind {
            NodeKind::Param { name } | NodeKind::CatchAll { name } => name,
            NodeKind::Static => "",
        }
    }

    fn has_handlers(&self) -> bool {
        !self.handlers.is_empty()
    }

    pub(crate) fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub(crate) fn handler_for(&self, method: Method) -> Option<&H> {
        self.handlers.get(method)
    }

    pub(crate) fn allowed_methods(&self) -> Vec<Method> {
        self.handlers.allowed()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Insertion
// ═══════════════════════════════════════════════════════════════════════════════

/// How a static insertion proceeds at one node. Decided with a short
/// immutable borrow so the mutation below it borrows cleanly.
enum StaticStep {
    NewLeaf,
    Descend(usize),
    Split(usize),
}

impl<H> Node<H> {
    /// Threads `pattern` into the trie and registers `handler` at the
    /// terminal (`method: None` registers the method-agnostic fallback).
    ///
    /// Conflict errors surface only at pre-existing nodes: any node this
    /// walk creates is fresh and cannot conflict. The one mutation that can
    /// precede an error is a radix split, which preserves matching behavior
    /// exactly, so a failed insertion never changes what the tree matches.
    pub(crate) fn insert_pattern(
        &mut self,
        pattern: &RoutePattern,
        method: Option<Method>,
        handler: H,
    ) -> Result<(), RouterError> {
        let mut node = self;
        for segment in pattern.segments() {
            node = match segment {
                Segment::Literal(text) => node.insert_static(text),
                Segment::Param(name) => node.insert_param(name, pattern.raw())?,
                Segment::CatchAll(name) => node.insert_catch_all(name, pattern.raw())?,
            };
        }
        node.pattern = Some(pattern.raw().to_string());
        node.handlers.insert(method, handler);
        Ok(())
    }

    /// Inserts literal `text` below this node, splitting an existing child
    /// at the common prefix where necessary, and returns the node owning
    /// the final byte of `text`.
    fn insert_static(&mut self, text: &str) -> &mut Node<H> {
        if text.is_empty() {
            return self;
        }
        let first = text.as_bytes()[0];

        let step = match self.statics.get(&first) {
            None => StaticStep::NewLeaf,
            Some(child) => {
                let common = common_prefix_len(text, &child.prefix);
                if common == child.prefix.len() {
                    StaticStep::Descend(common)
                } else {
                    StaticStep::Split(common)
                }
            }
        };

        match step {
            StaticStep::NewLeaf => {
                self.statics.insert(first, Node::new_static(text.to_string()));
                self.statics.get_mut(&first).unwrap()
            }
            StaticStep::Descend(common) => self
                .statics
                .get_mut(&first)
                .unwrap()
                .insert_static(&text[common..]),
            StaticStep::Split(common) => {
                // The defining radix step: split the existing child at the
                // common prefix, keeping its handlers and subtree intact on
                // the re-prefixed node.
                let mut old = self.statics.remove(&first).unwrap();
                old.prefix = old.prefix[common..].to_string();
                let old_first = old.prefix.as_bytes()[0];

                let mut split = Node::new_static(text[..common].to_string());
                split.statics.insert(old_first, old);
                self.statics.insert(first, split);

                let split = self.statics.get_mut(&first).unwrap();
                if common == text.len() {
                    split
                } else {
                    split.insert_static(&text[common..])
                }
            }
        }
    }

    fn insert_param(&mut self, name: &str, pattern: &str) -> Result<&mut Node<H>, RouterError> {
        if let Some(existing) = &self.param {
            if existing.param_name() != name {
                return Err(RouterError::ParamNameConflict {
                    pattern: pattern.to_string(),
                    existing: existing.param_name().to_string(),
                    conflicting: name.to_string(),
                });
            }
        } else {
            self.param = Some(Box::new(Node::new_param(name.to_string())));
        }
        Ok(self.param.as_deref_mut().unwrap())
    }

    fn insert_catch_all(&mut self, name: &str, pattern: &str) -> Result<&mut Node<H>, RouterError> {
        if let Some(existing) = &self.catch_all {
            if existing.param_name() != name {
                return Err(RouterError::ParamNameConflict {
                    pattern: pattern.to_string(),
                    existing: existing.param_name().to_string(),
                    conflicting: name.to_string(),
                });
            }
        } else {
            self.catch_all = Some(Box::new(Node::new_catch_all(name.to_string())));
        }
        Ok(self.catch_all.as_deref_mut().unwrap())
    }
}

/// Length of the common prefix of two strings, in bytes.
#[inline]
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.bytes().zip(b.bytes()).take_while(|(x, y)| x == y).count()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Lookup
// ═══════════════════════════════════════════════════════════════════════════════

/// Parameter captures collected during one lookup.
///
/// Fixed-size parallel arrays of borrowed slices: names point into the
/// tree, values into the request path. Nothing here allocates, which is
/// what keeps the match path allocation-free. Registration caps parameter
/// counts at [`MAX_ROUTE_PARAMS`], so the cursor cannot pass the arrays.
pub(crate) struct Captures<'t, 'p> {
    names: [&'t str; MAX_ROUTE_PARAMS],
    values: [&'p str; MAX_ROUTE_PARAMS],
    len: usize,
}

impl<'t, 'p> Captures<'t, 'p> {
    pub(crate) fn new() -> Self {
        Self {
            names: [""; MAX_ROUTE_PARAMS],
            values: [""; MAX_ROUTE_PARAMS],
            len: 0,
        }
    }

    fn push(&mut self, name: &'t str, value: &'p str) {
        if self.len < MAX_ROUTE_PARAMS {
            self.names[self.len] = name;
            self.values[self.len] = value;
            self.len += 1;
        }
    }

    fn truncate(&mut self, len: usize) {
        self.len = len;
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Bindings in root-to-leaf order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&'t str, &'p str)> + '_ {
        self.names[..self.len]
            .iter()
            .copied()
            .zip(self.values[..self.len].iter().copied())
    }
}

impl<H> Node<H> {
    /// Resolves `rest` against this subtree, pushing parameter captures as
    /// the walk commits to parametric edges and rewinding them when a
    /// branch dies.
    ///
    /// Returns the terminal node whose registered pattern the path matched,
    /// or `None` when no branch consumes the full path. Terminals without
    /// handlers are branch points, not routes, and do not satisfy a walk.
    pub(crate) fn lookup<'t, 'p>(
        &'t self,
        rest: &'p str,
        captures: &mut Captures<'t, 'p>,
    ) -> Option<&'t Node<H>> {
        if rest.is_empty() {
            if self.has_handlers() {
                return Some(self);
            }
            // A trailing catch-all matches the empty remainder: /src/ hits
            // /src/*path with path = "".
            if let Some(catch_all) = &self.catch_all {
                if catch_all.has_handlers() {
                    captures.push(catch_all.param_name(), "");
                    return Some(catch_all);
                }
            }
            return None;
        }

        // Static child first: longest literal match.
        if let Some(child) = self.statics.get(&rest.as_bytes()[0]) {
            if let Some(tail) = rest.strip_prefix(child.prefix.as_str()) {
                let mark = captures.len();
                if let Some(found) = child.lookup(tail, captures) {
                    return Some(found);
                }
                captures.truncate(mark);
            }
        }

        // Then the param child: greedily up to the next separator.
        if let Some(param) = &self.param {
            let end = rest.find('/').unwrap_or(rest.len());
            let (value, tail) = rest.split_at(end);
            let mark = captures.len();
            captures.push(param.param_name(), value);
            if let Some(found) = param.lookup(tail, captures) {
                return Some(found);
            }
            captures.truncate(mark);
        }

        // Finally the catch-all swallows everything that is left.
        if let Some(catch_all) = &self.catch_all {
            if catch_all.has_handlers() {
                captures.push(catch_all.param_name(), rest);
                return Some(catch_all);
            }
        }

        None
    }

    /// Instrumented twin of [`lookup`](Self::lookup), recording every
    /// attempted edge. Allowed to allocate; debugging tool, not the hot
    /// path.
    ///
    /// # INV: same outcome as `lookup`
    ///
    /// For any tree and path, the node this returns (and the captures it
    /// leaves) are identical to what `lookup` produces.
    pub(crate) fn lookup_traced<'t, 'p>(
        &'t self,
        rest: &'p str,
        captures: &mut Captures<'t, 'p>,
        steps: &mut Vec<LookupStep>,
    ) -> Option<&'t Node<H>> {
        if rest.is_empty() {
            if self.has_handlers() {
                return Some(self);
            }
            if let Some(catch_all) = &self.catch_all {
                if catch_all.has_handlers() {
                    captures.push(catch_all.param_name(), "");
                    steps.push(LookupStep {
                        kind: StepKind::CatchAll {
                            name: catch_all.param_name().to_string(),
                            value: String::new(),
                        },
                        matched: true,
                    });
                    return Some(catch_all);
                }
            }
            return None;
        }

        if let Some(child) = self.statics.get(&rest.as_bytes()[0]) {
            let index = steps.len();
            steps.push(LookupStep {
                kind: StepKind::Static {
                    prefix: child.prefix.clone(),
                },
                matched: false,
            });
            if let Some(tail) = rest.strip_prefix(child.prefix.as_str()) {
                let mark = captures.len();
                if let Some(found) = child.lookup_traced(tail, captures, steps) {
                    steps[index].matched = true;
                    return Some(found);
                }
                captures.truncate(mark);
            }
        }

        if let Some(param) = &self.param {
            let end = rest.find('/').unwrap_or(rest.len());
            let (value, tail) = rest.split_at(end);
            let index = steps.len();
            steps.push(LookupStep {
                kind: StepKind::Param {
                    name: param.param_name().to_string(),
                    value: value.to_string(),
                },
                matched: false,
            });
            let mark = captures.len();
            captures.push(param.param_name(), value);
            if let Some(found) = param.lookup_traced(tail, captures, steps) {
                steps[index].matched = true;
                return Some(found);
            }
            captures.truncate(mark);
        }

        if let Some(catch_all) = &self.catch_all {
            if catch_all.has_handlers() {
                captures.push(catch_all.param_name(), rest);
                steps.push(LookupStep {
                    kind: StepKind::CatchAll {
                        name: catch_all.param_name().to_string(),
                        value: rest.to_string(),
                    },
                    matched: true,
                });
                return Some(catch_all);
            }
        }

        None
    }
}

impl<H> fmt::Debug for Node<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("prefix", &self.prefix)
            .field("kind", &self.kind)
            .field("statics", &self.statics.len())
            .field("has_param", &self.param.is_some())
            .field("has_catch_all", &self.catch_all.is_some())
            .field("pattern", &self.pattern)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(root: &mut Node<&'static str>, pattern: &str, handler: &'static str) {
        let pat = RoutePattern::parse(pattern).unwrap();
        root.insert_pattern(&pat, Some(Method::Get), handler).unwrap();
    }

    fn find<'t>(root: &'t Node<&'static str>, path: &str) -> Option<(&'static str, Vec<(String, String)>)> {
        let mut captures = Captures::new();
        let node = root.lookup(path, &mut captures)?;
        let handler = node.handler_for(Method::Get)?;
        let bound = captures
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect();
        Some((*handler, bound))
    }

    #[test]
    fn test_split_preserves_existing_routes() {
        let mut root = Node::root();
        insert(&mut root, "/testing", "long");
        insert(&mut root, "/test", "short");
        insert(&mut root, "/team", "team");

        assert_eq!(find(&root, "/testing").unwrap().0, "long");
        assert_eq!(find(&root, "/test").unwrap().0, "short");
        assert_eq!(find(&root, "/team").unwrap().0, "team");
        assert!(find(&root, "/te").is_none());
    }

    #[test]
    fn test_static_beats_param() {
        let mut root = Node::root();
        insert(&mut root, "/users/:id", "param");
        insert(&mut root, "/users/new", "static");

        assert_eq!(find(&root, "/users/new").unwrap().0, "static");
        let (handler, bound) = find(&root, "/users/42").unwrap();
        assert_eq!(handler, "param");
        assert_eq!(bound, vec![("id".to_string(), "42".to_string())]);
    }

    #[test]
    fn test_param_beats_catch_all_on_single_segment() {
        let mut root = Node::root();
        insert(&mut root, "/files/:fid", "param");
        insert(&mut root, "/files/*rest", "catch_all");

        let (handler, bound) = find(&root, "/files/a").unwrap();
        assert_eq!(handler, "param");
        assert_eq!(bound, vec![("fid".to_string(), "a".to_string())]);

        let (handler, bound) = find(&root, "/files/a/b").unwrap();
        assert_eq!(handler, "catch_all");
        assert_eq!(bound, vec![("rest".to_string(), "a/b".to_string())]);
    }

    #[test]
    fn test_backtrack_from_dead_static_branch() {
        let mut root = Node::root();
        insert(&mut root, "/users/new/audit", "audit");
        insert(&mut root, "/users/:id", "param");

        // "new" walks into the static branch, dies at "/audit", and the
        // unwind retries the param child.
        let (handler, bound) = find(&root, "/users/new").unwrap();
        assert_eq!(handler, "param");
        assert_eq!(bound, vec![("id".to_string(), "new".to_string())]);
    }

    #[test]
    fn test_backtrack_discards_stale_captures() {
        let mut root = Node::root();
        insert(&mut root, "/a/:x/end", "deep");
        insert(&mut root, "/a/*rest", "wide");

        // The param branch binds x="v" then dies; its capture must not leak
        // into the catch-all result.
        let (handler, bound) = find(&root, "/a/v/other").unwrap();
        assert_eq!(handler, "wide");
        assert_eq!(bound, vec![("rest".to_string(), "v/other".to_string())]);
    }

    #[test]
    fn test_catch_all_binds_empty_remainder() {
        let mut root = Node::root();
        insert(&mut root, "/static/*filepath", "files");

        let (handler, bound) = find(&root, "/static/").unwrap();
        assert_eq!(handler, "files");
        assert_eq!(bound, vec![("filepath".to_string(), String::new())]);

        // Without the trailing slash the literal "/static/" is not consumed.
        assert!(find(&root, "/static").is_none());
    }

    #[test]
    fn test_nested_params_bind_in_order() {
        let mut root = Node::root();
        insert(&mut root, "/users/:uid/files/:fid", "file");

        let (handler, bound) = find(&root, "/users/1/files/2").unwrap();
        assert_eq!(handler, "file");
        assert_eq!(
            bound,
            vec![
                ("uid".to_string(), "1".to_string()),
                ("fid".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_param_name_conflict_rejected() {
        let mut root: Node<&str> = Node::root();
        let first = RoutePattern::parse("/a/:id").unwrap();
        root.insert_pattern(&first, Some(Method::Get), "h1").unwrap();

        let second = RoutePattern::parse("/a/:name").unwrap();
        let err = root
            .insert_pattern(&second, Some(Method::Get), "h2")
            .unwrap_err();
        assert_eq!(
            err,
            RouterError::ParamNameConflict {
                pattern: "/a/:name".into(),
                existing: "id".into(),
                conflicting: "name".into(),
            }
        );

        // The tree still matches exactly as before the failed insert.
        let (handler, bound) = find(&root, "/a/7").unwrap();
        assert_eq!(handler, "h1");
        assert_eq!(bound, vec![("id".to_string(), "7".to_string())]);
    }

    #[test]
    fn test_catch_all_name_conflict_rejected() {
        let mut root: Node<&str> = Node::root();
        let first = RoutePattern::parse("/f/*rest").unwrap();
        root.insert_pattern(&first, Some(Method::Get), "h1").unwrap();

        let second = RoutePattern::parse("/f/*all").unwrap();
        assert!(matches!(
            root.insert_pattern(&second, Some(Method::Get), "h2"),
            Err(RouterError::ParamNameConflict { .. })
        ));
    }

    #[test]
    fn test_shared_param_node_extends() {
        let mut root = Node::root();
        insert(&mut root, "/users/:id", "show");
        insert(&mut root, "/users/:id/edit", "edit");

        assert_eq!(find(&root, "/users/5").unwrap().0, "show");
        let (handler, bound) = find(&root, "/users/5/edit").unwrap();
        assert_eq!(handler, "edit");
        assert_eq!(bound, vec![("id".to_string(), "5".to_string())]);
    }

    #[test]
    fn test_branch_point_without_handler_is_not_a_route() {
        let mut root = Node::root();
        insert(&mut root, "/api/alpha", "a");
        insert(&mut root, "/api/alert", "b");

        // The split created an "/api/al" branch point; it carries no
        // handler and must not satisfy a walk.
        assert!(find(&root, "/api/al").is_none());
    }

    #[test]
    fn test_traced_lookup_agrees_with_lookup() {
        let mut root = Node::root();
        insert(&mut root, "/users/:id", "param");
        insert(&mut root, "/users/new/audit", "audit");
        insert(&mut root, "/files/*rest", "files");

        for path in ["/users/new", "/users/7", "/files/a/b", "/missing", "/users/new/audit"] {
            let mut plain = Captures::new();
            let mut traced = Captures::new();
            let mut steps = Vec::new();
            let a = root.lookup(path, &mut plain).map(|n| n.pattern());
            let b = root
                .lookup_traced(path, &mut traced, &mut steps)
                .map(|n| n.pattern());
            assert_eq!(a, b, "outcome diverged for {path}");
            assert_eq!(
                plain.iter().collect::<Vec<_>>(),
                traced.iter().collect::<Vec<_>>(),
                "captures diverged for {path}"
            );
        }
    }

    #[test]
    fn test_trace_records_backtracked_attempt() {
        let mut root = Node::root();
        insert(&mut root, "/users/new/audit", "audit");
        insert(&mut root, "/users/:id", "param");

        let mut captures = Captures::new();
        let mut steps = Vec::new();
        root.lookup_traced("/users/new", &mut captures, &mut steps)
            .unwrap();

        // The dead static attempt is recorded unmatched; the committed
        // param edge is recorded matched.
        assert!(steps
            .iter()
            .any(|s| matches!(&s.kind, StepKind::Static { .. }) && !s.matched));
        assert!(steps
            .iter()
            .any(|s| matches!(&s.kind, StepKind::Param { name, value } if name == "id" && value == "new") && s.matched));
    }
}
