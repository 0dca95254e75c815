//! Filter registrations.
//!
//! A filter path is the concatenation of one segment per open container, the
//! container's opening unit followed by the property name it was opened under.
//! For `[{"f":[{...}]}]` the innermost object sits at `[{[f{`. Property names
//! take part in their raw, still-escaped form.

use std::{collections::BTreeMap, fmt};

use serde_json::Value;
use tracing::trace;

/// Reserved path receiving the two special top-level shapes: a bare number
/// document and the global error envelope.
///
/// Ordinary paths always start with `[` or `{`, so this never matches a nested
/// subtree.
pub const TOP_LEVEL: &str = "#";

/// Receives decoded subtrees.
///
/// Handlers run synchronously inside `feed` and must not block; defer long
/// work to the caller.
pub trait Handler {
    /// Called once per matched subtree, in document order of closing.
    fn handle(&mut self, value: Value);
}

impl<F: FnMut(Value)> Handler for F {
    fn handle(&mut self, value: Value) {
        self(value);
    }
}

/// Augments a decoded subtree before its handler sees it.
pub trait PostProcess {
    /// Mutates `value` in place.
    fn apply(&mut self, value: &mut Value);
}

impl<F: FnMut(&mut Value)> PostProcess for F {
    fn apply(&mut self, value: &mut Value) {
        self(value);
    }
}

/// A handler plus the hooks that run ahead of it.
pub struct Filter<'a> {
    handler: Box<dyn Handler + 'a>,
    hooks: Vec<Box<dyn PostProcess + 'a>>,
}

impl<'a> Filter<'a> {
    /// A filter delivering straight to `handler`.
    pub fn new(handler: impl Handler + 'a) -> Self {
        Self {
            handler: Box::new(handler),
            hooks: Vec::new(),
        }
    }

    /// Appends a hook; hooks run in the order they were added.
    #[must_use]
    pub fn with_hook(mut self, hook: impl PostProcess + 'a) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    fn deliver(&mut self, mut value: Value) {
        for hook in &mut self.hooks {
            hook.apply(&mut value);
        }
        self.handler.handle(value);
    }
}

impl fmt::Debug for Filter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("hooks", &self.hooks.len())
            .finish_non_exhaustive()
    }
}

/// Path to filter map, fixed once handed to a splitter.
///
/// # Examples
///
/// ```rust
/// use std::cell::RefCell;
///
/// use jsonsift::{FilterRegistry, JsonSplitter, Status, Value};
///
/// let files = RefCell::new(Vec::new());
/// let filters = FilterRegistry::new().on("{[f{", |v: Value| files.borrow_mut().push(v));
/// let mut splitter = JsonSplitter::text(filters);
///
/// assert_eq!(splitter.feed(r#"{"f":[{"h":"a"},{"h""#, false).unwrap(), Status::NeedMoreData);
/// assert!(splitter.feed(r#":"b"}]}"#, true).unwrap().is_done());
/// assert_eq!(files.borrow().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct FilterRegistry<'a> {
    filters: BTreeMap<String, Filter<'a>>,
}

impl<'a> FilterRegistry<'a> {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: BTreeMap::new(),
        }
    }

    /// Registers `handler` for `path`, replacing any earlier registration.
    #[must_use]
    pub fn on(self, path: impl Into<String>, handler: impl Handler + 'a) -> Self {
        self.insert(path, Filter::new(handler))
    }

    /// Registers `handler` for the [`TOP_LEVEL`] shapes.
    #[must_use]
    pub fn on_top_level(self, handler: impl Handler + 'a) -> Self {
        self.on(TOP_LEVEL, handler)
    }

    /// Registers a prepared [`Filter`] for `path`.
    #[must_use]
    pub fn insert(mut self, path: impl Into<String>, filter: Filter<'a>) -> Self {
        self.filters.insert(path.into(), filter);
        self
    }

    /// Number of registered paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Whether a nested subtree at `path` is captured.
    pub(crate) fn matches(&self, path: &str) -> bool {
        path != TOP_LEVEL && self.filters.contains_key(path)
    }

    /// Runs the hooks and handler registered for `path`, if any.
    pub(crate) fn deliver(&mut self, path: &str, value: Value) {
        if let Some(filter) = self.filters.get_mut(path) {
            trace!(path, "delivering subtree");
            filter.deliver(value);
        }
    }
}
