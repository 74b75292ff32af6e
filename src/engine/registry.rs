//! Registries - Node-keyed tracking entries built by the directive scan.
//!
//! Two ordered maps keyed by node identity:
//! - [`ShowRegistry`]: conditional and toggle entries, mutated by the synchronizer
//! - [`EventRegistry`]: click bindings, consumed once by the binder
//!
//! Insertion order is scan order, so every pass over a registry is deterministic.

use std::fmt;

use indexmap::IndexMap;

use crate::config::Method;
use crate::dom::NodeId;

// =============================================================================
// Show Entries
// =============================================================================

/// How an entry hides its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShowKind {
    /// Swap the element out of the tree for a placeholder.
    Conditional,
    /// Keep the element in place and suppress its display.
    Toggle,
}

/// Tracking state for one directive-bearing element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowEntry {
    pub node: NodeId,
    pub kind: ShowKind,
    /// Current logical visibility.
    pub visible: bool,
    /// Data key this entry reacts to.
    pub bound_key: String,
    /// Comment node holding the element's slot while hidden.
    /// Conditional only; created on the first transition into Hidden.
    pub placeholder: Option<NodeId>,
    /// Inline `display` the element had before it was suppressed. Toggle only.
    pub(crate) restore_display: Option<String>,
}

impl ShowEntry {
    pub fn conditional(node: NodeId, bound_key: impl Into<String>, visible: bool) -> Self {
        Self {
            node,
            kind: ShowKind::Conditional,
            visible,
            bound_key: bound_key.into(),
            placeholder: None,
            restore_display: None,
        }
    }

    pub fn toggle(node: NodeId, bound_key: impl Into<String>, visible: bool) -> Self {
        Self {
            node,
            kind: ShowKind::Toggle,
            visible,
            bound_key: bound_key.into(),
            placeholder: None,
            restore_display: None,
        }
    }
}

/// Ordered node → [`ShowEntry`] map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowRegistry {
    entries: IndexMap<NodeId, ShowEntry>,
}

impl ShowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry. A node already present keeps its scan position.
    pub fn insert(&mut self, entry: ShowEntry) {
        self.entries.insert(entry.node, entry);
    }

    pub fn get(&self, node: NodeId) -> Option<&ShowEntry> {
        self.entries.get(&node)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut ShowEntry> {
        self.entries.get_mut(&node)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShowEntry> {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ShowEntry> {
        self.entries.values_mut()
    }

    /// Entries reacting to `key`, in scan order.
    pub fn bound_to<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a ShowEntry> + 'a {
        self.entries.values().filter(move |entry| entry.bound_key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Event Entries
// =============================================================================

/// A click binding found by the scan.
#[derive(Clone)]
pub struct EventEntry {
    pub node: NodeId,
    /// Method name as written in the directive.
    pub method: String,
    /// Resolved handler. `None` when the name is not in the methods table.
    pub handler: Option<Method>,
}

impl fmt::Debug for EventEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEntry")
            .field("node", &self.node)
            .field("method", &self.method)
            .field("resolved", &self.handler.is_some())
            .finish()
    }
}

/// Ordered node → [`EventEntry`] map.
#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    entries: IndexMap<NodeId, EventEntry>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: EventEntry) {
        self.entries.insert(entry.node, entry);
    }

    pub fn get(&self, node: NodeId) -> Option<&EventEntry> {
        self.entries.get(&node)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for EventRegistry {
    type Item = EventEntry;
    type IntoIter = indexmap::map::IntoValues<NodeId, EventEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}
