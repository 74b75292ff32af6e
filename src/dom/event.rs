//! Events - Listener types and bubbling dispatch.
//!
//! Listeners are attached per node with [`Document::add_event_listener`].
//! Dispatch walks from the target up through its ancestors (bubbling), calling
//! every listener of the matching type on each node.
//!
//! Dispatch never holds a borrow of the document while a listener runs, so
//! listeners are free to mutate the tree (or write engine data, which does).
//!
//! # Example
//!
//! ```ignore
//! use spark_bind::dom::{dispatch_click, EventType};
//!
//! document.borrow_mut().add_event_listener(button, EventType::Click, Rc::new(|event| {
//!     println!("clicked {}", event.target());
//! }))?;
//!
//! dispatch_click(&document, button);
//! ```

use std::cell::Cell;
use std::rc::Rc;

use super::document::{NodeId, SharedDocument};

// =============================================================================
// TYPES
// =============================================================================

/// Event types the document can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Click => "click",
        }
    }
}

/// An event travelling from its target up to the document node.
#[derive(Debug)]
pub struct Event {
    event_type: EventType,
    target: NodeId,
    current_target: Cell<NodeId>,
    propagation_stopped: Cell<bool>,
}

impl Event {
    /// Create an event aimed at `target`.
    pub fn new(event_type: EventType, target: NodeId) -> Self {
        Self {
            event_type,
            target,
            current_target: Cell::new(target),
            propagation_stopped: Cell::new(false),
        }
    }

    /// Create a click event.
    pub fn click(target: NodeId) -> Self {
        Self::new(EventType::Click, target)
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// The node the event was dispatched at.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The node whose listener is currently running.
    pub fn current_target(&self) -> NodeId {
        self.current_target.get()
    }

    /// Stop bubbling after the listeners of the current node finish.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

/// Event listener (Rc so dispatch can clone it out of the document).
pub type Listener = Rc<dyn Fn(&Event)>;

// =============================================================================
// DISPATCH
// =============================================================================

/// Dispatch an event, bubbling from the target to the document node.
///
/// The propagation path is fixed before any listener runs.
/// Returns true if at least one listener was invoked.
pub fn dispatch(document: &SharedDocument, event: &Event) -> bool {
    let path: Vec<(NodeId, Vec<Listener>)> = {
        let doc = document.borrow();
        std::iter::once(event.target())
            .chain(doc.ancestors(event.target()))
            .map(|node| (node, doc.listeners(node, event.event_type())))
            .filter(|(_, listeners)| !listeners.is_empty())
            .collect()
    };

    let mut handled = false;
    for (node, listeners) in path {
        event.current_target.set(node);
        for listener in listeners {
            listener(event);
            handled = true;
        }
        if event.is_propagation_stopped() {
            break;
        }
    }
    handled
}

/// Dispatch a click at `target`.
pub fn dispatch_click(document: &SharedDocument, target: NodeId) -> bool {
    dispatch(document, &Event::click(target))
}
