//! Event Binder - Wires click entries to document listeners.
//!
//! Each resolved entry becomes a click listener that calls the method with the
//! engine as context. Listeners hold a weak engine handle, so the document
//! never keeps an engine alive; a click after the engine is gone does nothing.
//!
//! Entries without a handler (unknown method names) are skipped. They were
//! already reported by the scan.

use std::rc::Rc;

use tracing::{debug, warn};

use super::mount::WeakEngine;
use super::registry::EventRegistry;
use crate::dom::{Document, Event, EventType, Listener};

/// Attach a click listener for every resolved entry.
///
/// Consumes the registry. Returns the number of listeners attached.
pub fn bind(document: &mut Document, registry: EventRegistry, context: &WeakEngine) -> usize {
    let mut attached = 0;

    for entry in registry {
        let Some(handler) = entry.handler else {
            debug!(node = %entry.node, method = %entry.method, "no handler; listener not attached");
            continue;
        };

        let context = context.clone();
        let method = entry.method;
        let listener: Listener = Rc::new(move |event: &Event| match context.upgrade() {
            Some(engine) => handler(&engine, event),
            None => debug!(method = %method, "engine dropped; click ignored"),
        });

        match document.add_event_listener(entry.node, EventType::Click, listener) {
            Ok(()) => attached += 1,
            Err(err) => warn!(node = %entry.node, error = %err, "could not attach click listener"),
        }
    }

    attached
}
