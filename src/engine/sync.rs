//! View Synchronizer - Applies show-state to the document.
//!
//! # State Machines
//!
//! ```text
//! Conditional:  Visible (element in slot)  <->  Hidden (placeholder in slot)
//! Toggle:       Displayed                  <->  Suppressed (display: none)
//! ```
//!
//! The Conditional placeholder is a comment node created on the first
//! transition into Hidden, whenever that happens, and reused afterwards.
//! Toggle never changes tree structure.
//!
//! # Entry Points
//!
//! - [`initial_paint`] - hide every entry that starts hidden (idempotent)
//! - [`on_key_changed`] - update every entry bound to a key, one full pass per write
//!
//! Tree errors during a transition are logged and skipped. Directive
//! processing never panics.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::registry::{ShowEntry, ShowKind, ShowRegistry};
use crate::dom::Document;
use crate::types::{Truthy, Value};

/// Text of the comment node that holds a hidden element's slot.
pub const PLACEHOLDER_TEXT: &str = "conditional-render";

const DISPLAY: &str = "display";
const SUPPRESSED: &str = "none";

/// How a write changes the visibility of matching entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPolicy {
    /// Every write inverts visibility, whatever the written value.
    #[default]
    Flip,
    /// Visibility becomes the truthiness of the written value.
    Mirror,
}

// =============================================================================
// Entry Points
// =============================================================================

/// Paint the initial state: hide every entry whose `visible` is false.
///
/// Visible entries need no mutation. Returns the number of document mutations.
pub fn initial_paint(document: &mut Document, registry: &mut ShowRegistry) -> usize {
    let mut mutations = 0;
    for entry in registry.iter_mut().filter(|entry| !entry.visible) {
        if hide(document, entry) {
            mutations += 1;
        }
    }
    debug!(entries = registry.len(), mutations, "initial paint");
    mutations
}

/// Update every entry bound to `key` after a write of `value`.
///
/// Entries bound to other keys are untouched. Returns the number of entries
/// whose state was updated.
pub fn on_key_changed(
    document: &mut Document,
    registry: &mut ShowRegistry,
    key: &str,
    value: Option<&Value>,
    policy: SyncPolicy,
) -> usize {
    let mut touched = 0;
    for entry in registry.iter_mut().filter(|entry| entry.bound_key == key) {
        entry.visible = match policy {
            SyncPolicy::Flip => !entry.visible,
            SyncPolicy::Mirror => value.is_truthy(),
        };
        if entry.visible {
            show(document, entry);
        } else {
            hide(document, entry);
        }
        touched += 1;
    }
    trace!(key, touched, "sync pass");
    touched
}

// =============================================================================
// Transitions
// =============================================================================

/// Bring an entry into its hidden state. Returns true if the document changed.
fn hide(document: &mut Document, entry: &mut ShowEntry) -> bool {
    match entry.kind {
        ShowKind::Conditional => hide_conditional(document, entry),
        ShowKind::Toggle => suppress(document, entry),
    }
}

/// Bring an entry into its visible state. Returns true if the document changed.
fn show(document: &mut Document, entry: &mut ShowEntry) -> bool {
    match entry.kind {
        ShowKind::Conditional => show_conditional(document, entry),
        ShowKind::Toggle => display(document, entry),
    }
}

fn hide_conditional(document: &mut Document, entry: &mut ShowEntry) -> bool {
    // Already hidden: the placeholder holds the slot
    if entry
        .placeholder
        .is_some_and(|placeholder| document.parent(placeholder).is_some())
    {
        return false;
    }
    let Some(parent) = document.parent(entry.node) else {
        debug!(node = %entry.node, key = %entry.bound_key, "conditional element has no parent; skipped");
        return false;
    };

    let placeholder = *entry
        .placeholder
        .get_or_insert_with(|| document.create_comment(PLACEHOLDER_TEXT));
    match document.replace_child(parent, placeholder, entry.node) {
        Ok(()) => true,
        Err(err) => {
            debug!(node = %entry.node, error = %err, "hide failed");
            false
        }
    }
}

fn show_conditional(document: &mut Document, entry: &mut ShowEntry) -> bool {
    // Never hidden, or already restored
    let Some(placeholder) = entry.placeholder else {
        return false;
    };
    let Some(parent) = document.parent(placeholder) else {
        return false;
    };

    match document.replace_child(parent, entry.node, placeholder) {
        Ok(()) => true,
        Err(err) => {
            debug!(node = %entry.node, error = %err, "restore failed");
            false
        }
    }
}

fn suppress(document: &mut Document, entry: &mut ShowEntry) -> bool {
    if document.style(entry.node, DISPLAY) == Some(SUPPRESSED) {
        return false;
    }
    entry.restore_display = document.style(entry.node, DISPLAY).map(str::to_owned);
    match document.set_style(entry.node, DISPLAY, SUPPRESSED) {
        Ok(()) => true,
        Err(err) => {
            debug!(node = %entry.node, error = %err, "suppress failed");
            false
        }
    }
}

fn display(document: &mut Document, entry: &mut ShowEntry) -> bool {
    if document.style(entry.node, DISPLAY) != Some(SUPPRESSED) {
        return false;
    }
    let result = match entry.restore_display.take() {
        Some(previous) => document.set_style(entry.node, DISPLAY, &previous),
        None => document.remove_style(entry.node, DISPLAY).map(|_| ()),
    };
    match result {
        Ok(()) => true,
        Err(err) => {
            debug!(node = %entry.node, error = %err, "display failed");
            false
        }
    }
}
