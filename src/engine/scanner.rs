//! Directive Scanner - One pass over the managed subtree.
//!
//! Walks every descendant of the root depth-first in document order (the root
//! itself is not inspected). For each element:
//! 1. a conditional directive creates a Conditional show entry,
//! 2. otherwise a toggle directive creates a Toggle show entry,
//! 3. independently, a click directive creates an event entry.
//!
//! A click directive naming an unknown method still produces an event entry
//! (with no handler) and is recorded as a [`DirectiveIssue::LookupMiss`].
//! The scan never stops early.

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use super::directives::{Directive, DirectiveSet, DirectiveSyntax};
use super::registry::{EventEntry, EventRegistry, ShowEntry, ShowRegistry};
use super::store::ReactiveData;
use crate::config::Methods;
use crate::dom::{Document, ElementData, NodeId};
use crate::error::DirectiveIssue;

/// Everything the scan found.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub show: ShowRegistry,
    pub events: EventRegistry,
    pub issues: Vec<DirectiveIssue>,
    /// Directive kinds present on each directive-bearing node, in scan order.
    pub directives: IndexMap<NodeId, DirectiveSet>,
}

/// Scan the descendants of `root`.
pub fn scan(
    document: &Document,
    root: NodeId,
    data: &ReactiveData,
    methods: &Methods,
    syntax: &DirectiveSyntax,
) -> ScanOutcome {
    let scanner = Scanner {
        document,
        data,
        methods,
        syntax,
    };
    let mut outcome = ScanOutcome::default();
    scanner.visit_children(root, &mut outcome);

    debug!(
        root = %root,
        show = outcome.show.len(),
        events = outcome.events.len(),
        issues = outcome.issues.len(),
        "directive scan complete"
    );
    outcome
}

struct Scanner<'a> {
    document: &'a Document,
    data: &'a ReactiveData,
    methods: &'a Methods,
    syntax: &'a DirectiveSyntax,
}

impl Scanner<'_> {
    fn visit_children(&self, parent: NodeId, outcome: &mut ScanOutcome) {
        for &child in self.document.children(parent) {
            if let Some(element) = self.document.element(child) {
                self.inspect(child, element, outcome);
            }
            self.visit_children(child, outcome);
        }
    }

    fn inspect(&self, node: NodeId, element: &ElementData, outcome: &mut ScanOutcome) {
        let found = self.syntax.extract_all(element);
        if found.is_empty() {
            return;
        }

        let mut present = DirectiveSet::empty();
        let mut has_show = false;

        for directive in found {
            present |= directive.kind().flag();
            match directive {
                Directive::Conditional { .. } | Directive::Toggle { .. } if has_show => {
                    trace!(node = %node, "toggle directive shadowed by conditional directive");
                }
                Directive::Conditional { key } => {
                    has_show = true;
                    let visible = self.data.is_truthy(&key);
                    trace!(node = %node, key = %key, visible, "conditional entry");
                    outcome.show.insert(ShowEntry::conditional(node, key, visible));
                }
                Directive::Toggle { key } => {
                    has_show = true;
                    let visible = self.data.is_truthy(&key);
                    trace!(node = %node, key = %key, visible, "toggle entry");
                    outcome.show.insert(ShowEntry::toggle(node, key, visible));
                }
                Directive::Click { method } => {
                    let handler = self.methods.get(&method).cloned();
                    if handler.is_none() {
                        warn!(node = %node, method = %method, "click directive names an unknown method");
                        outcome.issues.push(DirectiveIssue::LookupMiss {
                            node,
                            method: method.clone(),
                        });
                    }
                    outcome.events.insert(EventEntry {
                        node,
                        method,
                        handler,
                    });
                }
            }
        }

        outcome.directives.insert(node, present);
    }
}
