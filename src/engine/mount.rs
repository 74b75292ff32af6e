//! Mount API - Engine construction and the data facade.
//!
//! Mounting runs the whole startup sequence once:
//!
//! ```text
//! resolve root → wrap data → scan directives → initial paint → bind clicks
//! ```
//!
//! After that, every [`Engine::set`] synchronously runs one sync pass for the
//! written key before returning.
//!
//! # Example
//!
//! ```ignore
//! use spark_bind::{Document, Engine, Options, dispatch_click};
//!
//! let document = Document::parse(r#"
//!     <div id="app">
//!         <p conditional-render="open">Details</p>
//!         <button on-click="toggle">More</button>
//!     </div>
//! "#)?.into_shared();
//!
//! let engine = Engine::mount(
//!     Options::new("#app")
//!         .data("open", false)
//!         .method("toggle", |engine, _event| {
//!             let open = engine.is_truthy("open");
//!             engine.set("open", !open);
//!         }),
//!     &document,
//! )?;
//!
//! let button = document.borrow().query_selector("button")?.unwrap();
//! dispatch_click(&document, button); // <p> is now back in the tree
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use tracing::debug;

use super::binder;
use super::directives::{DirectiveSet, DirectiveSyntax};
use super::registry::{ShowEntry, ShowRegistry};
use super::scanner::{self, ScanOutcome};
use super::store::ReactiveData;
use super::sync::{self, SyncPolicy};
use crate::config::{Methods, Options};
use crate::dom::{Event, NodeId, SharedDocument};
use crate::error::{BindError, ConfigError, DirectiveIssue};
use crate::types::Value;

// =============================================================================
// Mount Report
// =============================================================================

/// What mounting found and did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountReport {
    /// Show entries tracked (conditional + toggle).
    pub show_entries: usize,
    /// Click entries found, resolved or not.
    pub event_entries: usize,
    /// Click listeners actually attached.
    pub listeners: usize,
    /// Document mutations made by the initial paint.
    pub painted: usize,
    /// Non-fatal findings from the scan.
    pub issues: Vec<DirectiveIssue>,
    /// Every directive kind written on each element, shadowed ones included.
    pub directives: IndexMap<NodeId, DirectiveSet>,
}

// =============================================================================
// Engine
// =============================================================================

struct EngineInner {
    document: SharedDocument,
    root: NodeId,
    data: ReactiveData,
    methods: Methods,
    show: RefCell<ShowRegistry>,
    policy: SyncPolicy,
    report: RefCell<MountReport>,
}

impl EngineInner {
    /// Run one sync pass for `key`.
    fn sync_key(&self, key: &str) {
        let value = self.data.get(key);
        let mut document = self.document.borrow_mut();
        let mut registry = self.show.borrow_mut();
        sync::on_key_changed(&mut document, &mut registry, key, value.as_ref(), self.policy);
    }
}

/// A mounted binding engine.
///
/// Cheap to clone; clones share the same data, registries and document.
#[derive(Clone)]
pub struct Engine {
    inner: Rc<EngineInner>,
}

/// Non-owning engine handle, held by click listeners.
#[derive(Clone)]
pub struct WeakEngine {
    inner: Weak<EngineInner>,
}

impl WeakEngine {
    pub fn upgrade(&self) -> Option<Engine> {
        self.inner.upgrade().map(|inner| Engine { inner })
    }
}

impl fmt::Debug for WeakEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEngine")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("root", &self.inner.root)
            .field("data", &self.inner.data)
            .field("methods", &self.inner.methods)
            .field("policy", &self.inner.policy)
            .field("show_entries", &self.inner.show.borrow().len())
            .finish()
    }
}

impl Engine {
    /// Mount an engine on the subtree `options.selector` selects.
    ///
    /// Fails only on configuration problems (bad selector, no match).
    /// Directive problems are reported in [`Engine::report`] instead.
    pub fn mount(options: Options, document: &SharedDocument) -> Result<Self, BindError> {
        let Options {
            selector,
            data,
            methods,
            directives,
            sync: policy,
        } = options;

        let root = document
            .borrow()
            .query_selector(&selector)
            .map_err(|source| ConfigError::InvalidSelector {
                selector: selector.clone(),
                source,
            })?
            .ok_or_else(|| ConfigError::RootNotFound {
                selector: selector.clone(),
            })?;

        let inner = Rc::new_cyclic(|weak: &Weak<EngineInner>| {
            let data = ReactiveData::new(data);
            let observer = weak.clone();
            data.observe(move |key| {
                if let Some(inner) = observer.upgrade() {
                    inner.sync_key(key);
                }
            });

            EngineInner {
                document: document.clone(),
                root,
                data,
                methods,
                show: RefCell::new(ShowRegistry::new()),
                policy,
                report: RefCell::new(MountReport::default()),
            }
        });

        let engine = Engine { inner };
        engine.initialize(&directives);
        debug!(selector = %selector, root = %root, "engine mounted");
        Ok(engine)
    }

    /// Scan, paint and bind. Runs exactly once, from `mount`.
    fn initialize(&self, syntax: &DirectiveSyntax) {
        let inner = &self.inner;

        let ScanOutcome {
            show,
            events,
            issues,
            directives,
        } = {
            let document = inner.document.borrow();
            scanner::scan(&document, inner.root, &inner.data, &inner.methods, syntax)
        };

        let mut document = inner.document.borrow_mut();
        let mut registry = inner.show.borrow_mut();
        *registry = show;

        let painted = sync::initial_paint(&mut document, &mut registry);
        let event_entries = events.len();
        let listeners = binder::bind(&mut document, events, &self.downgrade());

        *inner.report.borrow_mut() = MountReport {
            show_entries: registry.len(),
            event_entries,
            listeners,
            painted,
            issues,
            directives,
        };
    }

    pub fn downgrade(&self) -> WeakEngine {
        WeakEngine {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Do both handles refer to the same engine?
    pub fn ptr_eq(&self, other: &Engine) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    /// Current value for `key`. No side effects.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.data.get(key)
    }

    /// Truthiness of the current value for `key`.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.inner.data.is_truthy(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.data.contains_key(key)
    }

    /// Data keys in insertion order, including keys added after mount.
    pub fn keys(&self) -> Vec<String> {
        self.inner.data.keys()
    }

    /// Write a value and synchronize every entry bound to `key`.
    ///
    /// The sync pass completes before this returns. Returns the previous value.
    ///
    /// # Panics
    ///
    /// Panics if the caller holds a borrow of the document during the write.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.inner.data.set(key, value)
    }

    /// Copy of all data.
    pub fn data_snapshot(&self) -> IndexMap<String, Value> {
        self.inner.data.snapshot()
    }

    // -------------------------------------------------------------------------
    // Methods
    // -------------------------------------------------------------------------

    /// Call a method directly, as if its element had been clicked.
    pub fn invoke(&self, method: &str) -> Result<(), BindError> {
        let handler = self
            .inner
            .methods
            .get(method)
            .cloned()
            .ok_or_else(|| BindError::LookupMiss {
                method: method.to_string(),
            })?;
        handler(self, &Event::click(self.inner.root));
        Ok(())
    }

    pub fn method_names(&self) -> Vec<String> {
        self.inner.methods.names().map(str::to_owned).collect()
    }

    // -------------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------------

    /// The element whose subtree this engine manages.
    pub fn root(&self) -> NodeId {
        self.inner.root
    }

    pub fn document(&self) -> SharedDocument {
        self.inner.document.clone()
    }

    pub fn policy(&self) -> SyncPolicy {
        self.inner.policy
    }

    pub fn report(&self) -> MountReport {
        self.inner.report.borrow().clone()
    }

    pub fn issues(&self) -> Vec<DirectiveIssue> {
        self.inner.report.borrow().issues.clone()
    }

    /// Directive kinds written on `node`. Empty for elements without any.
    pub fn directives_on(&self, node: NodeId) -> DirectiveSet {
        self.inner
            .report
            .borrow()
            .directives
            .get(&node)
            .copied()
            .unwrap_or_default()
    }

    /// Current tracking state of one element.
    pub fn show_entry(&self, node: NodeId) -> Option<ShowEntry> {
        self.inner.show.borrow().get(node).cloned()
    }

    /// Current tracking state of every element, in scan order.
    pub fn show_entries(&self) -> Vec<ShowEntry> {
        self.inner.show.borrow().iter().cloned().collect()
    }
}
