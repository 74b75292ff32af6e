//! Binding Engine - Data, directives, registries and synchronization.
//!
//! The engine connects three things:
//! - ReactiveData: the key/value store; every write notifies the engine
//!   through a spark-signals effect
//! - Registries: one ShowEntry per visibility-bound element, one EventEntry
//!   per click-bound element, keyed by node
//! - The document: mutated only by the synchronizer and read by the scanner
//!
//! # Flow
//!
//! ```text
//! mount:  scan ──► ShowRegistry ──► initial_paint
//!              └─► EventRegistry ──► bind (click listeners)
//!
//! set(key, value) ──► observer ──► on_key_changed(key) ──► document
//! click ──► listener ──► method(engine, event) ──► set(...) ──► ...
//! ```
//!
//! Everything runs on one thread, synchronously. A write has finished
//! updating the document by the time `set` returns.

mod binder;
mod directives;
mod mount;
mod registry;
mod scanner;
mod store;
mod sync;

pub use binder::bind;
pub use directives::*;
pub use mount::{Engine, MountReport, WeakEngine};
pub use registry::*;
pub use scanner::{scan, ScanOutcome};
pub use store::ReactiveData;
pub use sync::{initial_paint, on_key_changed, SyncPolicy, PLACEHOLDER_TEXT};
