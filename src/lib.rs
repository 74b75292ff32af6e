//! # spark-bind
//!
//! Directive-driven reactive view binding for Rust.
//!
//! Mount an engine on a subtree of a document with some data and some methods.
//! Directive attributes in the markup tie elements to data keys and methods:
//!
//! ```html
//! <div id="app">
//!     <p conditional-render="open">detached from the tree while hidden</p>
//!     <p toggle-visible="busy">hidden with display: none</p>
//!     <button on-click="toggle">calls the `toggle` method</button>
//! </div>
//! ```
//!
//! ## Architecture
//!
//! There is no virtual tree and no diffing. A write to the data store triggers
//! one synchronous pass over the elements bound to the written key:
//! ```text
//! engine.set(key) → observer → on_key_changed(key) → document mutation
//! ```
//!
//! ## Modules
//!
//! - [`dom`] - Arena document: parse, query, mutate, serialize, dispatch clicks
//! - [`engine`] - Data store, directive scanner, registries, synchronizer, binder
//! - [`config`] - Mount options and the methods table
//! - [`error`] - Error types
//! - [`types`] - Data values and truthiness

pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use types::{Truthy, Value};

pub use config::{Method, Methods, Options};

pub use dom::{dispatch, dispatch_click, Document, Event, EventType, NodeId, SharedDocument};

pub use engine::{
    DirectiveSet, DirectiveSyntax, Engine, MountReport, ShowEntry, ShowKind, SyncPolicy, WeakEngine,
    PLACEHOLDER_TEXT,
};

pub use error::{BindError, ConfigError, DirectiveIssue, DomError, ParseError, SelectorError};
