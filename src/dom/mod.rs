//! Document Model - Arena-backed node tree the engine binds against.
//!
//! The engine never owns the caller's tree. It holds a [`SharedDocument`]
//! handle and mutates it only through the operations exposed here:
//! - Tree substitution (`replace_child`)
//! - Inline presentation (`set_style` / `remove_style`)
//! - Listener attachment (`add_event_listener`)
//!
//! # Architecture
//!
//! Nodes are NOT objects. They are indices into a single arena:
//!
//! ```text
//! NodeId(0): Document  (parent=None, children=[1])
//! NodeId(1): <div>     (parent=0,    children=[2, 3])
//! NodeId(2): <p>       (parent=1,    children=[4])
//! NodeId(3): <!--c-->  (parent=1,    children=[])
//! ```
//!
//! A [`NodeId`] stays valid for the lifetime of the document, even while the
//! node is detached. This is what lets a hidden element be swapped back into
//! its slot later.
//!
//! # Example
//!
//! ```ignore
//! use spark_bind::dom::{Document, dispatch_click};
//!
//! let document = Document::parse(r#"<div id="app"><button>Save</button></div>"#)?
//!     .into_shared();
//! let button = document.borrow().query_selector("#app button")?.unwrap();
//! dispatch_click(&document, button);
//! ```

mod document;
mod event;
mod parse;
mod selector;
mod serialize;

pub use document::*;
pub use event::*;
pub use parse::parse_fragment;
pub use selector::Selector;
