//! Error types.
//!
//! Two families:
//! - Hard failures ([`BindError`], [`ConfigError`], [`ParseError`],
//!   [`SelectorError`], [`DomError`]) returned as `Err`.
//! - Soft findings ([`DirectiveIssue`]) collected while scanning directives.
//!   They never abort a mount; they are reported on the engine afterwards.

use thiserror::Error;

use crate::dom::NodeId;

/// Errors surfaced by the engine facade.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("no method named {method:?}")]
    LookupMiss { method: String },
}

/// Problems with the options an engine is mounted with.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("root selector {selector:?} matched no element")]
    RootNotFound { selector: String },

    #[error("invalid root selector {selector:?}: {source}")]
    InvalidSelector {
        selector: String,
        #[source]
        source: SelectorError,
    },

    #[error("invalid options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Non-fatal findings from the directive scan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveIssue {
    #[error("{node} names unknown method {method:?} in its click directive")]
    LookupMiss { node: NodeId, method: String },
}

/// Invalid tree operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("unknown {0}")]
    UnknownNode(NodeId),

    #[error("{child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("{0} is not an element")]
    NotAnElement(NodeId),

    #[error("{0} cannot have children")]
    NotAContainer(NodeId),

    #[error("inserting {child} into {parent} would break the tree")]
    Hierarchy { parent: NodeId, child: NodeId },
}

/// Markup fragment parse failures. Offsets are byte positions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unterminated comment starting at byte {offset}")]
    UnterminatedComment { offset: usize },

    #[error("unterminated tag <{tag}> starting at byte {offset}")]
    UnterminatedTag { tag: String, offset: usize },

    #[error("unterminated attribute value at byte {offset}")]
    UnterminatedAttribute { offset: usize },

    #[error("unexpected {found:?} at byte {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("closing tag </{tag}> at byte {offset} does not match the open element")]
    UnexpectedClosingTag { tag: String, offset: usize },

    #[error("element <{tag}> is never closed")]
    Unclosed { tag: String },

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Selector syntax errors. Offsets are byte positions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,

    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("expected a name at offset {offset}")]
    ExpectedName { offset: usize },
}
