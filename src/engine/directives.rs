//! Directives - The fixed set of attributes the scanner understands.
//!
//! There are exactly three directive kinds. Each has a typed extraction from an
//! element; unrecognized attributes are ignored.
//!
//! | Kind        | Default attribute    | Vue-style alias | Binds       |
//! |-------------|----------------------|-----------------|-------------|
//! | Conditional | `conditional-render` | `v-if`          | data key    |
//! | Toggle      | `toggle-visible`     | `v-show`        | data key    |
//! | Click       | `on-click`           | `@click`        | method name |

use serde::{Deserialize, Serialize};

use crate::dom::ElementData;

// =============================================================================
// Directive Kinds
// =============================================================================

bitflags::bitflags! {
    /// Which directive kinds an element carries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DirectiveSet: u8 {
        const CONDITIONAL = 1 << 0;
        const TOGGLE = 1 << 1;
        const CLICK = 1 << 2;
    }
}

/// The recognized directive kinds, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Conditional,
    Toggle,
    Click,
}

impl DirectiveKind {
    pub const ALL: [DirectiveKind; 3] = [
        DirectiveKind::Conditional,
        DirectiveKind::Toggle,
        DirectiveKind::Click,
    ];

    pub fn flag(self) -> DirectiveSet {
        match self {
            DirectiveKind::Conditional => DirectiveSet::CONDITIONAL,
            DirectiveKind::Toggle => DirectiveSet::TOGGLE,
            DirectiveKind::Click => DirectiveSet::CLICK,
        }
    }
}

/// A directive extracted from an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Structural show/hide bound to a data key.
    Conditional { key: String },
    /// Presentation-only show/hide bound to a data key.
    Toggle { key: String },
    /// Click handler bound to a method name.
    Click { method: String },
}

impl Directive {
    pub fn kind(&self) -> DirectiveKind {
        match self {
            Directive::Conditional { .. } => DirectiveKind::Conditional,
            Directive::Toggle { .. } => DirectiveKind::Toggle,
            Directive::Click { .. } => DirectiveKind::Click,
        }
    }
}

// =============================================================================
// Syntax
// =============================================================================

/// Attribute names that carry each directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectiveSyntax {
    pub conditional: String,
    pub toggle: String,
    pub click: String,
}

impl Default for DirectiveSyntax {
    fn default() -> Self {
        Self {
            conditional: "conditional-render".into(),
            toggle: "toggle-visible".into(),
            click: "on-click".into(),
        }
    }
}

impl DirectiveSyntax {
    /// `v-if`, `v-show`, `@click`.
    pub fn vue() -> Self {
        Self {
            conditional: "v-if".into(),
            toggle: "v-show".into(),
            click: "@click".into(),
        }
    }

    /// Attribute name for a kind.
    pub fn attribute(&self, kind: DirectiveKind) -> &str {
        match kind {
            DirectiveKind::Conditional => &self.conditional,
            DirectiveKind::Toggle => &self.toggle,
            DirectiveKind::Click => &self.click,
        }
    }

    /// Extract one directive kind from an element.
    ///
    /// An empty (or whitespace-only) attribute value counts as absent.
    pub fn extract(&self, kind: DirectiveKind, element: &ElementData) -> Option<Directive> {
        let value = element.attribute(self.attribute(kind))?.trim();
        if value.is_empty() {
            return None;
        }
        let value = value.to_string();
        Some(match kind {
            DirectiveKind::Conditional => Directive::Conditional { key: value },
            DirectiveKind::Toggle => Directive::Toggle { key: value },
            DirectiveKind::Click => Directive::Click { method: value },
        })
    }

    /// Extract every directive an element carries, in precedence order.
    pub fn extract_all(&self, element: &ElementData) -> Vec<Directive> {
        DirectiveKind::ALL
            .into_iter()
            .filter_map(|kind| self.extract(kind, element))
            .collect()
    }
}
