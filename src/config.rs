//! Options - What an engine is mounted with.
//!
//! Options can be built in code or loaded from JSON. Methods are closures and
//! therefore code-only; everything else has a JSON form:
//!
//! ```json
//! {
//!   "el": "#app",
//!   "data": { "open": false, "count": 0 },
//!   "directives": { "conditional": "v-if", "toggle": "v-show", "click": "@click" },
//!   "sync": "flip"
//! }
//! ```

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::dom::Event;
use crate::engine::{DirectiveSyntax, Engine, SyncPolicy};
use crate::error::ConfigError;
use crate::types::Value;

// =============================================================================
// Methods
// =============================================================================

/// A method callable from a click directive.
///
/// Receives the engine (its data and methods) and the click event.
pub type Method = Rc<dyn Fn(&Engine, &Event)>;

/// Name → method table.
#[derive(Clone, Default)]
pub struct Methods {
    table: IndexMap<String, Method>,
}

impl fmt::Debug for Methods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.table.keys()).finish()
    }
}

impl Methods {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method, replacing any previous one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, method: impl Fn(&Engine, &Event) + 'static) {
        self.table.insert(name.into(), Rc::new(method));
    }

    pub fn get(&self, name: &str) -> Option<&Method> {
        self.table.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Method names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

// =============================================================================
// Options
// =============================================================================

/// Engine construction options.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Options {
    /// Selector of the element whose subtree the engine manages.
    #[serde(alias = "el")]
    pub selector: String,

    /// Initial data, in declaration order.
    #[serde(default)]
    pub data: IndexMap<String, Value>,

    #[serde(skip)]
    pub methods: Methods,

    #[serde(default)]
    pub directives: DirectiveSyntax,

    #[serde(default)]
    pub sync: SyncPolicy,
}

impl Options {
    /// Options managing the subtree under `selector`, with no data or methods.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            data: IndexMap::new(),
            methods: Methods::new(),
            directives: DirectiveSyntax::default(),
            sync: SyncPolicy::default(),
        }
    }

    /// Parse options from JSON. Methods must be added afterwards.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Add one initial data value.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Add a method.
    pub fn method(
        mut self,
        name: impl Into<String>,
        method: impl Fn(&Engine, &Event) + 'static,
    ) -> Self {
        self.methods.insert(name, method);
        self
    }

    /// Replace the method table.
    pub fn methods(mut self, methods: Methods) -> Self {
        self.methods = methods;
        self
    }

    pub fn directives(mut self, syntax: DirectiveSyntax) -> Self {
        self.directives = syntax;
        self
    }

    pub fn sync(mut self, policy: SyncPolicy) -> Self {
        self.sync = policy;
        self
    }
}
