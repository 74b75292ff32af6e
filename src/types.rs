//! Core types for spark-bind.
//!
//! Data values are plain JSON values. What the engine needs on top of that is
//! a notion of truthiness that decides the initial visibility of a directive.

pub use serde_json::Value;

// =============================================================================
// Truthiness
// =============================================================================

/// Boolean interpretation of a data value.
///
/// `null`, `false`, `0`, `-0` and `""` are falsy. Everything else, including
/// empty arrays and objects, is truthy.
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

/// A missing value reads as absent, which is falsy.
impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}
