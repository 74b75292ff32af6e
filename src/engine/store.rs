//! Reactive Data - Write interception for the engine's data.
//!
//! Reads are passthrough. Every write stores the value and then bumps a
//! `last_write` signal; the observer is an effect on that signal, so it runs
//! with exactly the written key, synchronously, before `set` returns.
//!
//! Each write carries a fresh sequence number. Writing the same value twice is
//! two distinct signal values and therefore notifies twice.

use std::cell::{Cell, RefCell};
use std::fmt;

use indexmap::IndexMap;
use spark_signals::{effect, signal, Signal};

use crate::types::{Truthy, Value};

/// One write, as seen by the observer.
#[derive(Debug, Clone, PartialEq)]
struct Write {
    key: String,
    seq: u64,
}

/// Key/value store that reports every write.
pub struct ReactiveData {
    values: RefCell<IndexMap<String, Value>>,
    last_write: Signal<Option<Write>>,
    seq: Cell<u64>,
    stop_observer: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl fmt::Debug for ReactiveData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveData")
            .field("values", &self.values.borrow())
            .field("writes", &self.seq.get())
            .field("observed", &self.stop_observer.borrow().is_some())
            .finish()
    }
}

impl Default for ReactiveData {
    fn default() -> Self {
        Self::new(IndexMap::new())
    }
}

impl Drop for ReactiveData {
    fn drop(&mut self) {
        if let Some(stop) = self.stop_observer.get_mut().take() {
            stop();
        }
    }
}

impl ReactiveData {
    /// Take ownership of the initial values. No observer yet.
    pub fn new(values: IndexMap<String, Value>) -> Self {
        Self {
            values: RefCell::new(values),
            last_write: signal(None),
            seq: Cell::new(0),
            stop_observer: RefCell::new(None),
        }
    }

    /// Install the write observer, replacing (and stopping) any previous one.
    ///
    /// Only writes made after this call are reported.
    pub fn observe(&self, observer: impl Fn(&str) + 'static) {
        let last_write = self.last_write.clone();
        let mut primed = false;

        let stop = effect(move || {
            // Always read, so the dependency is tracked on the first run too
            let write = last_write.get();
            if !primed {
                primed = true;
                return;
            }
            if let Some(write) = write {
                observer(&write.key);
            }
        });

        let previous = self.stop_observer.borrow_mut().replace(Box::new(stop));
        if let Some(stop) = previous {
            stop();
        }
    }

    /// Current value for `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    /// Read a value in place without cloning it.
    pub fn with<R>(&self, key: &str, f: impl FnOnce(Option<&Value>) -> R) -> R {
        f(self.values.borrow().get(key))
    }

    /// Truthiness of the current value (absent is falsy).
    pub fn is_truthy(&self, key: &str) -> bool {
        self.with(key, |value| value.is_truthy())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }

    /// Keys in insertion order. Dynamically added keys come last.
    pub fn keys(&self) -> Vec<String> {
        self.values.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    /// Number of writes so far.
    pub fn writes(&self) -> u64 {
        self.seq.get()
    }

    /// Copy of every key/value pair.
    pub fn snapshot(&self) -> IndexMap<String, Value> {
        self.values.borrow().clone()
    }

    /// Store `value` under `key`, then notify the observer with `key`.
    ///
    /// Any key may be written, known or not. Returns the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        // The borrow ends here, before the observer runs
        let previous = self.values.borrow_mut().insert(key.clone(), value.into());

        let seq = self.seq.get() + 1;
        self.seq.set(seq);
        self.last_write.set(Some(Write { key, seq }));
        previous
    }
}
