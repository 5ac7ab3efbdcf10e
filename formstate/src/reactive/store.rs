use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Signal, State};
use crate::error::FormError;

/// Deep-reactive value store.
///
/// Every key maps to its own [`State`], so a memo that reads `username`
/// is not invalidated by a write to `email`. Clones share the same
/// entries. The set of keys itself is not tracked: adding a key after a
/// form was built does not rebuild anything.
#[derive(Clone, Default)]
pub struct Store {
    entries: Rc<RefCell<IndexMap<String, State<Value>>>>,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON object. Any other JSON value is rejected.
    pub fn from_value(value: Value) -> Result<Self, FormError> {
        match value {
            Value::Object(map) => Ok(Self::from(map)),
            _ => Err(FormError::NotAnObject),
        }
    }

    /// Insert or overwrite an entry.
    ///
    /// A [`Signal::State`] is adopted as-is so the store and the caller
    /// share the same cell. Other signals are unwrapped into a new state.
    /// Overwriting an existing key with a plain value writes through the
    /// existing state instead of replacing it.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Signal<Value>>) {
        let key = key.into();
        match value.into() {
            Signal::State(state) => {
                self.entries.borrow_mut().insert(key, state);
            }
            signal => {
                let value = signal.get();
                self.set(key, value);
            }
        }
    }

    /// Builder-style [`Store::insert`]
    pub fn with(self, key: impl Into<String>, value: impl Into<Signal<Value>>) -> Self {
        self.insert(key, value);
        self
    }

    /// Tracked read of one entry
    pub fn get(&self, key: &str) -> Option<Value> {
        self.state(key).map(|state| state.get())
    }

    /// Write one entry, creating it if absent.
    ///
    /// This bypasses dirty tracking; form fields should be written through
    /// their model instead.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let existing = self.entries.borrow().get(&key).cloned();
        match existing {
            Some(state) => state.set(value),
            None => {
                self.entries.borrow_mut().insert(key, State::new(value));
            }
        }
    }

    /// The state backing one entry
    pub fn state(&self, key: &str) -> Option<State<Value>> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Untracked snapshot of every entry as a JSON object
    pub fn to_value(&self) -> Value {
        let entries = self.entries.borrow();
        Value::Object(
            entries
                .iter()
                .map(|(key, state)| (key.clone(), state.get_untracked()))
                .collect(),
        )
    }

    /// Whether both handles share the same entries
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }
}

/// Conversion into a [`Store`], wrapping plain values and adopting an
/// existing store as-is.
pub trait IntoStore {
    fn into_store(self) -> Result<Store, FormError>;
}

impl IntoStore for Store {
    fn into_store(self) -> Result<Store, FormError> {
        Ok(self)
    }
}

impl IntoStore for &Store {
    fn into_store(self) -> Result<Store, FormError> {
        Ok(self.clone())
    }
}

impl IntoStore for Value {
    fn into_store(self) -> Result<Store, FormError> {
        Store::from_value(self)
    }
}

impl IntoStore for Map<String, Value> {
    fn into_store(self) -> Result<Store, FormError> {
        Ok(Store::from(self))
    }
}

impl From<Map<String, Value>> for Store {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Store {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let store = Self::new();
        for (key, value) in iter {
            store.set(key, value);
        }
        store
    }
}

impl TryFrom<Value> for Store {
    type Error = FormError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Store").field(&self.to_value()).finish()
    }
}
