use serde_json::Value;

use super::{Memo, State};

/// A value that may or may not be reactive.
///
/// Rule parameters and store entries accept a `Signal` so callers can pass
/// either a plain value or a live handle. [`Signal::get`] unwraps all three
/// shapes; reading a reactive variant inside a memo is tracked as usual.
#[derive(Debug, Clone)]
pub enum Signal<T> {
    /// A plain value.
    Static(T),
    /// A shared mutable state.
    State(State<T>),
    /// A derived value.
    Memo(Memo<T>),
}

impl<T: Clone + 'static> Signal<T> {
    /// Unwrap to the current raw value.
    pub fn get(&self) -> T {
        match self {
            Self::Static(value) => value.clone(),
            Self::State(state) => state.get(),
            Self::Memo(memo) => memo.get(),
        }
    }

    /// Whether reads of this signal can change over time.
    pub fn is_reactive(&self) -> bool {
        !matches!(self, Self::Static(_))
    }
}

impl<T> From<State<T>> for Signal<T> {
    fn from(state: State<T>) -> Self {
        Self::State(state)
    }
}

impl<T> From<Memo<T>> for Signal<T> {
    fn from(memo: Memo<T>) -> Self {
        Self::Memo(memo)
    }
}

impl From<Value> for Signal<Value> {
    fn from(value: Value) -> Self {
        Self::Static(value)
    }
}

impl From<usize> for Signal<usize> {
    fn from(value: usize) -> Self {
        Self::Static(value)
    }
}

impl From<String> for Signal<String> {
    fn from(value: String) -> Self {
        Self::Static(value)
    }
}

impl From<&str> for Signal<String> {
    fn from(value: &str) -> Self {
        Self::Static(value.to_string())
    }
}
