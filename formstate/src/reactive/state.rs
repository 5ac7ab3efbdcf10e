use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::{Source, Subscriber, Subscribers, track};

/// Reactive state wrapper with interior mutability.
///
/// `State<T>` is cheap to clone; clones share the same value. Reading it
/// from inside a [`Memo`](super::Memo) computation registers the memo as a
/// dependent, and every effective write invalidates those dependents.
///
/// # Example
///
/// ```
/// use formstate::reactive::{Memo, State};
///
/// let count = State::new(1);
/// let doubled = Memo::new({
///     let count = count.clone();
///     move || count.get() * 2
/// });
///
/// assert_eq!(doubled.get(), 2);
/// count.set(5);
/// assert_eq!(doubled.get(), 10);
/// ```
pub struct State<T> {
    inner: Rc<StateInner<T>>,
}

struct StateInner<T> {
    value: RefCell<T>,
    version: std::cell::Cell<u64>,
    subscribers: Subscribers,
}

impl<T> Source for StateInner<T> {
    fn subscribe(&self, subscriber: Weak<dyn Subscriber>) {
        self.subscribers.add(subscriber);
    }

    fn unsubscribe(&self, subscriber: *const ()) {
        self.subscribers.remove(subscriber);
    }
}

impl<T: 'static> State<T> {
    /// Create a new state with the given value
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(StateInner {
                value: RefCell::new(value),
                version: std::cell::Cell::new(0),
                subscribers: Subscribers::default(),
            }),
        }
    }

    /// Get a clone of the current value
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.track();
        self.inner.value.borrow().clone()
    }

    /// Get a clone of the current value without registering a dependency
    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.borrow().clone()
    }

    /// Borrow the current value
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.track();
        f(&self.inner.value.borrow())
    }

    /// Set a new value. Writing a value equal to the current one is a no-op.
    pub fn set(&self, value: T)
    where
        T: PartialEq,
    {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return;
            }
            *current = value;
        }
        self.changed();
    }

    /// Replace the value unconditionally and return the previous one
    pub fn replace(&self, value: T) -> T {
        let previous = self.inner.value.replace(value);
        self.changed();
        previous
    }

    /// Update the value using a closure
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.inner.value.borrow_mut());
        self.changed();
    }

    /// Number of effective writes since creation
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Number of live memos currently depending on this state
    pub fn observer_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    /// Whether both handles point at the same state
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn track(&self) {
        track(self.inner.clone());
    }

    fn changed(&self) {
        self.inner.version.set(self.inner.version.get() + 1);
        self.inner.subscribers.notify();
    }
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Default + 'static> Default for State<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("value", &self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}
