use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::{Source, Subscriber, Subscribers, observe, track};

/// A lazily evaluated, cached derivation.
///
/// The computation runs on first read and afterwards only when a state or
/// memo it read during its previous run has changed. Dependencies are
/// rediscovered on every run, so branches that stop reading a source also
/// stop depending on it.
///
/// Reading a memo from inside its own computation is a cycle and panics.
pub struct Memo<T> {
    inner: Rc<MemoInner<T>>,
}

struct MemoInner<T> {
    compute: Box<dyn Fn() -> T>,
    value: RefCell<Option<T>>,
    stale: Cell<bool>,
    computing: Cell<bool>,
    runs: Cell<u64>,
    sources: RefCell<Vec<Weak<dyn Source>>>,
    subscribers: Subscribers,
}

impl<T: 'static> MemoInner<T> {
    fn refresh(self: &Rc<Self>) {
        if self.computing.replace(true) {
            panic!("reactive cycle: memo read while it is being computed");
        }

        let _guard = ComputingGuard(&self.computing);

        let id = Rc::as_ptr(self) as *const ();
        for source in self.sources.take() {
            if let Some(source) = source.upgrade() {
                source.unsubscribe(id);
            }
        }

        let (value, sources) = observe(|| (self.compute)());

        let weak = Rc::downgrade(self) as Weak<dyn Subscriber>;
        for source in &sources {
            source.subscribe(weak.clone());
        }

        *self.sources.borrow_mut() = sources.iter().map(Rc::downgrade).collect();
        *self.value.borrow_mut() = Some(value);
        self.runs.set(self.runs.get() + 1);
        self.stale.set(false);
    }
}

/// Clears the computing flag even if the computation panics.
struct ComputingGuard<'a>(&'a Cell<bool>);

impl Drop for ComputingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<T> Subscriber for MemoInner<T> {
    fn invalidate(&self) {
        if self.stale.replace(true) {
            return;
        }
        self.subscribers.notify();
    }
}

impl<T> Source for MemoInner<T> {
    fn subscribe(&self, subscriber: Weak<dyn Subscriber>) {
        self.subscribers.add(subscriber);
    }

    fn unsubscribe(&self, subscriber: *const ()) {
        self.subscribers.remove(subscriber);
    }
}

impl<T> Drop for MemoInner<T> {
    fn drop(&mut self) {
        let id = self as *const Self as *const ();
        for source in self.sources.get_mut().drain(..) {
            if let Some(source) = source.upgrade() {
                source.unsubscribe(id);
            }
        }
    }
}

impl<T: 'static> Memo<T> {
    /// Create a memo. Nothing is computed until the first read.
    pub fn new(compute: impl Fn() -> T + 'static) -> Self {
        Self {
            inner: Rc::new(MemoInner {
                compute: Box::new(compute),
                value: RefCell::new(None),
                stale: Cell::new(true),
                computing: Cell::new(false),
                runs: Cell::new(0),
                sources: RefCell::new(Vec::new()),
                subscribers: Subscribers::default(),
            }),
        }
    }

    /// Get a clone of the current value, recomputing it first if stale.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Borrow the current value, recomputing it first if stale.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        if self.inner.stale.get() {
            self.inner.refresh();
        }
        track(self.inner.clone());

        let value = self.inner.value.borrow();
        match value.as_ref() {
            Some(value) => f(value),
            None => unreachable!("memo value is always set after a refresh"),
        }
    }

    /// Whether the next read will recompute.
    pub fn is_stale(&self) -> bool {
        self.inner.stale.get()
    }

    /// How many times the computation has run.
    pub fn runs(&self) -> u64 {
        self.inner.runs.get()
    }
}

impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("value", &self.inner.value.borrow())
            .field("stale", &self.inner.stale.get())
            .finish()
    }
}
