//! Pull-based reactivity used by the validation engine.
//!
//! - [`State`]: a shared mutable box. Reads are recorded by whatever
//!   [`Memo`] is currently evaluating; writes invalidate those memos.
//! - [`Memo`]: a lazily evaluated, cached derivation. It recomputes only
//!   when one of the sources it read during its last evaluation changed.
//! - [`Store`]: a keyed map of `State<serde_json::Value>` where every entry
//!   is tracked like a standalone state.
//! - [`Signal`]: either a raw value or a reactive handle; [`Signal::get`]
//!   unwraps both.
//!
//! Invalidation is pushed eagerly (a write marks every transitive dependent
//! stale) but recomputation is pulled: nothing runs until a stale memo is
//! read again.
//!
//! Everything here is single-threaded (`Rc`-based). The observer stack is
//! thread-local.

mod memo;
mod signal;
mod state;
mod store;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub use memo::Memo;
pub use signal::Signal;
pub use state::State;
pub use store::{IntoStore, Store};

thread_local! {
    /// One frame per memo currently evaluating, innermost last.
    static OBSERVERS: RefCell<Vec<Vec<Rc<dyn Source>>>> = const { RefCell::new(Vec::new()) };
}

/// Something a memo can depend on.
pub(crate) trait Source {
    fn subscribe(&self, subscriber: Weak<dyn Subscriber>);
    fn unsubscribe(&self, subscriber: *const ());
}

/// Something that must be told when a source it read has changed.
pub(crate) trait Subscriber {
    fn invalidate(&self);
}

/// Subscriber list shared by states and memos.
#[derive(Default)]
pub(crate) struct Subscribers(RefCell<Vec<Weak<dyn Subscriber>>>);

impl Subscribers {
    pub(crate) fn add(&self, subscriber: Weak<dyn Subscriber>) {
        let mut list = self.0.borrow_mut();
        let id = subscriber.as_ptr() as *const ();
        if !list.iter().any(|s| s.as_ptr() as *const () == id) {
            list.push(subscriber);
        }
    }

    pub(crate) fn remove(&self, id: *const ()) {
        self.0
            .borrow_mut()
            .retain(|s| s.as_ptr() as *const () != id && s.strong_count() > 0);
    }

    /// Invalidate every live subscriber. The list is snapshotted first so
    /// subscribers may (un)subscribe while being notified.
    pub(crate) fn notify(&self) {
        let snapshot: Vec<Weak<dyn Subscriber>> = self.0.borrow().clone();
        for subscriber in snapshot {
            if let Some(subscriber) = subscriber.upgrade() {
                subscriber.invalidate();
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.0.borrow().iter().filter(|s| s.strong_count() > 0).count()
    }
}

/// Record a read of `source` in the innermost evaluating memo, if any.
pub(crate) fn track(source: Rc<dyn Source>) {
    OBSERVERS.with(|stack| {
        if let Some(frame) = stack.borrow_mut().last_mut() {
            frame.push(source);
        }
    });
}

/// Pops the observer frame even if the evaluation panics.
struct FrameGuard;

impl Drop for FrameGuard {
    fn drop(&mut self) {
        OBSERVERS.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Run `f` in a fresh observer frame and return what it read.
pub(crate) fn observe<T>(f: impl FnOnce() -> T) -> (T, Vec<Rc<dyn Source>>) {
    OBSERVERS.with(|stack| stack.borrow_mut().push(Vec::new()));
    let guard = FrameGuard;
    let value = f();
    let sources = OBSERVERS.with(|stack| {
        stack
            .borrow_mut()
            .last_mut()
            .map(std::mem::take)
            .unwrap_or_default()
    });
    drop(guard);
    (value, sources)
}

/// Evaluate `f` without recording any dependency in the enclosing memo.
pub fn untrack<T>(f: impl FnOnce() -> T) -> T {
    observe(f).0
}
