//! Tests for the reactive substrate.

use std::cell::Cell;
use std::rc::Rc;

use formstate::reactive::{Memo, Signal, State, Store, untrack};
use serde_json::json;

#[test]
fn test_state_set_equal_value_is_a_no_op() {
    let state = State::new(1);
    state.set(1);
    assert_eq!(state.version(), 0);
    state.set(2);
    assert_eq!(state.version(), 1);
}

#[test]
fn test_state_update_and_replace() {
    let state = State::new(vec![1]);
    state.update(|v| v.push(2));
    assert_eq!(state.get(), vec![1, 2]);
    assert_eq!(state.replace(vec![]), vec![1, 2]);
    assert_eq!(state.version(), 2);
}

#[test]
fn test_memo_chain_recomputes_lazily() {
    let base = State::new(1);
    let doubled = Memo::new({
        let base = base.clone();
        move || base.get() * 2
    });
    let plus_one = Memo::new({
        let doubled = doubled.clone();
        move || doubled.get() + 1
    });

    assert_eq!(plus_one.get(), 3);
    base.set(5);
    assert!(doubled.is_stale());
    assert!(plus_one.is_stale());
    assert_eq!(plus_one.get(), 11);
    assert_eq!(doubled.runs(), 2);
    assert_eq!(plus_one.runs(), 2);
}

#[test]
fn test_diamond_recomputes_once_per_change() {
    let base = State::new(1);
    let left = Memo::new({
        let base = base.clone();
        move || base.get() + 1
    });
    let right = Memo::new({
        let base = base.clone();
        move || base.get() * 10
    });
    let calls = Rc::new(Cell::new(0));
    let sum = Memo::new({
        let (left, right, calls) = (left.clone(), right.clone(), Rc::clone(&calls));
        move || {
            calls.set(calls.get() + 1);
            left.get() + right.get()
        }
    });

    assert_eq!(sum.get(), 12);
    base.set(2);
    assert_eq!(sum.get(), 23);
    assert_eq!(sum.get(), 23);
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_untrack_skips_dependency() {
    let tracked = State::new(1);
    let ignored = State::new(100);
    let memo = Memo::new({
        let (tracked, ignored) = (tracked.clone(), ignored.clone());
        move || tracked.get() + untrack(|| ignored.get())
    });

    assert_eq!(memo.get(), 101);
    ignored.set(200);
    assert!(!memo.is_stale());
    assert_eq!(memo.get(), 101);
    tracked.set(2);
    assert_eq!(memo.get(), 202);
}

#[test]
fn test_signal_unwraps_every_shape() {
    let state = State::new(3usize);
    let memo = Memo::new({
        let state = state.clone();
        move || state.get() + 1
    });

    assert_eq!(Signal::from(7usize).get(), 7);
    assert_eq!(Signal::from(state.clone()).get(), 3);
    assert_eq!(Signal::from(memo).get(), 4);
    assert!(!Signal::from(7usize).is_reactive());
    assert!(Signal::from(state).is_reactive());
}

#[test]
fn test_store_snapshot_keeps_insertion_order() {
    let store = Store::new()
        .with("b", json!(1))
        .with("a", json!([1, 2]));
    store.set("b", json!(2));

    assert_eq!(store.keys(), vec!["b", "a"]);
    assert_eq!(store.to_value(), json!({ "b": 2, "a": [1, 2] }));
}
