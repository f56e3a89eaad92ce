//! Unit tests for the Promise state machine through the public API

use executor::SerialExecutor;
use parking_lot::Mutex;
use promise_runtime::Promise;
use std::sync::Arc;

fn serial() -> Arc<SerialExecutor> {
    Arc::new(SerialExecutor::new())
}

#[test]
fn resolving_twice_keeps_the_first_outcome() {
    let exec = serial();
    let (promise, resolver) = Promise::<i32, String>::pending(exec.clone());
    resolver.resolve(1);
    resolver.resolve(2);
    let seen = Arc::new(Mutex::new(None));
    let slot = seen.clone();
    promise.observe(move |settlement| *slot.lock() = Some(settlement));
    exec.run_until_idle();
    assert_eq!(*seen.lock(), Some(Ok(1)));
}

#[test]
fn reject_after_resolve_is_ignored() {
    let exec = serial();
    let (promise, resolver) = Promise::<i32, String>::pending(exec.clone());
    resolver.resolve(1);
    resolver.reject("too late".to_string());
    exec.run_until_idle();
    assert!(promise.state().is_fulfilled());
}

#[test]
fn resolve_after_reject_is_ignored() {
    let exec = serial();
    let (promise, resolver) = Promise::<i32, String>::pending(exec.clone());
    resolver.reject("first".to_string());
    resolver.resolve(1);
    exec.run_until_idle();
    assert!(promise.state().is_rejected());
}

#[test]
fn observers_fire_in_registration_order_after_resolution() {
    let exec = serial();
    let (promise, resolver) = Promise::<i32, String>::pending(exec.clone());
    let order = Arc::new(Mutex::new(Vec::new()));
    for label in ["o1", "o2", "o3"] {
        let order = order.clone();
        promise.observe(move |_| order.lock().push(label));
    }

    resolver.resolve(0);
    // Dispatch is asynchronous relative to the resolving call.
    assert!(order.lock().is_empty());

    exec.run_until_idle();
    assert_eq!(*order.lock(), vec!["o1", "o2", "o3"]);
}

#[test]
fn late_observer_sees_the_known_outcome() {
    let exec = serial();
    let (promise, resolver) = Promise::<i32, String>::pending(exec.clone());
    resolver.resolve(77);
    exec.run_until_idle();

    let seen = Arc::new(Mutex::new(None));
    let slot = seen.clone();
    promise.observe(move |settlement| *slot.lock() = Some(settlement));
    // Still asynchronous: nothing fires on the registering thread.
    assert_eq!(*seen.lock(), None);
    exec.run_until_idle();
    assert_eq!(*seen.lock(), Some(Ok(77)));
}

#[test]
fn with_runs_the_producer_on_the_executor() {
    let exec = serial();
    let produced_on = Arc::new(Mutex::new(None));
    let slot = produced_on.clone();
    let promise = Promise::<i32, String>::with(exec.clone(), move |resolver| {
        *slot.lock() = Some(std::thread::current().id());
        resolver.resolve(1);
    });
    // Not yet produced: the work is queued, not run inline.
    assert!(promise.state().is_pending());
    exec.run_until_idle();
    assert!(promise.state().is_fulfilled());
    assert_eq!(*produced_on.lock(), Some(std::thread::current().id()));
}

#[test]
fn pre_settled_constructors() {
    let exec = serial();
    let fulfilled = Promise::<i32, String>::resolved(exec.clone(), 5);
    let rejected = Promise::<i32, String>::rejected(exec.clone(), "x".to_string());
    assert!(fulfilled.state().is_fulfilled());
    assert!(rejected.state().is_rejected());
}

#[test]
fn clones_share_the_same_settlement() {
    let exec = serial();
    let (promise, resolver) = Promise::<i32, String>::pending(exec.clone());
    let twin = promise.clone();
    resolver.resolve(9);
    exec.run_until_idle();
    assert!(promise.state().is_fulfilled());
    assert!(twin.state().is_fulfilled());
}

#[test]
fn cloned_resolvers_race_idempotently() {
    let exec = serial();
    let (promise, resolver) = Promise::<i32, String>::pending(exec.clone());
    let other = resolver.clone();
    resolver.resolve(1);
    other.resolve(2);
    let seen = Arc::new(Mutex::new(None));
    let slot = seen.clone();
    promise.observe(move |settlement| *slot.lock() = Some(settlement));
    exec.run_until_idle();
    assert_eq!(*seen.lock(), Some(Ok(1)));
}

#[test]
fn on_executor_rebinds_downstream_dispatch() {
    let upstream = serial();
    let downstream_exec = serial();
    let (promise, resolver) = Promise::<i32, String>::pending(upstream.clone());
    let rebound = promise.on_executor(downstream_exec.clone());
    let chained = rebound.then(|n| n);
    resolver.resolve(1);
    upstream.run_until_idle();
    assert!(chained.state().is_pending());
    downstream_exec.run_until_idle();
    assert!(chained.state().is_fulfilled());
}
