//! Unit tests for the chaining combinators through the public API

use executor::SerialExecutor;
use parking_lot::Mutex;
use promise_runtime::Promise;
use std::sync::Arc;

fn serial() -> Arc<SerialExecutor> {
    Arc::new(SerialExecutor::new())
}

#[test]
fn rejection_skips_every_value_stage_in_the_chain() {
    let exec = serial();
    let (promise, resolver) = Promise::<i32, String>::pending(exec.clone());

    let f_ran = Arc::new(Mutex::new(false));
    let g_ran = Arc::new(Mutex::new(false));
    let f_flag = f_ran.clone();
    let g_flag = g_ran.clone();
    let end = promise
        .then(move |n| {
            *f_flag.lock() = true;
            n + 1
        })
        .then(move |n| {
            *g_flag.lock() = true;
            n * 2
        });

    let seen = Arc::new(Mutex::new(None));
    let slot = seen.clone();
    end.observe(move |settlement| *slot.lock() = Some(settlement));

    resolver.reject("root cause".to_string());
    exec.run_until_idle();

    assert!(!*f_ran.lock());
    assert!(!*g_ran.lock());
    // The rejection reaches the end of the chain unchanged.
    assert_eq!(*seen.lock(), Some(Err("root cause".to_string())));
}

#[test]
fn catch_at_the_end_recovers_a_deep_rejection() {
    let exec = serial();
    let (promise, resolver) = Promise::<i32, String>::pending(exec.clone());
    let end = promise
        .then(|n| n + 1)
        .then(|n| n * 2)
        .catch(|error| error.len() as i32);
    resolver.reject("abcd".to_string());
    exec.run_until_idle();

    let seen = Arc::new(Mutex::new(None));
    let slot = seen.clone();
    end.observe(move |settlement| *slot.lock() = Some(settlement));
    exec.run_until_idle();
    assert_eq!(*seen.lock(), Some(Ok(4)));
}

#[test]
fn try_then_failure_is_caught_downstream() {
    let exec = serial();
    let (promise, resolver) = Promise::<i32, String>::pending(exec.clone());
    let end = promise
        .try_then(|n| {
            if n > 10 {
                Ok(n)
            } else {
                Err("too small".to_string())
            }
        })
        .catch(|_| -1);
    resolver.resolve(5);
    exec.run_until_idle();
    let seen = Arc::new(Mutex::new(None));
    let slot = seen.clone();
    end.observe(move |settlement| *slot.lock() = Some(settlement));
    exec.run_until_idle();
    assert_eq!(*seen.lock(), Some(Ok(-1)));
}

#[test]
fn and_then_with_a_pending_inner_promise() {
    let exec = serial();
    let (outer, outer_resolver) = Promise::<i32, String>::pending(exec.clone());
    let (inner, inner_resolver) = Promise::<i32, String>::pending(exec.clone());

    let inner_for_stage = inner.clone();
    let chained = outer.and_then(move |n| inner_for_stage.then(move |m| n + m));

    outer_resolver.resolve(10);
    exec.run_until_idle();
    // The stage ran, but the adopted inner chain is still pending.
    assert!(chained.state().is_pending());

    inner_resolver.resolve(32);
    exec.run_until_idle();
    let seen = Arc::new(Mutex::new(None));
    let slot = seen.clone();
    chained.observe(move |settlement| *slot.lock() = Some(settlement));
    exec.run_until_idle();
    assert_eq!(*seen.lock(), Some(Ok(42)));
}

#[test]
fn recover_keeps_the_error_type_path_alive() {
    let exec = serial();
    let (promise, resolver) = Promise::<i32, String>::pending(exec.clone());
    let retry_exec = exec.clone();
    let end = promise.recover(move |_| Promise::rejected(retry_exec, "still failing".to_string()));
    resolver.reject("first".to_string());
    exec.run_until_idle();
    let seen = Arc::new(Mutex::new(None));
    let slot = seen.clone();
    end.observe(move |settlement| *slot.lock() = Some(settlement));
    exec.run_until_idle();
    assert_eq!(*seen.lock(), Some(Err("still failing".to_string())));
}

#[test]
fn always_observes_without_changing_the_outcome() {
    let exec = serial();
    let (promise, resolver) = Promise::<i32, String>::pending(exec.clone());
    let cleanups = Arc::new(Mutex::new(0));
    let counter = cleanups.clone();
    let end = promise.then(|n| n * 2).always(move || *counter.lock() += 1);
    resolver.resolve(4);
    exec.run_until_idle();
    let seen = Arc::new(Mutex::new(None));
    let slot = seen.clone();
    end.observe(move |settlement| *slot.lock() = Some(settlement));
    exec.run_until_idle();
    assert_eq!(*cleanups.lock(), 1);
    assert_eq!(*seen.lock(), Some(Ok(8)));
}

#[test]
fn stages_never_run_inline_during_resolution() {
    let exec = serial();
    let (promise, resolver) = Promise::<i32, String>::pending(exec.clone());
    let stage_ran = Arc::new(Mutex::new(false));
    let flag = stage_ran.clone();
    let _chained = promise.then(move |n| {
        *flag.lock() = true;
        n
    });
    resolver.resolve(1);
    // resolve() returned with the stage still queued.
    assert!(!*stage_ran.lock());
    exec.run_until_idle();
    assert!(*stage_ran.lock());
}
