//! Unit test runner for the promise_runtime component

mod chain_test;
mod promise_test;
