//! Contract test runner for the promise_runtime component
