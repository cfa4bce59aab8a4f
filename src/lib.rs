//! Shared fixtures for the workspace end-to-end tests and benches.

pub mod bench_support;
