// Library root: exposes internal modules for integration tests in `tests/`.
// Production entry point remains `src/main.rs`.

pub mod cache;
pub mod error;
pub mod judges;
pub mod notify;
pub mod report;
pub mod runner;
pub mod services;

// These modules are mostly wiring for the binary.
pub mod cli;
pub mod config;
pub mod logging;
