//! Test Utilities
//!
//! Shared fixtures for hanlua integration tests. Included from each test
//! target with `#[path]`, so not every helper is used by every target.

#![allow(dead_code)]


pub use fixtures::{count_scripts, test_config, TestEnv};

#[cfg(unix)]
pub use fixtures::{echo_print_interpreter, stub_interpreter};
