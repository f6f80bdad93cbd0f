//! E2E test harness for docgen.
//!
//! This module contains test infrastructure with builders and assertion
//! variants that not every scenario uses.

#![allow(dead_code)]

pub mod assertions;
pub mod runner;
pub mod workspace;

// Re-export commonly used types
pub use assertions::Assertion;
pub use scenario::Scenario;
