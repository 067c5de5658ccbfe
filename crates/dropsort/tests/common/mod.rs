//! Shared test utilities for dropsort integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated runs with a watch folder and organized root
//! - `ScriptedBackend` and record builders

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
