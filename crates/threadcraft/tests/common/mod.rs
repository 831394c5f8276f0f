//! Shared test utilities for threadcraft integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated runs with a temp directory and scripted transport
//! - Builders for configs and canned flow responses

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::{build_pdf, TestHarness};
