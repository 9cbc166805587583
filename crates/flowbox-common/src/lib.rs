//! Common utilities for the flowbox layout engine.
//!
//! This crate provides shared infrastructure used by all layout components:
//! - **Warning System** - deduplicated `log` warnings for degraded resources

pub mod warning;
