//! Common utilities for the Koala layout engine.
//!
//! This crate provides shared infrastructure used by the layout crate and the CLI:
//! - **Warning System** - deduplicated diagnostics for unsupported or ignored input

pub mod warning;
