//! Test utilities for GharKaAchar services.
//!
//! Import from `[dev-dependencies]` only.

pub mod auth;
