//! Domain types shared across GharKaAchar crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Business rules (status transitions, pricing) live here; persistence and
//! transport stay in the service crates.

pub mod order;
pub mod pagination;
pub mod pricing;
pub mod user;
