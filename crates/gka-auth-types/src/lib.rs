//! Auth types for the GharKaAchar store.
//!
//! Provides JWT issuing/validation, cookie builders, access/refresh session
//! resolution, the role-gated session middleware and the `Identity` extractor.

pub mod cookie;
pub mod identity;
pub mod middleware;
pub mod session;
pub mod token;
