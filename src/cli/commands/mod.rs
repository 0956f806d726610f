//! CLI command implementations

pub mod auth;
pub mod buyer;
pub mod completions;
pub mod dashboard;
pub mod inv;
pub mod req;
