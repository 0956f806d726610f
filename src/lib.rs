//! FERP: Fabric ERP admin console
//!
//! A command-line console for a textile fabric ERP backend: buyers, fabric
//! inventory and sample requests, with a role-gated item status workflow.
//! All records live on the server; this crate keeps a short-lived query
//! cache and the signed-in session.

pub mod api;
pub mod cli;
pub mod console;
pub mod core;
pub mod entities;
