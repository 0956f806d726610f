//! Core module - fundamental types and utilities

pub mod cache;
pub mod config;
pub mod entity;
pub mod logging;
pub mod role;
pub mod session;
pub mod validation;
pub mod workflow;

pub use cache::{CacheError, Mutation, QueryCache, QueryKey};
pub use config::{Config, ConfigError};
pub use entity::{Entity, Priority, Status};
pub use role::{Role, Section};
pub use session::{Session, SessionError, SessionHandle, SessionStore};
pub use validation::{Checked, FieldError, FieldErrors};
pub use workflow::{
    next_status, ConfirmedTransition, Deduction, TransitionPlan, WorkflowEngine, WorkflowError,
};
