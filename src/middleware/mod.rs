//! Middleware module
//!
//! This module contains middleware for request processing

pub mod access;
pub mod session;

// Re-export commonly used middleware
pub use access::{AccessGate, AccessOutcome};
pub use session::{SessionMiddleware, SessionContext, SessionStage};
