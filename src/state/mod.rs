//! State management module
//!
//! This module handles pending-input conversation tags

pub mod wait_input;

// Re-export commonly used state components
pub use wait_input::WaitInput;
