//! User interface module - terminal formatting.
//!
//! Diagnostics go to stderr so stdout carries only the requested output.

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_base_version, display_error, display_excluded, display_status, display_success,
    format_variable_table,
};
