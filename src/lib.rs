pub mod calculation;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod git;
pub mod output;
pub mod telemetry;
pub mod ui;

pub use error::{GitStampError, Result};
