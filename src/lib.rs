//! rmk - A minimal Makefile-style build runner
//!
//! rmk reads a rule file of variable assignments and `target: dependencies`
//! rules, orders the dependencies of each requested target, skips targets
//! that are up to date with respect to the filesystem and runs the rest.

// Public modules
pub mod cli;
pub mod error;
pub mod makefile;
pub mod runner;

// Re-export commonly used types
pub use error::{Result, RmkError};

/// Current version of rmk
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
