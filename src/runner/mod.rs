//! Build execution engine
//!
//! This module orders targets by their dependencies, decides which ones
//! are out of date and runs their commands.

pub mod build;
pub mod command;
pub mod context;
pub mod schedule;

// Re-export main types
pub use build::*;
pub use command::*;
pub use context::*;
pub use schedule::*;
