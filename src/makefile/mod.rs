//! Rule file parsing
//!
//! This module reads Makefile-style rule files, resolves variable
//! references and builds the name-to-rule table.

pub mod finalize;
pub mod interpolate;
pub mod parse;
pub mod reader;
pub mod types;

// Re-export main types
pub use finalize::*;
pub use interpolate::*;
pub use parse::*;
pub use reader::*;
pub use types::*;
