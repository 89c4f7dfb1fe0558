//! Error types for rmk

use std::io;
use thiserror::Error;

/// Result type alias for rmk operations
pub type Result<T> = std::result::Result<T, RmkError>;

/// Main error type for rmk
#[derive(Error, Debug)]
pub enum RmkError {
    /// Rule file parsing errors
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Target lookup errors
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Command execution errors
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Rule file reading, parsing and finalization errors
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Parse error at line {line}: {text}")]
    Statement { line: usize, text: String },

    #[error("Duplicate rule definition '{0}'")]
    DuplicateRule(String),

    #[error("No makefile found (searched: {0})")]
    NotFound(String),

    #[error("No rules defined")]
    NoRules,

    #[error(transparent)]
    Interpolation(#[from] InterpolationError),

    #[error("Failed to read rule file: {0}")]
    Read(#[from] io::Error),
}

/// Target lookup errors
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("No rule to make target '{0}'")]
    TargetNotFound(String),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Command '{command}' failed with exit code {code:?}")]
    CommandFailed { command: String, code: Option<i32> },

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Variable reference resolution errors
#[derive(Error, Debug)]
pub enum InterpolationError {
    #[error("Recursive variable '{0}' references itself")]
    Recursive(String),
}

/// Specialized result type for rule file parsing
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Specialized result type for target lookup
pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Specialized result type for interpolation operations
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;
