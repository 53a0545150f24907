//! Error types for the interop suite

use thiserror::Error;

/// Result type alias for suite operations
pub type Result<T> = std::result::Result<T, Error>;

/// Suite error types
#[derive(Error, Debug)]
pub enum Error {
    /// An environment could not be set up. Always fatal.
    #[error("provisioning failed: {what}")]
    Provisioning {
        /// What was being set up
        what: String,
        /// Captured output of the failing command
        output: String,
    },

    /// A verification did not hold
    #[error("assertion failed: {message}")]
    Assertion {
        /// What was expected
        message: String,
        /// Captured output the check ran against
        output: String,
    },

    /// The container runtime or a wrapped tool could not be invoked at all
    #[error("command execution failed: {0}")]
    Runtime(#[from] command_executor::Error),

    /// A stage selection that violates stage prerequisites
    #[error("invalid stage plan: {0}")]
    Plan(String),

    /// A stage ran without a value an earlier stage should have produced
    #[error("missing context: {0}")]
    MissingContext(&'static str),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] interop_config::ConfigError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Report(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a provisioning error
    pub fn provisioning(what: impl Into<String>, output: impl Into<String>) -> Self {
        Self::Provisioning {
            what: what.into(),
            output: output.into(),
        }
    }

    /// Create an assertion error
    pub fn assertion(message: impl Into<String>, output: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
            output: output.into(),
        }
    }

    /// Create a plan error
    pub fn plan(message: impl Into<String>) -> Self {
        Self::Plan(message.into())
    }

    /// Short machine-friendly category, used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Provisioning { .. } => "provisioning",
            Error::Assertion { .. } => "assertion",
            Error::Runtime(_) => "runtime",
            Error::Plan(_) => "plan",
            Error::MissingContext(_) => "context",
            Error::Config(_) => "config",
            Error::Report(_) => "report",
            Error::Io(_) => "io",
        }
    }

    /// Captured command output attached to this error, if any
    pub fn output(&self) -> Option<&str> {
        match self {
            Error::Provisioning { output, .. } | Error::Assertion { output, .. } => {
                Some(output.as_str())
            }
            _ => None,
        }
    }
}
