//! Harness error types.
//!
//! This module provides structured errors for scenario definition, suite
//! registration and benchmark execution. A benchmark run that completes
//! with a non-success exit status is NOT an error here; that is a valid
//! [`ExecutionOutcome`](crate::runner::ExecutionOutcome). Errors are
//! reserved for configuration mistakes and runs that never started.

use std::io;

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Harness errors with structured context.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Scenario parameters cannot describe a load shape.
    #[error("invalid scenario '{name}': {reason}")]
    InvalidScenario { name: String, reason: String },

    /// A scenario name was registered twice in the same suite.
    #[error("duplicate scenario '{name}' in suite '{suite}'")]
    DuplicateScenario { name: String, suite: String },

    /// The benchmark tool could not be spawned at all.
    #[error("failed to launch benchmark tool '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error with context.
    #[error("IO error in {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create an invalid scenario error.
    pub fn invalid_scenario(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidScenario {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a duplicate scenario error.
    pub fn duplicate_scenario(name: impl Into<String>, suite: impl Into<String>) -> Self {
        Self::DuplicateScenario {
            name: name.into(),
            suite: suite.into(),
        }
    }

    /// Create a launch error.
    pub fn launch(program: impl Into<String>, source: io::Error) -> Self {
        Self::Launch {
            program: program.into(),
            source,
        }
    }

    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// True when the benchmark tool never started.
    #[must_use]
    pub fn is_launch(&self) -> bool {
        matches!(self, Self::Launch { .. })
    }
}
