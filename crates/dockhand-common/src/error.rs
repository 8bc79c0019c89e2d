//! Unified error type for the Dockhand workspace.
//!
//! Every fallible operation in the library crates returns [`Result`]. Failures
//! of an external process are wrapped in [`DockhandError::Stage`] so the
//! message names the lifecycle phase that failed.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{ContainerId, Stage};

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum DockhandError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An external command exited unsuccessfully or could not be executed.
    #[error("command `{program}` failed ({}): {}", status_text(.status.as_ref()), .output.trim())]
    Command {
        /// Program that was invoked.
        program: String,
        /// Exit status, `None` if the process never ran or was killed by a signal.
        status: Option<i32>,
        /// Combined standard output and standard error.
        output: String,
    },

    /// A lifecycle phase failed; wraps the underlying cause.
    #[error("error {stage}: {source}")]
    Stage {
        /// Phase that was running when the failure occurred.
        stage: Stage,
        /// Underlying failure.
        source: Box<DockhandError>,
    },

    /// Inspect output was not the expected JSON shape.
    #[error("error parsing inspect output for {id}: {source}")]
    Parse {
        /// Identifier that was inspected.
        id: ContainerId,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Inspect returned other than exactly one container.
    #[error("inspect of {id} returned {count} results, 1 expected")]
    Cardinality {
        /// Identifier that was inspected.
        id: ContainerId,
        /// Number of results returned.
        count: usize,
    },

    /// A freshly started container is not in the running state.
    #[error("container '{name}' is not running")]
    NotRunning {
        /// Raw container name as reported by the runtime.
        name: String,
    },

    /// A port mapping or fleet member could not be found.
    #[error("lookup failed: {message}")]
    Lookup {
        /// Description of what was missing.
        message: String,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },
}

impl DockhandError {
    /// Wraps `self` with the phase it occurred in.
    #[must_use]
    pub fn in_stage(self, stage: Stage) -> Self {
        Self::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping any stage context.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Stage { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Returns the outermost stage this error was raised in, if any.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

fn status_text(status: Option<&i32>) -> String {
    status.map_or_else(|| "no exit status".to_owned(), |code| format!("exit status {code}"))
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, DockhandError>;
