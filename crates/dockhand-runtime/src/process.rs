//! External process invocation.
//!
//! Runs a program to completion and returns its combined standard output
//! and standard error. On failure the captured text is logged before the
//! error is returned so diagnostics reach the operator.

use std::process::Command;

use dockhand_common::error::{DockhandError, Result};

/// Executes external programs on behalf of the fleet controller.
///
/// Any closure with the same shape implements this trait, which is how
/// tests script the responses of `docker-compose` and `docker`.
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` and returns its combined output.
    ///
    /// # Errors
    ///
    /// Returns [`DockhandError::Command`] if the program cannot be executed
    /// or exits unsuccessfully.
    fn run(&self, program: &str, args: &[String]) -> Result<String>;
}

impl<F> CommandRunner for F
where
    F: Fn(&str, &[String]) -> Result<String> + Send + Sync,
{
    fn run(&self, program: &str, args: &[String]) -> Result<String> {
        self(program, args)
    }
}

/// Runner backed by [`std::process::Command`].
///
/// Standard output and standard error are captured through separate pipes
/// and joined stdout first, so lines the program wrote to the two streams
/// are not interleaved in the order they were written. Compose writes its
/// verbose start lines to stderr, which keeps them intact at the end.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Creates a new system runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns whether `program` can be found on `PATH`.
    #[must_use]
    pub fn is_available(program: &str) -> bool {
        which::which(program).is_ok()
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String> {
        tracing::debug!(program, ?args, "running external command");

        let output = Command::new(program).args(args).output().map_err(|e| {
            tracing::warn!(program, error = %e, "failed to execute command");
            DockhandError::Command {
                program: program.to_owned(),
                status: None,
                output: e.to_string(),
            }
        })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            return Ok(text);
        }

        tracing::warn!(
            program,
            status = ?output.status.code(),
            output = %text,
            "command failed"
        );
        Err(DockhandError::Command {
            program: program.to_owned(),
            status: output.status.code(),
            output: text,
        })
    }
}
