//! Panic-on-error adapters for test fixtures.
//!
//! Each function calls its `Result`-returning counterpart and panics with
//! the error's message on failure. Use them only in setup code where there
//! is nothing sensible to recover to, such as a test's fixture.

#![allow(clippy::panic)]

use std::fmt::Display;
use std::time::Duration;

use dockhand_common::types::ContainerId;
use dockhand_compose::{Fleet, FleetController, StartOptions};
use dockhand_runtime::host;
use dockhand_runtime::inspect::{self, Container};
use dockhand_runtime::process::{CommandRunner, SystemRunner};
use dockhand_runtime::retry;

use crate::harness::{Harness, HarnessBuilder};

fn abort(what: &str, err: impl Display) -> ! {
    tracing::error!(error = %err, "{what} failed");
    panic!("{what} failed: {err}")
}

/// Like [`retry::retry`], but panics with the last error.
///
/// # Panics
///
/// Panics if every attempt fails.
pub fn must_retry<T, E, F>(max_attempts: u32, initial_delay: Duration, op: F) -> T
where
    E: Display,
    F: FnMut() -> Result<T, E>,
{
    retry::retry(max_attempts, initial_delay, op).unwrap_or_else(|e| abort("retry", e))
}

/// Like [`retry::retry_with_defaults`], but panics with the last error.
///
/// # Panics
///
/// Panics if every attempt fails.
pub fn must_retry_with_defaults<T, E, F>(op: F) -> T
where
    E: Display,
    F: FnMut() -> Result<T, E>,
{
    retry::retry_with_defaults(op).unwrap_or_else(|e| abort("retry", e))
}

/// Starts a fleet through `controller`, panicking on any failure.
///
/// # Panics
///
/// Panics if the start sequence fails.
pub fn must_start<R: CommandRunner>(
    controller: &FleetController<R>,
    manifest: &str,
    options: StartOptions,
) -> Fleet {
    controller
        .start(manifest, options)
        .unwrap_or_else(|e| abort("fleet start", e))
}

/// Starts a harness from `builder`, panicking on any failure.
///
/// # Panics
///
/// Panics if the start sequence fails.
pub fn must_start_harness(builder: HarnessBuilder) -> Harness {
    builder
        .start()
        .unwrap_or_else(|e| abort("harness start", e))
}

/// Kills `fleet`, panicking on failure.
///
/// # Panics
///
/// Panics if the kill invocation fails.
pub fn must_kill<R: CommandRunner>(controller: &FleetController<R>, fleet: &Fleet) {
    if let Err(e) = controller.kill(fleet) {
        abort("fleet kill", e);
    }
}

/// Inspects `id` with the default runtime CLI, panicking on failure.
///
/// # Panics
///
/// Panics if the inspection or parsing fails.
pub fn must_inspect(id: &ContainerId) -> Container {
    inspect::inspect(
        &SystemRunner::new(),
        dockhand_common::constants::DEFAULT_RUNTIME_PROGRAM,
        id,
    )
    .unwrap_or_else(|e| abort("inspect", e))
}

/// Returns the published host port of `container`, panicking if there is none.
///
/// # Panics
///
/// Panics if the port is not published or cannot be parsed.
pub fn must_public_port(container: &Container, exposed_port: u16, proto: &str) -> u16 {
    container
        .public_port(exposed_port, proto)
        .unwrap_or_else(|e| abort("public port lookup", e))
}

/// Returns the inferred container host, panicking on a malformed `DOCKER_HOST`.
///
/// # Panics
///
/// Panics if `DOCKER_HOST` cannot be parsed.
pub fn must_infer_host() -> String {
    host::infer_host().unwrap_or_else(|e| abort("host inference", e))
}
