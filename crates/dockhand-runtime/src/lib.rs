//! Building blocks for driving an external container runtime.
//!
//! - [`retry`]: retry with exponential backoff for flaky operations.
//! - [`process`]: the [`CommandRunner`](process::CommandRunner) seam over external programs.
//! - [`inspect`]: typed container snapshots parsed from `docker inspect`.
//! - [`host`]: the host published ports are reachable on.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod host;
pub mod inspect;
pub mod process;
pub mod retry;
