//! # dockhand-compose
//!
//! Fleet lifecycle control over a compose-style orchestration tool.
//!
//! Handles:
//! - **Manifest**: `${NAME}` environment substitution and temp-file placement.
//! - **Startup**: discovery of started container IDs from verbose `up` output.
//! - **Fleet**: the start sequence, running-state verification, and teardown.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod fleet;
pub mod manifest;
pub mod startup;

pub use fleet::{Fleet, FleetController, StartOptions};
