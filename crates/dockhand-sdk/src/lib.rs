//! # dockhand-sdk
//!
//! Public SDK for starting container fleets from integration tests.
//!
//! Provides two entry points:
//! - [`HarnessBuilder`](harness::HarnessBuilder): fluent configuration of a fleet,
//!   with optional retry of the whole start sequence.
//! - [`must`]: panic-on-error wrappers for fixture code.
//!
//! # Example
//!
//! ```rust,no_run
//! use dockhand_sdk::harness::HarnessBuilder;
//!
//! let harness = HarnessBuilder::new("web:\n  image: nginx\n  ports:\n    - \"80\"\n")
//!     .isolated()
//!     .remove_stale(true)
//!     .start()?;
//! let port = harness.public_port("web", 80, "tcp")?;
//! # let _ = port;
//! harness.kill()?;
//! # Ok::<(), dockhand_common::error::DockhandError>(())
//! ```

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod harness;
pub mod must;
