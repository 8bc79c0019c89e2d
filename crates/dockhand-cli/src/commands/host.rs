//! `dockhand host`: Print the host published ports are reachable on.

use clap::Args;
use dockhand_runtime::host;

/// Arguments for the `host` command.
#[derive(Args, Debug)]
pub struct HostArgs {}

/// Executes the `host` command.
///
/// # Errors
///
/// Returns an error if `DOCKER_HOST` is malformed.
pub fn execute(_args: &HostArgs) -> anyhow::Result<()> {
    println!("{}", host::infer_host()?);
    Ok(())
}
