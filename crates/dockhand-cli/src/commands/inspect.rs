//! `dockhand inspect`: Print the parsed snapshot of a container.

use clap::Args;
use dockhand_common::config::FleetConfig;
use dockhand_common::types::ContainerId;
use dockhand_runtime::inspect;
use dockhand_runtime::process::SystemRunner;

/// Arguments for the `inspect` command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Container ID or name.
    pub container: String,
}

/// Executes the `inspect` command.
///
/// # Errors
///
/// Returns an error if the container cannot be inspected.
pub fn execute(args: &InspectArgs, config: &FleetConfig) -> anyhow::Result<()> {
    let id = ContainerId::new(args.container.as_str());
    let container = inspect::inspect(&SystemRunner::new(), &config.runtime_program, &id)?;
    println!("{}", serde_json::to_string_pretty(&container)?);
    Ok(())
}
