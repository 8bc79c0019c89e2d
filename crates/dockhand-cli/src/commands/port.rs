//! `dockhand port`: Print the host port a container publishes a port on.

use clap::Args;
use dockhand_common::config::FleetConfig;
use dockhand_common::types::ContainerId;
use dockhand_runtime::inspect;
use dockhand_runtime::process::SystemRunner;

/// Arguments for the `port` command.
#[derive(Args, Debug)]
pub struct PortArgs {
    /// Container ID or name.
    pub container: String,

    /// Port exposed inside the container.
    pub port: u16,

    /// Protocol of the exposed port.
    #[arg(long, default_value = "tcp")]
    pub proto: String,
}

/// Executes the `port` command.
///
/// # Errors
///
/// Returns an error if the container cannot be inspected or the port is not published.
pub fn execute(args: &PortArgs, config: &FleetConfig) -> anyhow::Result<()> {
    let id = ContainerId::new(args.container.as_str());
    let container = inspect::inspect(&SystemRunner::new(), &config.runtime_program, &id)?;
    println!("{}", container.public_port(args.port, &args.proto)?);
    Ok(())
}
