//! CLI command definitions and dispatch.

pub mod down;
pub mod host;
pub mod inspect;
pub mod kill;
pub mod port;
pub mod render;
pub mod up;

use clap::{Parser, Subcommand};
use dockhand_common::config::FleetConfig;
use dockhand_common::constants::{
    BIN_NAME, DEFAULT_COMPOSE_PROGRAM, DEFAULT_PROJECT_NAME, DEFAULT_RUNTIME_PROGRAM,
};

/// Dockhand: start and tear down docker-compose fleets for integration tests.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Compose project namespace scoping every compose invocation.
    #[arg(long, short = 'p', global = true, env = "DOCKHAND_PROJECT", default_value = DEFAULT_PROJECT_NAME)]
    pub project: String,

    /// Compose-style orchestration tool.
    #[arg(long, global = true, env = "DOCKHAND_COMPOSE", default_value = DEFAULT_COMPOSE_PROGRAM)]
    pub compose: String,

    /// Container runtime CLI used for inspection.
    #[arg(long, global = true, env = "DOCKHAND_RUNTIME", default_value = DEFAULT_RUNTIME_PROGRAM)]
    pub runtime: String,
}

impl Cli {
    /// Builds the controller configuration from the global flags.
    pub fn fleet_config(&self) -> FleetConfig {
        FleetConfig::default()
            .with_project_name(&self.project)
            .with_compose_program(&self.compose)
            .with_runtime_program(&self.runtime)
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the fleet described by a manifest and wait until it is running.
    Up(up::UpArgs),
    /// Kill the containers of a rendered manifest.
    Kill(kill::KillArgs),
    /// Kill and force-remove the containers of a rendered manifest.
    Down(down::DownArgs),
    /// Print the parsed inspection snapshot of a container.
    Inspect(inspect::InspectArgs),
    /// Print the host port a container publishes a port on.
    Port(port::PortArgs),
    /// Print the host published ports are reachable on.
    Host(host::HostArgs),
    /// Print a manifest with environment placeholders substituted.
    Render(render::RenderArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.fleet_config();
    match cli.command {
        Command::Up(args) => up::execute(args, config),
        Command::Kill(args) => kill::execute(&args, config),
        Command::Down(args) => down::execute(&args, config),
        Command::Inspect(args) => inspect::execute(&args, &config),
        Command::Port(args) => port::execute(&args, &config),
        Command::Host(args) => host::execute(&args),
        Command::Render(args) => render::execute(&args),
    }
}
