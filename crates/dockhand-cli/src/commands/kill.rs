//! `dockhand kill`: Kill the containers of a rendered manifest.

use std::path::PathBuf;

use clap::Args;
use dockhand_common::config::FleetConfig;
use dockhand_compose::FleetController;

/// Arguments for the `kill` command.
#[derive(Args, Debug)]
pub struct KillArgs {
    /// Rendered manifest printed by `dockhand up`.
    pub file: PathBuf,
}

/// Executes the `kill` command.
///
/// # Errors
///
/// Returns an error if the compose invocation fails.
pub fn execute(args: &KillArgs, config: FleetConfig) -> anyhow::Result<()> {
    tracing::info!(path = %args.file.display(), project = %config.project_name, "killing fleet");
    FleetController::system(config).kill_manifest(&args.file)?;
    Ok(())
}
