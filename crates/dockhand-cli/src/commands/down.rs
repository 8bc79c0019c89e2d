//! `dockhand down`: Kill and remove the containers of a rendered manifest.

use std::path::PathBuf;

use clap::Args;
use dockhand_common::config::FleetConfig;
use dockhand_compose::FleetController;

/// Arguments for the `down` command.
#[derive(Args, Debug)]
pub struct DownArgs {
    /// Rendered manifest printed by `dockhand up`.
    pub file: PathBuf,

    /// Also delete the rendered manifest.
    #[arg(long)]
    pub delete_manifest: bool,
}

/// Executes the `down` command.
///
/// # Errors
///
/// Returns an error if a compose invocation fails or the manifest cannot be deleted.
pub fn execute(args: &DownArgs, config: FleetConfig) -> anyhow::Result<()> {
    let controller = FleetController::system(config);
    controller.kill_manifest(&args.file)?;
    controller.remove_manifest(&args.file)?;

    if args.delete_manifest {
        std::fs::remove_file(&args.file)?;
        tracing::debug!(path = %args.file.display(), "deleted rendered manifest");
    }
    Ok(())
}
