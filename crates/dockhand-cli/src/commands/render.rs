//! `dockhand render`: Print a manifest with placeholders substituted.

use std::path::PathBuf;

use clap::Args;
use dockhand_compose::manifest;

use crate::output::{BOLD, DIM, RESET};

/// Arguments for the `render` command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Path to the compose manifest.
    #[arg(default_value = "docker-compose.yml")]
    pub file: PathBuf,

    /// Print only the declared services, one per line.
    #[arg(long)]
    pub services: bool,
}

/// Executes the `render` command.
///
/// The rendered manifest goes to stdout and the service summary to stderr,
/// so stdout can be redirected into a usable manifest file.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or, with `--services`, parsed.
pub fn execute(args: &RenderArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .map_err(|e| anyhow::anyhow!("cannot read manifest {}: {e}", args.file.display()))?;
    let rendered = manifest::substitute_env(&text);

    if args.services {
        for service in manifest::service_names(&rendered)? {
            println!("{service}");
        }
        return Ok(());
    }

    print!("{rendered}");
    match manifest::service_names(&rendered) {
        Ok(services) => eprintln!("{BOLD}services:{RESET} {}", service_summary(&services)),
        Err(e) => eprintln!("{DIM}services: unavailable ({e}){RESET}"),
    }
    Ok(())
}

fn service_summary(services: &[String]) -> String {
    if services.is_empty() {
        "(none)".to_owned()
    } else {
        services.join(", ")
    }
}
