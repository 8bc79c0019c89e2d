//! `dockhand up`: Start a fleet and wait for Ctrl+C.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use clap::Args;
use dockhand_common::config::FleetConfig;
use dockhand_common::constants::DEFAULT_RETRY_DELAY_MS;
use dockhand_compose::Fleet;
use dockhand_runtime::host;
use dockhand_runtime::retry::RetryPolicy;
use dockhand_sdk::harness::{Harness, HarnessBuilder};

use crate::output::{BOLD, CYAN, DIM, GREEN, RESET, published_ports};

/// Arguments for the `up` command.
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Path to the compose manifest (may contain `${NAME}` placeholders).
    #[arg(default_value = "docker-compose.yml")]
    pub file: PathBuf,

    /// Pull images before starting.
    #[arg(long)]
    pub pull: bool,

    /// Kill and remove leftover containers of the project before starting.
    #[arg(long)]
    pub rm_first: bool,

    /// Attempts for the whole start sequence; retried attempts clear the
    /// project's containers before `up`.
    #[arg(long, default_value_t = 1)]
    pub retries: u32,

    /// Return once the fleet is running instead of waiting for Ctrl+C.
    #[arg(short, long)]
    pub detach: bool,
}

/// Executes the `up` command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or the fleet fails to start.
pub fn execute(args: UpArgs, config: FleetConfig) -> anyhow::Result<()> {
    let started = Instant::now();
    let manifest = std::fs::read_to_string(&args.file).map_err(|e| {
        anyhow::anyhow!("cannot read manifest {}: {e}", args.file.display())
    })?;

    let policy = RetryPolicy::new(args.retries, Duration::from_millis(DEFAULT_RETRY_DELAY_MS));
    let harness = HarnessBuilder::new(manifest)
        .config(config)
        .force_pull(args.pull)
        .remove_stale(args.rm_first)
        .retry(policy)
        .start()?;
    let fleet = harness.fleet();

    report(fleet, started);

    if args.detach {
        eprintln!();
        eprintln!(
            "  Running detached. Use {BOLD}dockhand -p {} kill {}{RESET} to stop.",
            fleet.project(),
            fleet.manifest_path().display()
        );
        return Ok(());
    }

    wait_for_shutdown(&harness)
}

fn report(fleet: &Fleet, started: Instant) {
    let host = host::infer_host().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "falling back to localhost");
        "localhost".to_owned()
    });

    eprintln!();
    eprintln!(
        "  {GREEN}{BOLD}Started {}{RESET} container(s) in {:.1}s {DIM}[project {}]{RESET}",
        fleet.len(),
        started.elapsed().as_secs_f64(),
        fleet.project()
    );
    eprintln!();

    for (service, container) in fleet.containers() {
        eprintln!(
            "    {GREEN}●{RESET} {BOLD}{service}{RESET} {DIM}[{}]{RESET}",
            container.id.short()
        );
        for (spec, port) in published_ports(container) {
            eprintln!("        {CYAN}{spec}{RESET} -> {host}:{port}");
        }
    }

    eprintln!();
    eprintln!("  {DIM}Manifest: {}{RESET}", fleet.manifest_path().display());
}

fn wait_for_shutdown(harness: &Harness) -> anyhow::Result<()> {
    eprintln!();
    eprintln!("  Press {BOLD}Ctrl+C{RESET} to kill the fleet...");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {e}"))?;

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(250));
    }

    eprintln!();
    eprintln!("  Killing containers...");
    harness.kill()?;
    eprintln!("  {GREEN}Fleet killed.{RESET}");

    Ok(())
}
