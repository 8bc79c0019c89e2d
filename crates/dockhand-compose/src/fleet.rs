//! Fleet lifecycle control.
//!
//! A [`FleetController`] brings a manifest's containers up through
//! `docker-compose` and only hands back a [`Fleet`] once every started
//! container has been inspected and found running:
//!
//! ```text
//! render -> [pull] -> [kill stale -> rm stale] -> up -> extract IDs
//!        -> inspect each -> verify running -> Fleet
//! ```
//!
//! Any failure aborts the sequence without returning a fleet. Containers
//! that were already started by an aborted sequence are left for the caller
//! to clean up.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dockhand_common::config::FleetConfig;
use dockhand_common::error::{DockhandError, Result};
use dockhand_common::types::{ContainerId, Stage};
use dockhand_runtime::inspect::{self, Container};
use dockhand_runtime::process::{CommandRunner, SystemRunner};

use crate::{manifest, startup};

/// Optional steps of the start sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartOptions {
    /// Pull every image before starting.
    pub force_pull: bool,
    /// Kill and remove containers left over in the project before starting.
    pub remove_stale: bool,
}

/// A running group of containers started from one manifest.
#[derive(Debug, Clone)]
pub struct Fleet {
    project: String,
    manifest_path: PathBuf,
    containers: BTreeMap<String, Container>,
}

impl Fleet {
    /// Compose project namespace the fleet was started under.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Rendered manifest the fleet was started from.
    #[must_use]
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Snapshots keyed by service name, as taken at start.
    #[must_use]
    pub const fn containers(&self) -> &BTreeMap<String, Container> {
        &self.containers
    }

    /// Returns the snapshot of `service`, if it was started.
    #[must_use]
    pub fn container(&self, service: &str) -> Option<&Container> {
        self.containers.get(service)
    }

    /// Service names in sorted order.
    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.containers.keys().map(String::as_str)
    }

    /// Number of containers in the fleet.
    #[must_use]
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Returns whether the fleet started no containers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Returns the host port a service publishes `exposed_port/proto` on.
    ///
    /// # Errors
    ///
    /// Returns [`DockhandError::Lookup`] if the service is unknown or the
    /// port is not published.
    pub fn public_port(&self, service: &str, exposed_port: u16, proto: &str) -> Result<u16> {
        self.container(service)
            .ok_or_else(|| DockhandError::Lookup {
                message: format!("no service '{service}' in project {}", self.project),
            })?
            .public_port(exposed_port, proto)
    }
}

/// Drives `docker-compose` and `docker` through the fleet lifecycle.
#[derive(Debug, Clone)]
pub struct FleetController<R = SystemRunner> {
    config: FleetConfig,
    runner: R,
}

impl FleetController<SystemRunner> {
    /// Creates a controller that runs the real tools.
    #[must_use]
    pub const fn system(config: FleetConfig) -> Self {
        Self::new(config, SystemRunner::new())
    }
}

impl<R: CommandRunner> FleetController<R> {
    /// Creates a controller that runs external programs through `runner`.
    #[must_use]
    pub const fn new(config: FleetConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Configuration this controller was created with.
    #[must_use]
    pub const fn config(&self) -> &FleetConfig {
        &self.config
    }

    /// Starts the fleet described by `manifest` and waits for it to be verified.
    ///
    /// # Errors
    ///
    /// Returns [`DockhandError::Io`] if the manifest cannot be written, a
    /// stage-wrapped error if any compose step fails, any error of
    /// [`inspect::inspect`], or
    /// [`DockhandError::NotRunning`] naming the first container that is
    /// not running.
    pub fn start(&self, manifest_text: &str, options: StartOptions) -> Result<Fleet> {
        let project = self.config.project_name.as_str();
        tracing::info!(project, "initializing fleet");

        let rendered = manifest::substitute_env(manifest_text);
        match manifest::service_names(&rendered) {
            Ok(services) => tracing::debug!(project, ?services, "manifest rendered"),
            Err(e) => tracing::debug!(project, error = %e, "could not list manifest services"),
        }
        let manifest_path = match &self.config.manifest_dir {
            Some(dir) => manifest::write_manifest_in(dir, &rendered)?,
            None => manifest::write_manifest(&rendered)?,
        };

        let ids = self.bring_up(&manifest_path, options)?;
        let containers = self.verify(&ids)?;

        tracing::info!(project, count = containers.len(), "fleet ready");
        Ok(Fleet {
            project: project.to_owned(),
            manifest_path,
            containers,
        })
    }

    /// Kills every container of `fleet`. The handle stays queryable afterwards.
    ///
    /// # Errors
    ///
    /// Returns a [`Stage::Killing`] error if the compose invocation fails.
    pub fn kill(&self, fleet: &Fleet) -> Result<()> {
        self.compose_in(&fleet.project, &fleet.manifest_path, Stage::Killing, &["kill"])
            .map(drop)
    }

    /// Force-removes every container of `fleet`.
    ///
    /// # Errors
    ///
    /// Returns a [`Stage::Removing`] error if the compose invocation fails.
    pub fn remove(&self, fleet: &Fleet) -> Result<()> {
        self.compose_in(
            &fleet.project,
            &fleet.manifest_path,
            Stage::Removing,
            &["rm", "--force"],
        )
        .map(drop)
    }

    /// Kills the containers of a rendered manifest in this controller's project.
    ///
    /// # Errors
    ///
    /// Returns a [`Stage::Killing`] error if the compose invocation fails.
    pub fn kill_manifest(&self, manifest_path: &Path) -> Result<()> {
        self.compose(manifest_path, Stage::Killing, &["kill"]).map(drop)
    }

    /// Force-removes the containers of a rendered manifest in this controller's project.
    ///
    /// # Errors
    ///
    /// Returns a [`Stage::Removing`] error if the compose invocation fails.
    pub fn remove_manifest(&self, manifest_path: &Path) -> Result<()> {
        self.compose(manifest_path, Stage::Removing, &["rm", "--force"])
            .map(drop)
    }

    /// Runs the compose steps up to and including `up`, returning the started IDs.
    fn bring_up(&self, manifest_path: &Path, options: StartOptions) -> Result<Vec<ContainerId>> {
        if options.force_pull {
            let _ = self.compose(manifest_path, Stage::Pulling, &["pull"])?;
        }

        if options.remove_stale {
            let _ = self.compose(manifest_path, Stage::KillingStale, &["kill"])?;
            let _ = self.compose(manifest_path, Stage::RemovingStale, &["rm", "--force"])?;
        }

        let output = self.compose(manifest_path, Stage::Starting, &["--verbose", "up", "-d"])?;
        let ids = startup::started_container_ids(&output);
        tracing::info!(project = %self.config.project_name, count = ids.len(), "containers started");
        tracing::debug!(ids = ?ids.iter().map(ContainerId::short).collect::<Vec<_>>(), "started container ids");
        Ok(ids)
    }

    /// Inspects every started container and keys the running ones by service name.
    fn verify(&self, ids: &[ContainerId]) -> Result<BTreeMap<String, Container>> {
        tracing::info!(project = %self.config.project_name, "{}...", Stage::Verifying);
        let mut containers = BTreeMap::new();
        for id in ids {
            let container = inspect::inspect(&self.runner, &self.config.runtime_program, id)?;
            if !container.is_running() {
                tracing::warn!(
                    project = %self.config.project_name,
                    name = %container.name,
                    status = %container.state.status,
                    "started container is not running"
                );
                return Err(DockhandError::NotRunning {
                    name: container.name,
                });
            }
            let _ = containers.insert(container.service_name().to_owned(), container);
        }
        Ok(containers)
    }

    fn compose(&self, manifest_path: &Path, stage: Stage, args: &[&str]) -> Result<String> {
        self.compose_in(&self.config.project_name, manifest_path, stage, args)
    }

    fn compose_in(
        &self,
        project: &str,
        manifest_path: &Path,
        stage: Stage,
        args: &[&str],
    ) -> Result<String> {
        tracing::info!(project, "{stage}...");
        let mut full_args = vec![
            "-f".to_owned(),
            manifest_path.display().to_string(),
            "-p".to_owned(),
            project.to_owned(),
        ];
        full_args.extend(args.iter().map(|a| (*a).to_owned()));

        self.runner
            .run(&self.config.compose_program, &full_args)
            .map_err(|e| e.in_stage(stage))
    }
}
