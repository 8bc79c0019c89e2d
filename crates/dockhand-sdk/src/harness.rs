//! Fluent API for configuring and starting a test fleet.

use std::fmt;
use std::path::PathBuf;

use dockhand_common::config::FleetConfig;
use dockhand_common::error::Result;
use dockhand_compose::{Fleet, FleetController, StartOptions};
use dockhand_runtime::process::{CommandRunner, SystemRunner};
use dockhand_runtime::retry::RetryPolicy;

/// Builder for a fleet started from a manifest.
#[derive(Debug, Clone)]
pub struct HarnessBuilder {
    manifest: String,
    config: FleetConfig,
    options: StartOptions,
    retry: Option<RetryPolicy>,
}

impl HarnessBuilder {
    /// Creates a builder for the given manifest text.
    #[must_use]
    pub fn new(manifest: impl Into<String>) -> Self {
        Self {
            manifest: manifest.into(),
            config: FleetConfig::default(),
            options: StartOptions::default(),
            retry: None,
        }
    }

    /// Sets the compose project namespace.
    #[must_use]
    pub fn project(mut self, name: impl Into<String>) -> Self {
        self.config.project_name = name.into();
        self
    }

    /// Uses a unique project namespace so parallel harnesses do not collide.
    #[must_use]
    pub fn isolated(mut self) -> Self {
        self.config.project_name = FleetConfig::isolated().project_name;
        self
    }

    /// Replaces the whole controller configuration.
    #[must_use]
    pub fn config(mut self, config: FleetConfig) -> Self {
        self.config = config;
        self
    }

    /// Writes the rendered manifest into `dir` instead of the system temp directory.
    #[must_use]
    pub fn manifest_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.manifest_dir = Some(dir.into());
        self
    }

    /// Sets whether images are pulled before starting.
    #[must_use]
    pub const fn force_pull(mut self, pull: bool) -> Self {
        self.options.force_pull = pull;
        self
    }

    /// Sets whether leftover containers are killed and removed before starting.
    #[must_use]
    pub const fn remove_stale(mut self, remove: bool) -> Self {
        self.options.remove_stale = remove;
        self
    }

    /// Retries the whole start sequence under `policy`.
    #[must_use]
    pub const fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Starts the fleet with the real `docker-compose` and `docker` tools.
    ///
    /// # Errors
    ///
    /// Returns the error of the (last) start attempt.
    pub fn start(self) -> Result<Harness> {
        self.start_with(SystemRunner::new())
    }

    /// Starts the fleet, running external programs through `runner`.
    ///
    /// Every retried attempt kills and removes the project's containers
    /// before `up`, so containers left running by a failed attempt are
    /// started afresh and reported in the new attempt's output.
    ///
    /// # Errors
    ///
    /// Returns the error of the (last) start attempt.
    pub fn start_with<R: CommandRunner>(self, runner: R) -> Result<Harness<R>> {
        let controller = FleetController::new(self.config, runner);
        let fleet = match self.retry {
            Some(policy) => {
                let mut options = self.options;
                policy.run(|| {
                    let attempt = controller.start(&self.manifest, options);
                    options.remove_stale = true;
                    attempt
                })?
            }
            None => controller.start(&self.manifest, self.options)?,
        };
        tracing::info!(
            project = fleet.project(),
            services = ?fleet.services().collect::<Vec<_>>(),
            "harness ready"
        );
        Ok(Harness { controller, fleet })
    }
}

/// A started fleet together with the controller that can tear it down.
pub struct Harness<R = SystemRunner> {
    controller: FleetController<R>,
    fleet: Fleet,
}

impl<R> fmt::Debug for Harness<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Harness")
            .field("fleet", &self.fleet)
            .finish_non_exhaustive()
    }
}

impl<R: CommandRunner> Harness<R> {
    /// The started fleet.
    #[must_use]
    pub const fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// The controller the fleet was started with.
    #[must_use]
    pub const fn controller(&self) -> &FleetController<R> {
        &self.controller
    }

    /// Returns the host port `service` publishes `exposed_port/proto` on.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the service or port is unknown.
    pub fn public_port(&self, service: &str, exposed_port: u16, proto: &str) -> Result<u16> {
        self.fleet.public_port(service, exposed_port, proto)
    }

    /// Kills the fleet's containers.
    ///
    /// # Errors
    ///
    /// Returns a stage-wrapped error if the compose invocation fails.
    pub fn kill(&self) -> Result<()> {
        self.controller.kill(&self.fleet)
    }

    /// Kills and then force-removes the fleet's containers.
    ///
    /// # Errors
    ///
    /// Returns a stage-wrapped error if either compose invocation fails.
    pub fn teardown(&self) -> Result<()> {
        self.controller.kill(&self.fleet)?;
        self.controller.remove(&self.fleet)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use dockhand_common::error::DockhandError;
    use tempfile::TempDir;

    use super::*;

    fn scratch() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    const INSPECT_WEB: &str = r#"[{"Id": "aaa", "Name": "/web", "State": {"Running": true},
        "NetworkSettings": {"Ports": {"8080/tcp": [{"HostIp": "0.0.0.0", "HostPort": "40001"}]}}}]"#;

    fn answer(args: &[String]) -> String {
        match args.last().map(String::as_str) {
            Some("-d") => "docker start <- (u'aaa')\n".to_owned(),
            Some("aaa") => INSPECT_WEB.to_owned(),
            _ => String::new(),
        }
    }

    #[test]
    fn builder_passes_project_and_options() {
        let seen = Mutex::new(Vec::new());
        let runner = |_program: &str, args: &[String]| -> Result<String> {
            seen.lock().expect("lock").push(args.join(" "));
            Ok(answer(args))
        };

        let dir = scratch();
        let harness = HarnessBuilder::new("web: {}\n")
            .manifest_dir(dir.path())
            .project("sdktest")
            .remove_stale(true)
            .start_with(runner)
            .expect("start");

        assert_eq!(harness.fleet().project(), "sdktest");
        assert_eq!(harness.public_port("web", 8080, "tcp").expect("port"), 40001);

        harness.teardown().expect("teardown");
        let seen = seen.lock().expect("lock");
        assert!(seen[0].ends_with("-p sdktest kill"));
        assert!(seen[1].ends_with("-p sdktest rm --force"));
        assert!(seen.last().expect("calls").ends_with("-p sdktest rm --force"));
        assert!(seen.iter().any(|c| c.ends_with("--verbose up -d")));
    }

    #[test]
    fn retry_policy_absorbs_transient_failures() {
        let ups = AtomicU32::new(0);
        let runner = |program: &str, args: &[String]| -> Result<String> {
            if args.last().map(String::as_str) == Some("-d")
                && ups.fetch_add(1, Ordering::SeqCst) == 0
            {
                return Err(DockhandError::Command {
                    program: program.to_owned(),
                    status: Some(1),
                    output: "Cannot connect to the Docker daemon".into(),
                });
            }
            Ok(answer(args))
        };

        let dir = scratch();
        let harness = HarnessBuilder::new("web: {}\n")
            .manifest_dir(dir.path())
            .isolated()
            .retry(RetryPolicy::new(3, Duration::from_millis(1)))
            .start_with(runner)
            .expect("second attempt succeeds");

        assert_eq!(ups.load(Ordering::SeqCst), 2);
        assert_eq!(harness.fleet().len(), 1);
    }

    #[test]
    fn retried_start_restarts_containers_left_by_failed_attempt() {
        let ups = AtomicU32::new(0);
        let inspects_of_db = AtomicU32::new(0);
        let seen = Mutex::new(Vec::new());
        let runner = |program: &str, args: &[String]| -> Result<String> {
            seen.lock().expect("lock").push(args.join(" "));
            let body = |id: &str, name: &str| {
                format!(r#"[{{"Id": "{id}", "Name": "{name}", "State": {{"Running": true}}}}]"#)
            };
            match args.last().map(String::as_str) {
                Some("-d") => {
                    let first = ups.fetch_add(1, Ordering::SeqCst) == 0;
                    let removed = seen.lock().expect("lock").iter().any(|c| c.ends_with("rm --force"));
                    // Compose only logs start lines for containers it actually starts.
                    Ok(if first || removed {
                        "docker start <- (u'aaa')\ndocker start <- (u'bbb')\n".to_owned()
                    } else {
                        "Container web is up-to-date\nContainer db is up-to-date\n".to_owned()
                    })
                }
                Some("aaa") => Ok(body("aaa", "/web")),
                Some("bbb") if inspects_of_db.fetch_add(1, Ordering::SeqCst) == 0 => {
                    Err(DockhandError::Command {
                        program: program.to_owned(),
                        status: Some(1),
                        output: "Error: No such object: bbb".into(),
                    })
                }
                Some("bbb") => Ok(body("bbb", "/db")),
                _ => Ok(String::new()),
            }
        };

        let dir = scratch();
        let harness = HarnessBuilder::new("web: {}\ndb: {}\n")
            .manifest_dir(dir.path())
            .isolated()
            .retry(RetryPolicy::new(3, Duration::ZERO))
            .start_with(runner)
            .expect("second attempt succeeds");

        assert_eq!(ups.load(Ordering::SeqCst), 2);
        assert_eq!(harness.fleet().services().collect::<Vec<_>>(), vec!["db", "web"]);

        let seen = seen.lock().expect("lock");
        let first_up = seen.iter().position(|c| c.ends_with("up -d")).expect("first up");
        let retry = &seen[first_up + 1..];
        assert!(retry.iter().any(|c| c.ends_with(" kill")));
        assert!(retry.iter().any(|c| c.ends_with("rm --force")));
    }

    #[test]
    fn without_retry_the_first_failure_is_returned() {
        let runner = |program: &str, _args: &[String]| -> Result<String> {
            Err(DockhandError::Command {
                program: program.to_owned(),
                status: Some(1),
                output: String::new(),
            })
        };
        let dir = scratch();
        let err = HarnessBuilder::new("web: {}\n")
            .manifest_dir(dir.path())
            .isolated()
            .start_with(runner)
            .expect_err("should fail");
        assert!(err.to_string().starts_with("error starting containers"));
    }
}
