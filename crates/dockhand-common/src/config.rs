//! Configuration model for a fleet controller.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_COMPOSE_PROGRAM, DEFAULT_PROJECT_NAME, DEFAULT_RUNTIME_PROGRAM};

/// Settings passed explicitly to each fleet controller.
///
/// Two controllers with different `project_name` values never touch each
/// other's containers, so concurrent fleets should use [`FleetConfig::isolated`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Compose project namespace (`-p`) scoping every compose invocation.
    pub project_name: String,
    /// Compose-style orchestration tool to invoke.
    pub compose_program: String,
    /// Container runtime CLI used for `inspect` queries.
    pub runtime_program: String,
    /// Directory rendered manifests are written to; the system temp
    /// directory when unset.
    pub manifest_dir: Option<PathBuf>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_owned(),
            compose_program: DEFAULT_COMPOSE_PROGRAM.to_owned(),
            runtime_program: DEFAULT_RUNTIME_PROGRAM.to_owned(),
            manifest_dir: None,
        }
    }
}

impl FleetConfig {
    /// Returns a default configuration with a unique project name.
    #[must_use]
    pub fn isolated() -> Self {
        Self::default().with_project_name(format!(
            "{DEFAULT_PROJECT_NAME}{}",
            uuid::Uuid::new_v4().simple()
        ))
    }

    /// Replaces the project namespace.
    #[must_use]
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    /// Replaces the compose-style tool.
    #[must_use]
    pub fn with_compose_program(mut self, program: impl Into<String>) -> Self {
        self.compose_program = program.into();
        self
    }

    /// Replaces the container runtime CLI.
    #[must_use]
    pub fn with_runtime_program(mut self, program: impl Into<String>) -> Self {
        self.runtime_program = program.into();
        self
    }

    /// Writes rendered manifests into `dir` instead of the system temp directory.
    #[must_use]
    pub fn with_manifest_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.manifest_dir = Some(dir.into());
        self
    }
}
