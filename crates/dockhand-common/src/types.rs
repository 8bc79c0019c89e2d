//! Domain primitive types used across the Dockhand workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a container as reported by the container runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    /// Creates a new container ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the conventional 12-character short form.
    #[must_use]
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContainerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Phase of the fleet lifecycle, used for log context and error wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Pulling images referenced by the manifest.
    Pulling,
    /// Killing containers left over from an earlier run.
    KillingStale,
    /// Removing containers left over from an earlier run.
    RemovingStale,
    /// Bringing the fleet up.
    Starting,
    /// Inspecting a started container.
    Inspecting,
    /// Checking that every started container is running.
    Verifying,
    /// Killing the fleet.
    Killing,
    /// Removing the fleet's containers.
    Removing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pulling => write!(f, "pulling images"),
            Self::KillingStale => write!(f, "killing stale containers"),
            Self::RemovingStale => write!(f, "removing stale containers"),
            Self::Starting => write!(f, "starting containers"),
            Self::Inspecting => write!(f, "inspecting container"),
            Self::Verifying => write!(f, "verifying containers"),
            Self::Killing => write!(f, "killing containers"),
            Self::Removing => write!(f, "removing containers"),
        }
    }
}
