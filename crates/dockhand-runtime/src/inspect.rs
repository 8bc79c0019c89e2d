//! Typed snapshot of `docker inspect` output.
//!
//! The runtime omits or nulls many fields depending on container state and
//! daemon version, so every field except `Config.Cmd` tolerates being
//! absent and reads as its zero value. A [`Container`] is never updated in
//! place; inspecting again yields a new snapshot.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use dockhand_common::error::{DockhandError, Result};
use dockhand_common::types::{ContainerId, Stage};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::process::CommandRunner;

/// Point-in-time metadata of a single container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Container {
    /// Full container identifier.
    #[serde(rename = "Id", default)]
    pub id: ContainerId,
    /// Runtime-assigned name, conventionally with a leading `/`.
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    /// Creation time.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// Image digest the container was created from.
    #[serde(default, deserialize_with = "nullable")]
    pub image: String,
    /// Configuration the container was created with.
    #[serde(default)]
    pub config: Option<ContainerConfig>,
    /// Runtime state.
    #[serde(default, deserialize_with = "nullable")]
    pub state: ContainerState,
    /// Network settings, including published ports.
    #[serde(default)]
    pub network_settings: Option<NetworkSettings>,
}

/// Creation-time configuration of a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerConfig {
    /// Hostname inside the container.
    #[serde(default, deserialize_with = "nullable")]
    pub hostname: String,
    /// Exposed ports as `port/proto` strings.
    #[serde(
        default,
        deserialize_with = "port_set",
        serialize_with = "serialize_port_set"
    )]
    pub exposed_ports: BTreeSet<String>,
    /// Environment as `KEY=value` entries.
    #[serde(default, deserialize_with = "nullable")]
    pub env: Vec<String>,
    /// Command arguments. Must be present on the wire; `null` reads as empty.
    #[serde(deserialize_with = "nullable")]
    pub cmd: Vec<String>,
    /// Image reference the container was created from.
    #[serde(default, deserialize_with = "nullable")]
    pub image: String,
    /// Container labels.
    #[serde(default, deserialize_with = "nullable")]
    pub labels: BTreeMap<String, String>,
}

/// Runtime state of a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerState {
    /// Textual status such as `running` or `exited`.
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    /// Whether the main process is running.
    #[serde(default)]
    pub running: bool,
    /// Whether the container is paused.
    #[serde(default)]
    pub paused: bool,
    /// Whether the container is restarting.
    #[serde(default)]
    pub restarting: bool,
    /// Whether the main process was killed by the OOM killer.
    #[serde(rename = "OOMKilled", default)]
    pub oom_killed: bool,
    /// Host PID of the main process, zero when not running.
    #[serde(default)]
    pub pid: i64,
    /// Exit code of the last run.
    #[serde(default)]
    pub exit_code: i64,
    /// Runtime error message, if any.
    #[serde(default, deserialize_with = "nullable")]
    pub error: String,
    /// Start time of the last run.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Finish time of the last run.
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Network configuration of a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkSettings {
    /// Address on the default bridge network.
    #[serde(rename = "IPAddress", default, deserialize_with = "nullable")]
    pub ip_address: String,
    /// Host bindings keyed by `port/proto`.
    #[serde(default, deserialize_with = "port_bindings")]
    pub ports: BTreeMap<String, Vec<PortBinding>>,
}

/// A host address and port an exposed port is published on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortBinding {
    /// Host interface address.
    #[serde(rename = "HostIp", alias = "HostIP", default, deserialize_with = "nullable")]
    pub host_ip: String,
    /// Host port, as the runtime reports it (a string).
    #[serde(rename = "HostPort", default, deserialize_with = "nullable")]
    pub host_port: String,
}

impl Container {
    /// Returns whether the main process was running when inspected.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.state.running
    }

    /// Returns the name with its leading character removed.
    ///
    /// The runtime prefixes names with `/`. Exactly one character is dropped
    /// whatever it is, so a name without the prefix loses its first letter.
    #[must_use]
    pub fn service_name(&self) -> &str {
        let mut chars = self.name.chars();
        let _ = chars.next();
        chars.as_str()
    }

    /// Returns the host port `exposed_port/proto` is published on.
    ///
    /// Only the first binding is considered; further bindings of the same
    /// port are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DockhandError::Lookup`] if the container has no network
    /// settings, no binding for the port, or an unparsable host port.
    pub fn public_port(&self, exposed_port: u16, proto: &str) -> Result<u16> {
        let settings = self
            .network_settings
            .as_ref()
            .ok_or_else(|| DockhandError::Lookup {
                message: format!("no network settings for container '{}'", self.name),
            })?;

        let spec = format!("{exposed_port}/{}", proto.to_lowercase());
        let binding = settings
            .ports
            .get(&spec)
            .and_then(|bindings| bindings.first())
            .ok_or_else(|| DockhandError::Lookup {
                message: format!("no public port for {spec} on '{}'", self.name),
            })?;

        binding
            .host_port
            .parse()
            .map_err(|_| DockhandError::Lookup {
                message: format!("cannot parse host port '{}' for {spec}", binding.host_port),
            })
    }
}

/// Parses the body of `inspect <id>`, which must hold exactly one container.
///
/// # Errors
///
/// Returns [`DockhandError::Parse`] if `body` is not a JSON array of
/// container objects and [`DockhandError::Cardinality`] if it does not
/// contain exactly one element.
pub fn parse_inspect(id: &ContainerId, body: &str) -> Result<Container> {
    let mut containers: Vec<Container> =
        serde_json::from_str(body).map_err(|source| DockhandError::Parse {
            id: id.clone(),
            source,
        })?;

    match containers.len() {
        1 => Ok(containers.remove(0)),
        count => Err(DockhandError::Cardinality {
            id: id.clone(),
            count,
        }),
    }
}

/// Inspects a single container through the runtime CLI.
///
/// # Errors
///
/// Returns a [`Stage::Inspecting`] error if the runtime invocation fails,
/// otherwise any error of [`parse_inspect`].
pub fn inspect<R>(runner: &R, runtime_program: &str, id: &ContainerId) -> Result<Container>
where
    R: CommandRunner + ?Sized,
{
    tracing::debug!(id = %id.short(), "inspecting container");
    let body = runner
        .run(runtime_program, &["inspect".to_owned(), id.to_string()])
        .map_err(|e| e.in_stage(Stage::Inspecting))?;
    parse_inspect(id, &body)
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn port_set<'de, D>(deserializer: D) -> std::result::Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let ports: Option<BTreeMap<String, serde::de::IgnoredAny>> =
        Option::deserialize(deserializer)?;
    Ok(ports.map(|p| p.into_keys().collect()).unwrap_or_default())
}

fn serialize_port_set<S>(ports: &BTreeSet<String>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    #[derive(Serialize)]
    struct Empty {}

    serializer.collect_map(ports.iter().map(|p| (p, Empty {})))
}

fn port_bindings<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, Vec<PortBinding>>, D::Error>
where
    D: Deserializer<'de>,
{
    let ports: Option<BTreeMap<String, Option<Vec<PortBinding>>>> =
        Option::deserialize(deserializer)?;
    Ok(ports
        .unwrap_or_default()
        .into_iter()
        .map(|(spec, bindings)| (spec, bindings.unwrap_or_default()))
        .collect())
}
