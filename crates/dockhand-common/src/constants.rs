//! System-wide constants and default values.

/// Default compose project namespace shared by fleets that do not pick one.
pub const DEFAULT_PROJECT_NAME: &str = "dockhand";

/// Default compose-style orchestration tool.
pub const DEFAULT_COMPOSE_PROGRAM: &str = "docker-compose";

/// Default container runtime CLI used for `inspect` queries.
pub const DEFAULT_RUNTIME_PROGRAM: &str = "docker";

/// Attempt count of the default retry policy.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 10;

/// Initial delay of the default retry policy, in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 100;

/// Delay growth factor between retry attempts.
pub const RETRY_BACKOFF_MULTIPLIER: u32 = 2;

/// Environment variable naming the remote container daemon.
pub const DOCKER_HOST_ENV: &str = "DOCKER_HOST";

/// Host returned when no remote daemon is configured.
pub const DEFAULT_HOST: &str = "localhost";

/// File name prefix of rendered manifests written to the temp directory.
pub const MANIFEST_TEMP_PREFIX: &str = "docker-compose-";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "dockhand";
