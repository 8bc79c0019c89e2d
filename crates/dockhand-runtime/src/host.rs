//! Inference of the host that published container ports are reachable on.

use std::sync::LazyLock;

use dockhand_common::constants::{DEFAULT_HOST, DOCKER_HOST_ENV};
use dockhand_common::error::{DockhandError, Result};
use regex::Regex;

#[allow(clippy::expect_used)]
static DOCKER_HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("://([^:]+):").expect("valid host pattern"));

/// Returns the host published ports are reachable on, based on `DOCKER_HOST`.
///
/// # Errors
///
/// Returns [`DockhandError::Config`] if `DOCKER_HOST` is set but does not
/// look like `scheme://host:port`.
pub fn infer_host() -> Result<String> {
    infer_host_from(std::env::var(DOCKER_HOST_ENV).ok().as_deref())
}

/// Returns the host named by a `DOCKER_HOST`-style value.
///
/// An absent or empty value means a local daemon, reachable on `localhost`.
///
/// # Errors
///
/// Returns [`DockhandError::Config`] unless the value contains exactly one
/// `://host:` segment.
pub fn infer_host_from(docker_host: Option<&str>) -> Result<String> {
    let Some(value) = docker_host.filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_HOST.to_owned());
    };

    let mut captures = DOCKER_HOST_RE.captures_iter(value);
    match (captures.next(), captures.next()) {
        (Some(caps), None) => {
            let host = caps[1].to_owned();
            tracing::debug!(docker_host = value, host = %host, "inferred container host");
            Ok(host)
        }
        _ => Err(DockhandError::Config {
            message: format!("cannot parse {DOCKER_HOST_ENV} '{value}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_means_localhost() {
        assert_eq!(infer_host_from(None).expect("host"), "localhost");
        assert_eq!(infer_host_from(Some("")).expect("host"), "localhost");
    }

    #[test]
    fn tcp_host_is_extracted() {
        let host = infer_host_from(Some("tcp://192.168.99.100:2376")).expect("host");
        assert_eq!(host, "192.168.99.100");
    }

    #[test]
    fn value_without_scheme_is_rejected() {
        let err = infer_host_from(Some("garbage")).expect_err("should fail");
        assert!(matches!(err, DockhandError::Config { .. }));
    }

    #[test]
    fn unix_socket_is_rejected() {
        let err = infer_host_from(Some("unix:///var/run/docker.sock")).expect_err("no port");
        assert!(matches!(err, DockhandError::Config { .. }));
    }
}
