//! Discovery of started container IDs from `docker-compose --verbose up` output.
//!
//! Compose does not report what it started in a structured form, so the IDs
//! are scraped from its verbose API trace. Each started container produces a
//! line ending in
//!
//! ```text
//! docker start <- (u'<container id>')
//! ```
//!
//! If the tool changes this format the scrape yields no IDs; the pinned
//! sample in the tests exists to catch that.

use std::sync::LazyLock;

use dockhand_common::types::ContainerId;
use regex::Regex;

/// Pattern matching one "container started" trace line.
pub const STARTED_LINE_PATTERN: &str = r"(?m)docker start <- \(u'(.*)'\)\r?$";

#[allow(clippy::expect_used)]
static STARTED_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(STARTED_LINE_PATTERN).expect("valid start-line pattern"));

/// Returns the IDs announced by start lines, in output order.
///
/// Duplicates are kept: a container started twice is reported twice.
#[must_use]
pub fn started_container_ids(output: &str) -> Vec<ContainerId> {
    STARTED_LINE_RE
        .captures_iter(output)
        .map(|caps| ContainerId::new(&caps[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Captured from `docker-compose -f <file> -p dockhand --verbose up -d` (compose 1.x).
    const UP_SAMPLE: &str = "\
compose.config.config.find: Using configuration files: /tmp/docker-compose-0c1d2e
docker.auth.auth.load_config: File doesn't exist
compose.cli.command.get_client: docker-compose version 1.3.1, build 4af6d4c
compose.cli.verbose_proxy.proxy_callable: docker containers <- (all=True)
compose.cli.verbose_proxy.proxy_callable: docker containers -> (list with 0 items)
Creating dockhand_db_1...
compose.cli.verbose_proxy.proxy_callable: docker create_container <- (name=u'dockhand_db_1', image='postgres:9.4')
compose.cli.verbose_proxy.proxy_callable: docker create_container -> {u'Id': u'8c2e1f4b9a7d6c5e4f3a2b1c0d9e8f7a6b5c4d3e2f1a0b9c8d7e6f5a4b3c2d1e'}
compose.cli.verbose_proxy.proxy_callable: docker start <- (u'8c2e1f4b9a7d6c5e4f3a2b1c0d9e8f7a6b5c4d3e2f1a0b9c8d7e6f5a4b3c2d1e')
compose.cli.verbose_proxy.proxy_callable: docker start -> None
Creating dockhand_web_1...
compose.cli.verbose_proxy.proxy_callable: docker create_container <- (name=u'dockhand_web_1', image='nginx:1.9')
compose.cli.verbose_proxy.proxy_callable: docker start <- (u'3f1b1c7f2d9e8a6b5c4d3e2f1a0b9c8d7e6f5a4b3c2d1e0f9a8b7c6d5e4f3a2b')
compose.cli.verbose_proxy.proxy_callable: docker start -> None
";

    #[test]
    fn ids_from_captured_sample_in_order() {
        let ids = started_container_ids(UP_SAMPLE);
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].short(), "8c2e1f4b9a7d");
        assert_eq!(ids[1].short(), "3f1b1c7f2d9e");
    }

    #[test]
    fn duplicates_are_kept() {
        let out = "docker start <- (u'aaa')\ndocker start <- (u'aaa')\n";
        let ids = started_container_ids(out);
        assert_eq!(ids, vec![ContainerId::new("aaa"), ContainerId::new("aaa")]);
    }

    #[test]
    fn crlf_line_endings_are_tolerated() {
        let ids = started_container_ids("docker start <- (u'abc')\r\n");
        assert_eq!(ids, vec![ContainerId::new("abc")]);
    }

    #[test]
    fn unrelated_output_yields_nothing() {
        let out = "Creating network \"dockhand_default\"\nContainer dockhand-web-1  Started\n";
        assert!(started_container_ids(out).is_empty());
    }
}
