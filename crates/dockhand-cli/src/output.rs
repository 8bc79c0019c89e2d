//! Formatted output helpers for CLI commands.

use dockhand_runtime::inspect::Container;

pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const CYAN: &str = "\x1b[36m";
pub const RESET: &str = "\x1b[0m";

/// Returns `(port/proto, host port)` for every published port of `container`.
///
/// Only the first binding of each port is reported, matching
/// [`Container::public_port`].
pub fn published_ports(container: &Container) -> Vec<(&str, &str)> {
    container
        .network_settings
        .iter()
        .flat_map(|settings| settings.ports.iter())
        .filter_map(|(spec, bindings)| {
            bindings
                .first()
                .map(|b| (spec.as_str(), b.host_port.as_str()))
        })
        .collect()
}
