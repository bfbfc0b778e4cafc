//! Command line and environment configuration.

use clap::Parser;

/// Well-known name claimed on the session bus.
pub const DEFAULT_BUS_NAME: &str = "org.freedesktop.impl.portal.desktop.rfd";
/// Object path the portal frontend calls backends on.
pub const DEFAULT_OBJECT_PATH: &str = "/org/freedesktop/portal/desktop";

/// File chooser backend for xdg-desktop-portal.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "xdg-desktop-portal-rfd", version, about)]
pub struct Args {
    /// Well-known bus name to own.
    #[arg(long, env = "XDP_FILECHOOSER_BUS_NAME", default_value = DEFAULT_BUS_NAME)]
    pub bus_name: String,

    /// Object path the interface is served at.
    #[arg(long, env = "XDP_FILECHOOSER_OBJECT_PATH", default_value = DEFAULT_OBJECT_PATH)]
    pub object_path: String,

    /// Take over the bus name from a running instance.
    #[arg(long)]
    pub replace: bool,

    /// Tracing filter directives, e.g. `xdp_filechooser=trace`.
    #[arg(long, env = "XDP_FILECHOOSER_LOG")]
    pub log_filter: Option<String>,

    /// Debug-level logging with thread ids and source locations.
    #[arg(short, long)]
    pub verbose: bool,
}
