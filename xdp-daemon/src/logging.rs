//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Args;

/// Default filter: info+ for the portal crates, warn+ for everything else.
pub const DEFAULT_FILTER: &str =
    "xdp_filechooser=info,xdp_filechooser_rfd=info,xdp_daemon=info,xdg_desktop_portal_rfd=info,warn";

/// Development filter used with `--verbose`.
pub const DEV_FILTER: &str =
    "xdp_filechooser=debug,xdp_filechooser_rfd=debug,xdp_daemon=debug,xdg_desktop_portal_rfd=debug,info";

/// Pick the filter directives for `args`.
///
/// An explicit `--log-filter` wins, then `RUST_LOG` (passed in as `env`),
/// then the verbose or default filter.
pub fn filter_directives(args: &Args, env: Option<&str>) -> String {
    if let Some(filter) = &args.log_filter {
        return filter.clone();
    }
    if let Some(env) = env.filter(|s| !s.trim().is_empty()) {
        return env.to_owned();
    }
    if args.verbose {
        DEV_FILTER.to_owned()
    } else {
        DEFAULT_FILTER.to_owned()
    }
}

/// Install the global subscriber. Logs go to stderr.
pub fn init_tracing(args: &Args) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = filter_directives(args, env.as_deref());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|err| {
        eprintln!("invalid log filter {directives:?}: {err}; using defaults");
        EnvFilter::new(DEFAULT_FILTER)
    });

    let verbose = args.verbose;
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(verbose)
        .with_file(verbose)
        .with_line_number(verbose)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["xdg-desktop-portal-rfd"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn explicit_filter_beats_env_and_verbose() {
        let a = args(&["--log-filter", "zbus=trace", "--verbose"]);
        assert_eq!(filter_directives(&a, Some("warn")), "zbus=trace");
    }

    #[test]
    fn env_beats_builtin_filters() {
        assert_eq!(filter_directives(&args(&["-v"]), Some("error")), "error");
        assert_eq!(filter_directives(&args(&[]), Some("  ")), DEFAULT_FILTER);
    }

    #[test]
    fn verbose_selects_dev_filter() {
        assert_eq!(filter_directives(&args(&["-v"]), None), DEV_FILTER);
        assert_eq!(filter_directives(&args(&[]), None), DEFAULT_FILTER);
    }

    #[test]
    fn builtin_filters_parse() {
        EnvFilter::try_new(DEFAULT_FILTER).unwrap();
        EnvFilter::try_new(DEV_FILTER).unwrap();
    }
}
