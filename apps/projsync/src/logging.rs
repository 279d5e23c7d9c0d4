//! tracing subscriber setup for the CLI.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Directive for a run; `--verbose` takes precedence over `RUST_LOG`.
pub fn filter_directive(verbose: bool, rust_log: Option<&str>) -> String {
    match (verbose, rust_log) {
        (true, _) => "debug".to_string(),
        (false, Some(directive)) if !directive.trim().is_empty() => directive.to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Initialize logging to stderr so reports on stdout stay machine-readable.
pub fn init_logging(verbose: bool) {
    let directive = filter_directive(verbose, std::env::var("RUST_LOG").ok().as_deref());
    let filter_layer = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("Invalid log filter '{directive}': {e}; using '{DEFAULT_FILTER}'");
        EnvFilter::new(DEFAULT_FILTER)
    });

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(filter_directive(false, None), "info");
        assert_eq!(filter_directive(false, Some("  ")), "info");
    }

    #[test]
    fn test_rust_log_override() {
        assert_eq!(
            filter_directive(false, Some("projsync_engine=debug")),
            "projsync_engine=debug"
        );
    }

    #[test]
    fn test_verbose_raises_to_debug() {
        assert_eq!(filter_directive(true, Some("warn")), "debug");
    }
}
