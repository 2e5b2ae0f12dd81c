//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Log filter for the CLI verbosity flags.
pub fn filter_directive(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install a stderr subscriber. `RUST_LOG` takes precedence over the flags.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose, quiet)));

    // A subscriber may already be installed (e.g. when embedded); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(filter_directive(0, false), "info");
        assert_eq!(filter_directive(0, true), "error");
        assert_eq!(filter_directive(1, true), "debug");
        assert_eq!(filter_directive(3, false), "trace");
    }
}
