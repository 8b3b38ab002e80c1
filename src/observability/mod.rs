//! Tracing setup for the binary.
//!
//! The library only emits `tracing` events and spans; installing a
//! subscriber is left to the host. `init_tracing` is what the `routemap`
//! binary uses: human-readable output on stderr, filtered by `RUST_LOG`
//! when set and by the `-v` count otherwise.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a given `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "routemap=warn",
        1 => "routemap=info",
        2 => "routemap=debug",
        _ => "routemap=trace",
    }
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
