//! Diagnostic logging setup.
//!
//! Library code logs through `tracing`; the binary installs a subscriber that
//! writes to stderr so it never mixes with command output on stdout.

use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is not set.
///
/// Other crates stay at `warn`; `verbosity` raises the level for strsync itself.
pub fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,strsync_cli={level}")
}

/// Installs the global subscriber. Calling it again is a no-op.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
