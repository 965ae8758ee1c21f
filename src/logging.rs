//! Tracing setup.
//!
//! Log lines go to stderr so stdout reports stay clean. The TUI owns the
//! terminal while it runs, so its logs are discarded instead.
//! `RUST_LOG` wins over the `-v` count when set.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Where formatted log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    Discard,
}

impl LogTarget {
    fn make_writer(self) -> BoxMakeWriter {
        match self {
            LogTarget::Stderr => BoxMakeWriter::new(std::io::stderr),
            LogTarget::Discard => BoxMakeWriter::new(std::io::sink),
        }
    }
}

/// Default filter directive for a given `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init_tracing(verbosity: u8, target: LogTarget) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(target.make_writer())
        .with_target(false)
        .try_init();
}
