//! Diagnostic logging setup.
//!
//! Progress text and reports go to stdout; tracing output goes to stderr.

use tracing::Level;

/// Install the global fmt subscriber. Safe to call more than once.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
