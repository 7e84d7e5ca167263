// Diagnostic logging
//
// Configure via the RUST_LOG environment variable:
// - `RUST_LOG=debug` - all debug logs
// - `RUST_LOG=keepnotes::store=debug` - store operations only

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a stderr subscriber filtered by RUST_LOG (default: warn)
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true);

    // A subscriber may already be set (e.g. by a test harness)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
