//! Helpers shared by every integration test binary.

use tracing_subscriber::EnvFilter;

/// Route engine logs to the test harness. Honors `RUST_LOG`; defaults to
/// `tstruct_core=debug`. Safe to call from every test.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tstruct_core=debug"));
    // Only the first call in a test binary installs the subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
