pub mod mock_service;

use std::sync::Once;

static INIT: Once = Once::new();

/// Emits `tracing` output to stdout for whichever test called it, gated by
/// `RUST_LOG` (defaults to `info`). Safe to call from every test: `Once`
/// keeps repeated calls within one test binary from double-initializing.
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
            .with_test_writer()
            .init();
    });
}
