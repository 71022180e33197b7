//! Integration test harness. The scenarios live in `tests/`; this
//! crate only hosts shared process-level setup.

use std::sync::Once;

use tracing_subscriber::{filter::EnvFilter, FmtSubscriber};

static INIT: Once = Once::new();

/// Initializes a tracing subscriber for test runs. Safe to call from
/// every test; only the first call installs the subscriber.
///
/// Verbosity follows `RUST_LOG`, defaulting to warnings so scenario
/// output stays readable.
pub fn init_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,symbiotic=info"));

        let subscriber = FmtSubscriber::builder()
            .with_target(false)
            .with_env_filter(filter)
            .with_test_writer()
            .finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
