//! Test utilities shared by the unit tests of this crate

use std::sync::Once;

/// Load `.env_test` (falling back to `.env`) and install a tracing subscriber
/// writing through the test harness, once per process
pub(crate) fn init_test_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}
