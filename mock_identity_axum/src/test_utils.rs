use std::sync::Once;

static INIT: Once = Once::new();

/// Shared unit test setup: `.env_test` plus a tracing subscriber on the test writer
pub(crate) fn init_test_tracing() {
    INIT.call_once(|| {
        dotenvy::from_filename(".env_test").ok();
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}
