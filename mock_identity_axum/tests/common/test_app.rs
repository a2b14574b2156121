use std::sync::Once;

use axum::{
    Router,
    routing::{get, post},
};
use mock_identity_axum::{AuthenticatedUser, CurrentContext, MockMvc, SecurityConfig};

use super::fixtures::TestUsers;

static INIT: Once = Once::new();

/// Load `.env_test` and route tracing output through the test harness
pub fn init_test_environment() {
    INIT.call_once(|| {
        dotenvy::from_filename(".env_test").ok();
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

async fn whoami(CurrentContext(context): CurrentContext) -> String {
    context
        .authentication()
        .filter(|a| a.is_authenticated())
        .map(|a| a.name().to_string())
        .unwrap_or_else(|| "anonymous".to_string())
}

async fn dashboard(AuthenticatedUser(auth): AuthenticatedUser) -> String {
    format!("dashboard for {}", auth.name())
}

async fn transfer(CurrentContext(context): CurrentContext) -> String {
    let from = context
        .authentication()
        .map(|a| a.name().to_string())
        .unwrap_or_default();
    format!("transferred by {from}")
}

pub fn test_router() -> Router {
    Router::new()
        .route("/", get(|| async { "home" }))
        .route("/whoami", get(whoami))
        .route("/admin/dashboard", get(dashboard))
        .route("/transfer", post(transfer))
}

pub fn security_config() -> SecurityConfig {
    SecurityConfig::default().protect("/admin")
}

/// `MockMvc` over the test router with the fixture users
pub fn mock_mvc() -> MockMvc {
    init_test_environment();
    MockMvc::builder(test_router())
        .config(security_config())
        .user_details_service(TestUsers::service())
        .with_http_trace()
        .build()
}
