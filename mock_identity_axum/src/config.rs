//! Central configuration for the mock_identity_axum crate

use std::sync::LazyLock;

/// Path of the simulated form login endpoint
/// Default: "/login"
pub static MOCK_MVC_LOGIN_URL: LazyLock<String> =
    LazyLock::new(|| std::env::var("MOCK_MVC_LOGIN_URL").unwrap_or_else(|_| "/login".to_string()));

/// Path of the simulated logout endpoint
/// Default: "/logout"
pub static MOCK_MVC_LOGOUT_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("MOCK_MVC_LOGOUT_URL").unwrap_or_else(|_| "/logout".to_string())
});

pub static MOCK_MVC_USERNAME_PARAMETER: LazyLock<String> = LazyLock::new(|| {
    std::env::var("MOCK_MVC_USERNAME_PARAMETER").unwrap_or_else(|_| "username".to_string())
});

pub static MOCK_MVC_PASSWORD_PARAMETER: LazyLock<String> = LazyLock::new(|| {
    std::env::var("MOCK_MVC_PASSWORD_PARAMETER").unwrap_or_else(|_| "password".to_string())
});

/// Form parameter carrying the CSRF token
/// Default: "_csrf"
pub static MOCK_MVC_CSRF_PARAMETER: LazyLock<String> = LazyLock::new(|| {
    std::env::var("MOCK_MVC_CSRF_PARAMETER").unwrap_or_else(|_| "_csrf".to_string())
});

/// Header carrying the CSRF token
/// Default: "X-CSRF-TOKEN"
pub static MOCK_MVC_CSRF_HEADER: LazyLock<String> = LazyLock::new(|| {
    std::env::var("MOCK_MVC_CSRF_HEADER").unwrap_or_else(|_| "X-CSRF-TOKEN".to_string())
});

pub static MOCK_MVC_SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("MOCK_MVC_SESSION_COOKIE_NAME").unwrap_or_else(|_| "MOCKSESSION".to_string())
});

/// Session lifetime in seconds
/// Default: 1800 (30 minutes)
pub static MOCK_MVC_SESSION_MAX_AGE: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("MOCK_MVC_SESSION_MAX_AGE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1800)
});
