//! Central configuration for the mock_identity crate

use std::sync::LazyLock;

/// Prefix added to every role before it becomes an authority
///
/// Default: "ROLE_"
pub static MOCK_IDENTITY_ROLE_PREFIX: LazyLock<String> = LazyLock::new(|| {
    std::env::var("MOCK_IDENTITY_ROLE_PREFIX").unwrap_or_else(|_| "ROLE_".to_string())
});

/// Username used by mock descriptors that do not name one
///
/// Default: "user"
pub static MOCK_IDENTITY_DEFAULT_USERNAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("MOCK_IDENTITY_DEFAULT_USERNAME").unwrap_or_else(|_| "user".to_string())
});

/// Password used by mock descriptors that do not name one
///
/// Default: "password"
pub static MOCK_IDENTITY_DEFAULT_PASSWORD: LazyLock<String> = LazyLock::new(|| {
    std::env::var("MOCK_IDENTITY_DEFAULT_PASSWORD").unwrap_or_else(|_| "password".to_string())
});

/// Roles granted by mock descriptors that set neither roles nor authorities
pub const DEFAULT_ROLES: &[&str] = &["USER"];

/// Principal name of the anonymous authentication
pub const ANONYMOUS_PRINCIPAL: &str = "anonymousUser";

/// Role granted to the anonymous authentication (before prefixing)
pub const ANONYMOUS_ROLE: &str = "ANONYMOUS";
