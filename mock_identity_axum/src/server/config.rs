use crate::config::{
    MOCK_MVC_CSRF_HEADER, MOCK_MVC_CSRF_PARAMETER, MOCK_MVC_LOGIN_URL, MOCK_MVC_LOGOUT_URL,
    MOCK_MVC_PASSWORD_PARAMETER, MOCK_MVC_SESSION_COOKIE_NAME, MOCK_MVC_SESSION_MAX_AGE,
    MOCK_MVC_USERNAME_PARAMETER,
};

/// Behavior of the simulated security filter chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityConfig {
    pub login_url: String,
    pub logout_url: String,
    /// Redirect target after a successful form login
    pub login_success_url: String,
    pub username_parameter: String,
    pub password_parameter: String,
    pub csrf_enabled: bool,
    pub csrf_parameter: String,
    pub csrf_header: String,
    pub session_cookie_name: String,
    pub session_max_age: u64,
    /// Path prefixes that answer 401 to unauthenticated requests, matched
    /// on whole path segments
    pub protected_prefixes: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            login_url: MOCK_MVC_LOGIN_URL.to_string(),
            logout_url: MOCK_MVC_LOGOUT_URL.to_string(),
            login_success_url: "/".to_string(),
            username_parameter: MOCK_MVC_USERNAME_PARAMETER.to_string(),
            password_parameter: MOCK_MVC_PASSWORD_PARAMETER.to_string(),
            csrf_enabled: true,
            csrf_parameter: MOCK_MVC_CSRF_PARAMETER.to_string(),
            csrf_header: MOCK_MVC_CSRF_HEADER.to_string(),
            session_cookie_name: MOCK_MVC_SESSION_COOKIE_NAME.to_string(),
            session_max_age: *MOCK_MVC_SESSION_MAX_AGE,
            protected_prefixes: Vec::new(),
        }
    }
}

impl SecurityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = url.into();
        self
    }

    pub fn logout_url(mut self, url: impl Into<String>) -> Self {
        self.logout_url = url.into();
        self
    }

    pub fn login_success_url(mut self, url: impl Into<String>) -> Self {
        self.login_success_url = url.into();
        self
    }

    pub fn username_parameter(mut self, name: impl Into<String>) -> Self {
        self.username_parameter = name.into();
        self
    }

    pub fn password_parameter(mut self, name: impl Into<String>) -> Self {
        self.password_parameter = name.into();
        self
    }

    pub fn csrf_enabled(mut self, enabled: bool) -> Self {
        self.csrf_enabled = enabled;
        self
    }

    pub fn session_max_age(mut self, seconds: u64) -> Self {
        self.session_max_age = seconds;
        self
    }

    pub fn protect(mut self, prefix: impl Into<String>) -> Self {
        self.protected_prefixes.push(prefix.into());
        self
    }

    pub(crate) fn is_protected(&self, path: &str) -> bool {
        self.protected_prefixes
            .iter()
            .any(|prefix| covers(prefix, path))
    }

    pub(crate) fn login_error_url(&self) -> String {
        format!("{}?error", self.login_url)
    }

    pub(crate) fn logout_success_url(&self) -> String {
        format!("{}?logout", self.login_url)
    }
}

/// `/admin` covers `/admin` and `/admin/..` but not `/administrator`
fn covers(prefix: &str, path: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
