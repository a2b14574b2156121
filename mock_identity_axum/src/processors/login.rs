use mock_identity::{MOCK_IDENTITY_DEFAULT_PASSWORD, MOCK_IDENTITY_DEFAULT_USERNAME};

use crate::config::{
    MOCK_MVC_LOGIN_URL, MOCK_MVC_LOGOUT_URL, MOCK_MVC_PASSWORD_PARAMETER,
    MOCK_MVC_USERNAME_PARAMETER,
};
use crate::request::MockRequest;

use super::csrf::{CsrfProcessor, csrf};

/// Builds a form-login submission, valid CSRF token included
#[derive(Debug, Clone)]
pub struct FormLoginRequestBuilder {
    login_processing_url: String,
    username_parameter: String,
    password_parameter: String,
    username: String,
    password: String,
    csrf: CsrfProcessor,
}

pub fn form_login() -> FormLoginRequestBuilder {
    FormLoginRequestBuilder {
        login_processing_url: MOCK_MVC_LOGIN_URL.to_string(),
        username_parameter: MOCK_MVC_USERNAME_PARAMETER.to_string(),
        password_parameter: MOCK_MVC_PASSWORD_PARAMETER.to_string(),
        username: MOCK_IDENTITY_DEFAULT_USERNAME.to_string(),
        password: MOCK_IDENTITY_DEFAULT_PASSWORD.to_string(),
        csrf: csrf(),
    }
}

impl FormLoginRequestBuilder {
    pub fn login_processing_url(mut self, url: impl Into<String>) -> Self {
        self.login_processing_url = url.into();
        self
    }

    pub fn user(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn user_parameter(mut self, name: impl Into<String>) -> Self {
        self.username_parameter = name.into();
        self
    }

    pub fn password_parameter(mut self, name: impl Into<String>) -> Self {
        self.password_parameter = name.into();
        self
    }

    /// Replace the CSRF variant, e.g. `csrf().use_invalid_token()`
    pub fn csrf(mut self, csrf: CsrfProcessor) -> Self {
        self.csrf = csrf;
        self
    }

    pub fn build(self) -> MockRequest {
        MockRequest::post(self.login_processing_url)
            .param(self.username_parameter, self.username)
            .param(self.password_parameter, self.password)
            .with(self.csrf)
    }
}

impl From<FormLoginRequestBuilder> for MockRequest {
    fn from(builder: FormLoginRequestBuilder) -> Self {
        builder.build()
    }
}

/// Builds a logout submission, valid CSRF token included
#[derive(Debug, Clone)]
pub struct LogoutRequestBuilder {
    logout_url: String,
    csrf: CsrfProcessor,
}

pub fn logout() -> LogoutRequestBuilder {
    LogoutRequestBuilder {
        logout_url: MOCK_MVC_LOGOUT_URL.to_string(),
        csrf: csrf(),
    }
}

impl LogoutRequestBuilder {
    pub fn logout_url(mut self, url: impl Into<String>) -> Self {
        self.logout_url = url.into();
        self
    }

    pub fn csrf(mut self, csrf: CsrfProcessor) -> Self {
        self.csrf = csrf;
        self
    }

    pub fn build(self) -> MockRequest {
        MockRequest::post(self.logout_url).with(self.csrf)
    }
}

impl From<LogoutRequestBuilder> for MockRequest {
    fn from(builder: LogoutRequestBuilder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::ExpectedCsrfToken;
    use http::Method;

    #[test]
    fn test_form_login_defaults() {
        let request: MockRequest = form_login().into();
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.path(), "/login");
        assert_eq!(request.param_value("username"), Some("user"));
        assert_eq!(request.param_value("password"), Some("password"));

        let expected = request.extensions().get::<ExpectedCsrfToken>().unwrap();
        assert_eq!(request.param_value("_csrf"), Some(expected.0.as_str()));
    }

    #[test]
    fn test_form_login_custom_parameters() {
        let request = form_login()
            .login_processing_url("/auth")
            .user_parameter("email")
            .password_parameter("secret")
            .user("admin@example.com")
            .password("pw")
            .build();
        assert_eq!(request.path(), "/auth");
        assert_eq!(request.param_value("email"), Some("admin@example.com"));
        assert_eq!(request.param_value("secret"), Some("pw"));
        assert_eq!(request.param_value("username"), None);
    }

    #[test]
    fn test_form_login_invalid_csrf_variant() {
        let request = form_login().csrf(csrf().use_invalid_token()).build();
        let expected = request.extensions().get::<ExpectedCsrfToken>().unwrap();
        assert_ne!(request.param_value("_csrf"), Some(expected.0.as_str()));
    }

    #[test]
    fn test_logout_defaults() {
        let request = logout().build();
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.path(), "/logout");
        assert!(request.extensions().get::<ExpectedCsrfToken>().is_some());

        let header = logout().logout_url("/signout").csrf(csrf().as_header()).build();
        assert_eq!(header.path(), "/signout");
        assert!(header.header_value("X-CSRF-TOKEN").is_some());
    }
}
