use http::header::AUTHORIZATION;

use crate::request::MockRequest;
use crate::utils::basic_authorization_value;

use super::RequestPostProcessor;

/// Adds an HTTP Basic `Authorization` header
#[derive(Debug, Clone)]
pub struct HttpBasic {
    username: String,
    password: String,
}

pub fn http_basic(username: impl Into<String>, password: impl Into<String>) -> HttpBasic {
    HttpBasic {
        username: username.into(),
        password: password.into(),
    }
}

impl RequestPostProcessor for HttpBasic {
    fn post_process(&self, request: MockRequest) -> MockRequest {
        request.set_header(
            AUTHORIZATION.as_str(),
            &basic_authorization_value(&self.username, &self.password),
        )
    }
}
