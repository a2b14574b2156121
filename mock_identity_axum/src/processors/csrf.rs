use crate::config::{MOCK_MVC_CSRF_HEADER, MOCK_MVC_CSRF_PARAMETER};
use crate::request::MockRequest;
use crate::utils::gen_random_string;

use super::RequestPostProcessor;

/// Token the simulated filter chain expects for this request
///
/// Takes precedence over the token stored in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedCsrfToken(pub String);

/// Adds an anti-forgery token to the request
#[derive(Debug, Clone, Default)]
pub struct CsrfProcessor {
    as_header: bool,
    invalid: bool,
}

pub fn csrf() -> CsrfProcessor {
    CsrfProcessor::default()
}

impl CsrfProcessor {
    /// Send the token in the CSRF header instead of a form parameter
    pub fn as_header(mut self) -> Self {
        self.as_header = true;
        self
    }

    /// Send a token that is present but does not match the expected one
    pub fn use_invalid_token(mut self) -> Self {
        self.invalid = true;
        self
    }
}

impl RequestPostProcessor for CsrfProcessor {
    fn post_process(&self, mut request: MockRequest) -> MockRequest {
        let token = match gen_random_string(32) {
            Ok(token) => token,
            Err(e) => {
                request.fail(format!("Failed to generate CSRF token: {e}"));
                return request;
            }
        };
        let submitted = if self.invalid {
            format!("invalid{token}")
        } else {
            token.clone()
        };

        let request = request.extension(ExpectedCsrfToken(token));
        if self.as_header {
            request.set_header(&MOCK_MVC_CSRF_HEADER, &submitted)
        } else {
            request.set_param(MOCK_MVC_CSRF_PARAMETER.as_str(), submitted)
        }
    }
}
