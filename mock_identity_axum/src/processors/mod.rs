mod basic;
mod csrf;
mod identity;
mod login;

use crate::request::MockRequest;

pub use basic::{HttpBasic, http_basic};
pub use csrf::{CsrfProcessor, ExpectedCsrfToken, csrf};
pub(crate) use identity::InjectedSecurityContext;
pub use identity::{
    AnonymousProcessor, InjectedContext, MockUserProcessor, TestSecurityContext, anonymous,
    authentication, security_context, test_security_context, user, user_details,
};
pub use login::{FormLoginRequestBuilder, LogoutRequestBuilder, form_login, logout};

/// Mutates a [`MockRequest`] before it is performed
pub trait RequestPostProcessor {
    fn post_process(&self, request: MockRequest) -> MockRequest;
}

impl<F> RequestPostProcessor for F
where
    F: Fn(MockRequest) -> MockRequest,
{
    fn post_process(&self, request: MockRequest) -> MockRequest {
        self(request)
    }
}
