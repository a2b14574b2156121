use mock_identity::{
    AnonymousFactory, Authentication, Collaborators, MockUserFactory, SecurityContext,
    SecurityContextFactory, SecurityContextHolder, UserDetails, WithAnonymousUser, WithMockUser,
};

use crate::request::MockRequest;

use super::RequestPostProcessor;

/// Context attached to a single request, bypassing authentication
#[derive(Debug, Clone)]
pub(crate) struct InjectedSecurityContext(pub(crate) SecurityContext);

/// Attaches a fixed security context to the request
#[derive(Debug, Clone)]
pub struct InjectedContext {
    context: SecurityContext,
}

impl RequestPostProcessor for InjectedContext {
    fn post_process(&self, request: MockRequest) -> MockRequest {
        tracing::debug!(
            principal = self.context.authentication().map(|a| a.name()),
            "Injecting security context into request"
        );
        request.extension(InjectedSecurityContext(self.context.clone()))
    }
}

pub fn security_context(context: SecurityContext) -> InjectedContext {
    InjectedContext { context }
}

pub fn authentication(authentication: Authentication) -> InjectedContext {
    security_context(SecurityContext::with_authentication(authentication))
}

/// Runs the request as an already authenticated `user`; the user is never looked up
pub fn user_details(user: UserDetails) -> InjectedContext {
    authentication(Authentication::username_password(user))
}

/// Attaches the anonymous identity
pub fn anonymous() -> AnonymousProcessor {
    AnonymousProcessor
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousProcessor;

impl RequestPostProcessor for AnonymousProcessor {
    fn post_process(&self, mut request: MockRequest) -> MockRequest {
        match AnonymousFactory.create_security_context(&WithAnonymousUser::new(), &Collaborators::new())
        {
            Ok(context) => security_context(context).post_process(request),
            Err(e) => {
                request.fail(format!("Failed to build anonymous identity: {e}"));
                request
            }
        }
    }
}

/// Copies the calling thread's installed context onto the request
///
/// Evaluated when the processor is applied, so apply it inside the test body.
/// Nothing is attached when the holder is empty.
pub fn test_security_context() -> TestSecurityContext {
    TestSecurityContext
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TestSecurityContext;

impl RequestPostProcessor for TestSecurityContext {
    fn post_process(&self, request: MockRequest) -> MockRequest {
        match SecurityContextHolder::current() {
            Some(context) => security_context(context).post_process(request),
            None => {
                tracing::debug!("No security context installed on this thread");
                request
            }
        }
    }
}

/// Runs the request as a synthesized user, same normalization as [`WithMockUser`]
#[derive(Debug, Clone)]
pub struct MockUserProcessor {
    descriptor: WithMockUser,
}

pub fn user(username: impl Into<String>) -> MockUserProcessor {
    MockUserProcessor {
        descriptor: WithMockUser::new().username(username),
    }
}

impl MockUserProcessor {
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.descriptor = self.descriptor.password(password);
        self
    }

    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.descriptor = self.descriptor.roles(roles);
        self
    }

    pub fn authorities<I, S>(mut self, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.descriptor = self.descriptor.authorities(authorities);
        self
    }
}

impl RequestPostProcessor for MockUserProcessor {
    fn post_process(&self, mut request: MockRequest) -> MockRequest {
        match MockUserFactory::authentication_for(&self.descriptor) {
            Ok(auth) => authentication(auth).post_process(request),
            Err(e) => {
                request.fail(format!(
                    "Invalid mock user {}: {e}",
                    self.descriptor.get_username()
                ));
                request
            }
        }
    }
}
