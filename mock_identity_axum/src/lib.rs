//! mock_identity_axum - exercise an axum `Router` as a chosen identity
//!
//! Requests are built with [`MockRequest`] and adjusted by post-processors
//! ([`http_basic`], [`csrf`], [`user`], [`form_login`], ...). [`MockMvc`]
//! sends them in-process through a simulated security filter chain and the
//! router, and hands back an [`MvcResult`] whose captured security context
//! can be checked with [`authenticated`] and [`unauthenticated`].
//!
//! ```
//! use axum::{Router, routing::get};
//! use mock_identity_axum::{CurrentContext, MockMvc, MockRequest, authenticated, user};
//!
//! async fn whoami(CurrentContext(context): CurrentContext) -> String {
//!     context
//!         .authentication()
//!         .map(|a| a.name().to_string())
//!         .unwrap_or_default()
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let mvc = MockMvc::new(Router::new().route("/whoami", get(whoami)));
//! let result = mvc
//!     .perform(MockRequest::get("/whoami").with(user("admin").roles(["ADMIN"])))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(result.body_text(), "admin");
//! result
//!     .and_expect(authenticated().with_username("admin").with_roles(["ADMIN"]))
//!     .unwrap();
//! # });
//! ```

mod config;
mod errors;
mod matchers;
mod processors;
mod request;
mod server;
mod utils;

#[cfg(test)]
mod test_utils;

pub use config::{
    MOCK_MVC_CSRF_HEADER, MOCK_MVC_CSRF_PARAMETER, MOCK_MVC_LOGIN_URL, MOCK_MVC_LOGOUT_URL,
    MOCK_MVC_PASSWORD_PARAMETER, MOCK_MVC_SESSION_COOKIE_NAME, MOCK_MVC_SESSION_MAX_AGE,
    MOCK_MVC_USERNAME_PARAMETER,
};

pub use errors::{AssertionError, MockMvcError};

pub use matchers::{Authenticated, ResultMatcher, Unauthenticated, authenticated, unauthenticated};

pub use processors::{
    AnonymousProcessor, CsrfProcessor, ExpectedCsrfToken, FormLoginRequestBuilder, HttpBasic,
    InjectedContext, LogoutRequestBuilder, MockUserProcessor, RequestPostProcessor,
    TestSecurityContext, anonymous, authentication, csrf, form_login, http_basic, logout,
    security_context, test_security_context, user, user_details,
};

pub use request::MockRequest;

pub use server::{
    AuthenticatedUser, CurrentContext, MockMvc, MockMvcBuilder, MvcResult, SecurityConfig,
    Unauthorized,
};
