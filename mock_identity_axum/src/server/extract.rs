use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    response::{IntoResponse, Response},
};
use http::{StatusCode, request::Parts};

use mock_identity::{Authentication, SecurityContext};

/// Security context resolved by the filter chain for this request
///
/// Empty when the request did not go through the filter chain.
///
/// ```no_run
/// use axum::{Router, routing::get};
/// use mock_identity_axum::CurrentContext;
///
/// async fn whoami(CurrentContext(context): CurrentContext) -> String {
///     context
///         .authentication()
///         .map(|a| a.name().to_string())
///         .unwrap_or_default()
/// }
///
/// let app: Router = Router::new().route("/whoami", get(whoami));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CurrentContext(pub SecurityContext);

impl<S> FromRequestParts<S> for CurrentContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CurrentContext>()
            .cloned()
            .unwrap_or_default())
    }
}

pub struct Unauthorized;

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        tracing::debug!("Unauthorized");
        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    }
}

/// Authenticated identity of the request; rejects with 401 otherwise
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Authentication);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Unauthorized;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentContext>()
            .and_then(|c| c.0.authentication())
            .filter(|a| a.is_authenticated())
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(Unauthorized)
    }
}
