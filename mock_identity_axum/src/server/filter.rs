use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    RequestPartsExt,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use http::{
    HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
    header::{CONTENT_TYPE, LOCATION, WWW_AUTHENTICATE},
    request::Parts,
};
use subtle::ConstantTimeEq;

use mock_identity::{Authentication, Collaborators, SecurityContext};

use crate::errors::MockMvcError;
use crate::processors::{ExpectedCsrfToken, InjectedSecurityContext};
use crate::utils::{cookie_from_headers, decode_form, header_set_cookie};

use super::config::SecurityConfig;
use super::extract::CurrentContext;
use super::session::{SessionStore, StoredSession};

/// Shared state of the simulated filter chain
#[derive(Debug)]
pub(crate) struct FilterState {
    pub(crate) config: SecurityConfig,
    pub(crate) services: Collaborators,
    pub(crate) sessions: SessionStore,
}

/// Context as the filter chain saw it once the request was handled
#[derive(Debug, Clone)]
pub(crate) struct CapturedContext(pub(crate) SecurityContext);

type Outcome = (Response, SecurityContext);

pub(crate) async fn security_filter(
    State(state): State<Arc<FilterState>>,
    request: Request,
    next: Next,
) -> Response {
    let (mut response, context) = match filter_chain(&state, request, next).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Security filter chain failed: {}", e);
            (
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
                SecurityContext::empty(),
            )
        }
    };
    response.extensions_mut().insert(CapturedContext(context));
    response
}

async fn filter_chain(
    state: &FilterState,
    request: Request,
    next: Next,
) -> Result<Outcome, MockMvcError> {
    let config = &state.config;
    let (mut parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|e| MockMvcError::Body(e.to_string()))?;
    let form = if is_form(&parts.headers) {
        decode_form(&bytes)
    } else {
        Vec::new()
    };

    let session_id = cookie_from_headers(&parts.headers, &config.session_cookie_name);
    let session = match &session_id {
        Some(id) => state.sessions.get(id).await?,
        None => None,
    };

    if config.csrf_enabled && requires_csrf(&parts.method) {
        if let Err(reason) = verify_csrf(config, &parts, &form, session.as_ref()) {
            tracing::warn!("CSRF check failed for {} {}: {}", parts.method, parts.uri, reason);
            return Ok((
                (StatusCode::FORBIDDEN, "Invalid CSRF token").into_response(),
                SecurityContext::empty(),
            ));
        }
    }

    let path = parts.uri.path().to_string();
    if path == config.login_url {
        match parts.method {
            Method::GET => return login_page(state, session_id, session).await,
            Method::POST => return login(state, session_id, &form).await,
            _ => {}
        }
    }
    if path == config.logout_url && parts.method == Method::POST {
        return logout(state, session_id).await;
    }

    let basic = parts
        .extract::<TypedHeader<Authorization<Basic>>>()
        .await
        .ok()
        .map(|TypedHeader(auth)| auth);
    let context = match resolve_context(state, &parts, basic, session.as_ref()) {
        Ok(context) => context,
        Err(reason) => {
            tracing::debug!("HTTP Basic authentication failed: {}", reason);
            let mut response = (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Basic realm=\"Realm\""));
            return Ok((response, SecurityContext::empty()));
        }
    };

    if config.is_protected(&path) && !context.is_authenticated() {
        tracing::debug!("Rejecting unauthenticated request to {}", path);
        return Ok((
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            context,
        ));
    }

    parts.extensions.insert(CurrentContext(context.clone()));
    let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;
    Ok((response, context))
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"))
}

fn form_value<'a>(form: &'a [(String, String)], name: &str) -> Option<&'a str> {
    form.iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn requires_csrf(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Request-injected expectation wins over the session token; header wins over the form field
fn verify_csrf(
    config: &SecurityConfig,
    parts: &Parts,
    form: &[(String, String)],
    session: Option<&StoredSession>,
) -> Result<(), &'static str> {
    let expected = parts
        .extensions
        .get::<ExpectedCsrfToken>()
        .map(|t| t.0.as_str())
        .or_else(|| session.map(|s| s.csrf_token.as_str()))
        .ok_or("no expected token")?;

    let submitted = parts
        .headers
        .get(config.csrf_header.as_str())
        .and_then(|v| v.to_str().ok())
        .or_else(|| form_value(form, &config.csrf_parameter))
        .ok_or("missing token")?;

    if bool::from(submitted.as_bytes().ct_eq(expected.as_bytes())) {
        Ok(())
    } else {
        Err("token mismatch")
    }
}

fn resolve_context(
    state: &FilterState,
    parts: &Parts,
    basic: Option<Authorization<Basic>>,
    session: Option<&StoredSession>,
) -> Result<SecurityContext, String> {
    if let Some(injected) = parts.extensions.get::<InjectedSecurityContext>() {
        return Ok(injected.0.clone());
    }
    if let Some(basic) = basic {
        return authenticate(&state.services, basic.username(), basic.password())
            .map(SecurityContext::with_authentication);
    }
    Ok(session.map(|s| s.context.clone()).unwrap_or_default())
}

/// Verify credentials against the default lookup collaborator
fn authenticate(
    services: &Collaborators,
    username: &str,
    password: &str,
) -> Result<Authentication, String> {
    let service = services
        .user_details_service(None)
        .map_err(|e| e.to_string())?;
    let user = service
        .load_user_by_username(username)
        .map_err(|e| e.to_string())?;

    if !user.enabled {
        return Err(format!("User {username} is disabled"));
    }
    if !bool::from(user.password.as_bytes().ct_eq(password.as_bytes())) {
        return Err(format!("Bad credentials for {username}"));
    }
    Ok(Authentication::username_password(user))
}

fn redirect(location: &str) -> Result<Response, MockMvcError> {
    let location = HeaderValue::try_from(location)
        .map_err(|e| MockMvcError::InvalidRequest(e.to_string()))?;
    Ok((StatusCode::FOUND, [(LOCATION, location)]).into_response())
}

fn with_session(
    mut response: Response,
    config: &SecurityConfig,
    session_id: &str,
    session: &StoredSession,
) -> Result<Response, MockMvcError> {
    let max_age = i64::try_from(session.ttl).map_err(|_| {
        MockMvcError::Session(format!("Session max age {}s is out of range", session.ttl))
    })?;
    header_set_cookie(
        response.headers_mut(),
        &config.session_cookie_name,
        session_id,
        max_age,
    )?;
    let name = HeaderName::try_from(config.csrf_header.as_str())
        .map_err(|e| MockMvcError::Session(e.to_string()))?;
    let token = HeaderValue::try_from(session.csrf_token.as_str())
        .map_err(|e| MockMvcError::Session(e.to_string()))?;
    response.headers_mut().insert(name, token);
    Ok(response)
}

/// Hands out a session and its CSRF token to a client about to log in
async fn login_page(
    state: &FilterState,
    session_id: Option<String>,
    session: Option<StoredSession>,
) -> Result<Outcome, MockMvcError> {
    let (session_id, session) = match (session_id, session) {
        (Some(id), Some(session)) => (id, session),
        _ => {
            state
                .sessions
                .create(SecurityContext::empty(), state.config.session_max_age)
                .await?
        }
    };
    let context = session.context.clone();
    let response = with_session(
        (StatusCode::OK, "login").into_response(),
        &state.config,
        &session_id,
        &session,
    )?;
    Ok((response, context))
}

async fn login(
    state: &FilterState,
    session_id: Option<String>,
    form: &[(String, String)],
) -> Result<Outcome, MockMvcError> {
    let config = &state.config;
    let username = form_value(form, &config.username_parameter).unwrap_or_default();
    let password = form_value(form, &config.password_parameter).unwrap_or_default();

    let authentication = match authenticate(&state.services, username, password) {
        Ok(authentication) => authentication,
        Err(reason) => {
            tracing::info!("Form login failed: {}", reason);
            return Ok((redirect(&config.login_error_url())?, SecurityContext::empty()));
        }
    };

    // A fresh session id on every login.
    if let Some(old) = session_id {
        state.sessions.remove(&old).await;
    }
    let context = SecurityContext::with_authentication(authentication);
    let (session_id, session) = state
        .sessions
        .create(context.clone(), config.session_max_age)
        .await?;
    tracing::info!("Form login succeeded for {}", username);

    let response = with_session(
        redirect(&config.login_success_url)?,
        config,
        &session_id,
        &session,
    )?;
    Ok((response, context))
}

async fn logout(state: &FilterState, session_id: Option<String>) -> Result<Outcome, MockMvcError> {
    let config = &state.config;
    if let Some(id) = &session_id {
        if state.sessions.remove(id).await {
            tracing::info!("Logged out, session removed");
        }
    }
    let mut response = redirect(&config.logout_success_url())?;
    header_set_cookie(response.headers_mut(), &config.session_cookie_name, "", 0)?;
    Ok((response, SecurityContext::empty()))
}
