use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    middleware::from_fn_with_state,
    response::Response,
};
use http::{HeaderMap, Request, StatusCode, header::LOCATION};
use tower::{Layer, ServiceExt, util::BoxCloneSyncService};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use mock_identity::{Collaborators, SecurityContext, UserDetailsService};

use crate::errors::{AssertionError, MockMvcError};
use crate::matchers::ResultMatcher;
use crate::request::MockRequest;
use crate::utils::set_cookie_value;

use super::config::SecurityConfig;
use super::filter::{CapturedContext, FilterState, security_filter};
use super::session::SessionStore;

/// Drives an axum `Router` in-process through a simulated security filter chain
///
/// The filter chain wraps the whole router, so the login and logout
/// endpoints exist even when the router does not define them.
#[derive(Clone)]
pub struct MockMvc {
    service: BoxCloneSyncService<Request<Body>, Response, Infallible>,
    state: Arc<FilterState>,
}

impl MockMvc {
    pub fn new(app: Router) -> Self {
        Self::builder(app).build()
    }

    pub fn builder(app: Router) -> MockMvcBuilder {
        MockMvcBuilder {
            app,
            config: SecurityConfig::default(),
            services: Collaborators::new(),
            trace: false,
        }
    }

    pub fn config(&self) -> &SecurityConfig {
        &self.state.config
    }

    pub fn session_cookie_name(&self) -> &str {
        &self.state.config.session_cookie_name
    }

    pub async fn active_sessions(&self) -> usize {
        self.state.sessions.len().await
    }

    /// Send one request through the filter chain and the router
    pub async fn perform(&self, request: impl Into<MockRequest>) -> Result<MvcResult, MockMvcError> {
        let request: MockRequest = request.into();
        let request = request.into_http_request()?;
        tracing::debug!("Performing {} {}", request.method(), request.uri());

        let response = match self.service.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        let (parts, body) = response.into_parts();
        let body = to_bytes(body, usize::MAX)
            .await
            .map_err(|e| MockMvcError::Body(e.to_string()))?;
        let security_context = parts
            .extensions
            .get::<CapturedContext>()
            .map(|c| c.0.clone())
            .unwrap_or_default();
        let config = &self.state.config;

        Ok(MvcResult {
            status: parts.status,
            session_id: set_cookie_value(&parts.headers, &config.session_cookie_name)
                .filter(|v| !v.is_empty()),
            csrf_token: parts
                .headers
                .get(config.csrf_header.as_str())
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            headers: parts.headers,
            body,
            security_context,
        })
    }
}

pub struct MockMvcBuilder {
    app: Router,
    config: SecurityConfig,
    services: Collaborators,
    trace: bool,
}

impl MockMvcBuilder {
    pub fn config(mut self, config: SecurityConfig) -> Self {
        self.config = config;
        self
    }

    /// Lookup collaborator used for HTTP Basic and form login
    pub fn user_details_service(mut self, service: impl UserDetailsService + 'static) -> Self {
        self.services = self.services.with_user_details_service(service);
        self
    }

    pub fn collaborators(mut self, services: Collaborators) -> Self {
        self.services = services;
        self
    }

    /// Wrap the router in `tower_http::trace::TraceLayer`
    pub fn with_http_trace(mut self) -> Self {
        self.trace = true;
        self
    }

    pub fn build(self) -> MockMvc {
        let state = Arc::new(FilterState {
            config: self.config,
            services: self.services,
            sessions: SessionStore::new(),
        });
        let app = if self.trace {
            self.app.layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                    .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::DEBUG)
                            .latency_unit(LatencyUnit::Micros),
                    ),
            )
        } else {
            self.app
        };
        let filtered = from_fn_with_state(state.clone(), security_filter).layer(app);
        MockMvc {
            service: BoxCloneSyncService::new(filtered),
            state,
        }
    }
}

/// Outcome of one performed request
#[derive(Debug, Clone)]
pub struct MvcResult {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    security_context: SecurityContext,
    session_id: Option<String>,
    csrf_token: Option<String>,
}

impl MvcResult {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Context captured by the filter chain after the handler ran
    pub fn security_context(&self) -> &SecurityContext {
        &self.security_context
    }

    /// Session id issued by this response, if any
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// CSRF token handed out with a new session
    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    pub fn redirected_url(&self) -> Option<&str> {
        self.header(LOCATION.as_str())
    }

    pub fn and_expect(&self, matcher: impl ResultMatcher) -> Result<&Self, AssertionError> {
        matcher.matches(self)?;
        Ok(self)
    }

    #[cfg(test)]
    pub(crate) fn with_security_context(security_context: SecurityContext) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            security_context,
            session_id: None,
            csrf_token: None,
        }
    }
}
