use axum::body::Body;
use http::header::{CONTENT_TYPE, COOKIE, HeaderName, HeaderValue};
use http::{Extensions, HeaderMap, Method, Request};

use crate::errors::MockMvcError;
use crate::processors::RequestPostProcessor;
use crate::utils::encode_form;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Simulated outgoing request, mutated by post-processors before it is performed
///
/// Request-scoped attributes such as an injected security context or the
/// expected CSRF token travel in the request extensions.
#[derive(Debug, Clone)]
pub struct MockRequest {
    method: Method,
    path: String,
    headers: HeaderMap,
    params: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    extensions: Extensions,
    error: Option<String>,
}

impl MockRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            params: Vec::new(),
            cookies: Vec::new(),
            body: None,
            extensions: Extensions::new(),
            error: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a header; an invalid name or value fails the request when performed
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::try_from(name),
            HeaderValue::try_from(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => self.fail(format!("Invalid header {name}: {value}")),
        }
        self
    }

    /// Set a header, replacing any existing values
    pub fn set_header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::try_from(name),
            HeaderValue::try_from(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => self.fail(format!("Invalid header {name}: {value}")),
        }
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Set a parameter, replacing any existing values of the same name
    pub fn set_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.params.retain(|(k, _)| *k != name);
        self.params.push((name, value.into()));
        self
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    pub fn content_type(self, content_type: &str) -> Self {
        self.set_header(CONTENT_TYPE.as_str(), content_type)
    }

    /// Explicit body; parameters then go to the query string
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn extension<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.extensions.insert(value);
        self
    }

    /// Apply a post-processor
    pub fn with(self, processor: impl RequestPostProcessor) -> Self {
        processor.post_process(self)
    }

    /// Mark the request as unusable; `into_http_request` reports the reason
    pub(crate) fn fail(&mut self, reason: String) {
        tracing::error!("Mock request failed: {}", reason);
        self.error.get_or_insert(reason);
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// First value of a parameter
    pub fn param_value(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    fn params_in_body(&self) -> bool {
        self.body.is_none()
            && matches!(self.method, Method::POST | Method::PUT | Method::PATCH)
    }

    /// Convert into an `http::Request` ready for the service under test
    pub fn into_http_request(self) -> Result<Request<Body>, MockMvcError> {
        if let Some(reason) = self.error {
            return Err(MockMvcError::InvalidRequest(reason));
        }

        let params_in_body = self.params_in_body();
        let uri = if params_in_body || self.params.is_empty() {
            self.path.clone()
        } else {
            let separator = if self.path.contains('?') { '&' } else { '?' };
            format!("{}{}{}", self.path, separator, encode_form(&self.params))
        };

        let mut headers = self.headers;
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            headers.append(
                COOKIE,
                HeaderValue::try_from(cookie)
                    .map_err(|e| MockMvcError::Cookie(e.to_string()))?,
            );
        }

        let body = match self.body {
            Some(body) => Body::from(body),
            None if params_in_body && !self.params.is_empty() => {
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
                }
                Body::from(encode_form(&self.params))
            }
            None => Body::empty(),
        };

        let mut request = Request::builder()
            .method(self.method)
            .uri(uri)
            .body(body)?;
        *request.headers_mut() = headers;
        *request.extensions_mut() = self.extensions;
        Ok(request)
    }
}
