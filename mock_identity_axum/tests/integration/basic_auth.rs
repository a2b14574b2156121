use http::StatusCode;
use mock_identity_axum::{MockRequest, authenticated, http_basic, unauthenticated};

use crate::common::mock_mvc;

#[test]
fn test_http_basic_header_value() {
    let request = MockRequest::get("/whoami").with(http_basic("user", "password"));
    assert_eq!(
        request.header_value("Authorization"),
        Some("Basic dXNlcjpwYXNzd29yZA==")
    );
}

#[tokio::test]
async fn test_http_basic_authenticates_against_lookup() {
    let mvc = mock_mvc();

    let result = mvc
        .perform(MockRequest::get("/whoami").with(http_basic("user", "password")))
        .await
        .expect("request performed");

    assert_eq!(result.status(), StatusCode::OK);
    assert_eq!(result.body_text(), "user");
    result
        .and_expect(authenticated().with_username("user").with_roles(["USER"]))
        .expect("authenticated as user");
    assert_eq!(result.session_id(), None, "Basic auth is stateless");
}

#[tokio::test]
async fn test_http_basic_bad_credentials() {
    let mvc = mock_mvc();

    for (username, password) in [("user", "wrong"), ("nobody", "password"), ("disabled", "password")] {
        let result = mvc
            .perform(MockRequest::get("/whoami").with(http_basic(username, password)))
            .await
            .expect("request performed");

        assert_eq!(result.status(), StatusCode::UNAUTHORIZED, "{username}");
        assert!(
            result
                .header("WWW-Authenticate")
                .is_some_and(|v| v.starts_with("Basic"))
        );
        result
            .and_expect(unauthenticated())
            .expect("no identity after failed Basic auth");
    }
}

#[tokio::test]
async fn test_http_basic_reaches_protected_path() {
    let mvc = mock_mvc();

    let denied = mvc
        .perform(MockRequest::get("/admin/dashboard"))
        .await
        .expect("request performed");
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

    let allowed = mvc
        .perform(MockRequest::get("/admin/dashboard").with(http_basic("admin", "admin-password")))
        .await
        .expect("request performed");
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(allowed.body_text(), "dashboard for admin");
    allowed
        .and_expect(authenticated().with_roles(["USER", "ADMIN"]))
        .expect("admin roles");
}
