use http::StatusCode;
use mock_identity_axum::{
    MockMvc, MockRequest, SecurityConfig, authenticated, csrf, form_login, logout,
    unauthenticated, user,
};

use crate::common::{TestUsers, init_test_environment, mock_mvc, test_router};

#[tokio::test]
async fn test_session_cookie_carries_identity() {
    let mvc = mock_mvc();

    let login = mvc.perform(form_login()).await.expect("login performed");
    let session_id = login.session_id().expect("session issued").to_string();

    let result = mvc
        .perform(MockRequest::get("/whoami").cookie(mvc.session_cookie_name(), &session_id))
        .await
        .expect("request performed");
    assert_eq!(result.body_text(), "user");
    result
        .and_expect(authenticated().with_username("user").with_roles(["USER"]))
        .expect("session identity");

    let without_cookie = mvc
        .perform(MockRequest::get("/whoami"))
        .await
        .expect("request performed");
    assert_eq!(without_cookie.body_text(), "anonymous");
    without_cookie
        .and_expect(unauthenticated())
        .expect("no cookie, no identity");
}

#[tokio::test]
async fn test_logout_clears_session() {
    let mvc = mock_mvc();

    let login = mvc.perform(form_login()).await.expect("login performed");
    let session_id = login.session_id().expect("session issued").to_string();
    assert_eq!(mvc.active_sessions().await, 1);

    let result = mvc
        .perform(logout().build().cookie(mvc.session_cookie_name(), &session_id))
        .await
        .expect("logout performed");
    assert_eq!(result.status(), StatusCode::FOUND);
    assert_eq!(result.redirected_url(), Some("/login?logout"));
    assert_eq!(result.session_id(), None, "cookie is expired, not reissued");
    result
        .and_expect(unauthenticated())
        .expect("no identity after logout");
    assert_eq!(mvc.active_sessions().await, 0);

    let after = mvc
        .perform(MockRequest::get("/whoami").cookie(mvc.session_cookie_name(), &session_id))
        .await
        .expect("request performed");
    after
        .and_expect(unauthenticated())
        .expect("old session is gone");
}

#[tokio::test]
async fn test_logout_with_invalid_csrf_keeps_session() {
    let mvc = mock_mvc();

    let login = mvc.perform(form_login()).await.expect("login performed");
    let session_id = login.session_id().expect("session issued").to_string();

    let result = mvc
        .perform(
            logout()
                .csrf(csrf().use_invalid_token())
                .build()
                .cookie(mvc.session_cookie_name(), &session_id),
        )
        .await
        .expect("logout performed");
    assert_eq!(result.status(), StatusCode::FORBIDDEN);
    assert_eq!(mvc.active_sessions().await, 1);
}

#[tokio::test]
async fn test_expired_session_is_ignored() {
    init_test_environment();
    let mvc = MockMvc::builder(test_router())
        .config(SecurityConfig::default().session_max_age(0))
        .user_details_service(TestUsers::service())
        .build();

    let login = mvc.perform(form_login()).await.expect("login performed");
    let session_id = login.session_id().expect("session issued").to_string();

    let result = mvc
        .perform(MockRequest::get("/whoami").cookie(mvc.session_cookie_name(), &session_id))
        .await
        .expect("request performed");
    result
        .and_expect(unauthenticated())
        .expect("expired session carries no identity");
    assert_eq!(mvc.active_sessions().await, 0);
}

#[tokio::test]
async fn test_out_of_range_session_max_age_fails_login() {
    init_test_environment();
    for max_age in [u64::MAX, 10_000_000_000_000] {
        let mvc = MockMvc::builder(test_router())
            .config(SecurityConfig::default().session_max_age(max_age))
            .user_details_service(TestUsers::service())
            .build();

        let login = mvc.perform(form_login()).await.expect("login performed");
        assert_eq!(login.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(login.session_id(), None);
        assert!(login.body_text().contains("out of range"), "{}", login.body_text());
        login
            .and_expect(unauthenticated())
            .expect("failed login carries no identity");
        assert_eq!(mvc.active_sessions().await, 0);
    }
}

#[tokio::test]
async fn test_protected_prefix_rejects_unauthenticated() {
    let mvc = mock_mvc();

    let denied = mvc
        .perform(MockRequest::get("/admin/dashboard"))
        .await
        .expect("request performed");
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
    denied.and_expect(unauthenticated()).expect("nobody");

    let allowed = mvc
        .perform(MockRequest::get("/admin/dashboard").with(user("root").roles(["ADMIN"])))
        .await
        .expect("request performed");
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(allowed.body_text(), "dashboard for root");

    let sibling = mvc
        .perform(MockRequest::get("/administrator"))
        .await
        .expect("request performed");
    assert_eq!(sibling.status(), StatusCode::NOT_FOUND);
}
