use http::StatusCode;
use mock_identity_axum::{
    MockMvc, MockRequest, SecurityConfig, authenticated, csrf, form_login, unauthenticated, user,
};

use crate::common::{TestUsers, init_test_environment, mock_mvc, test_router};

#[tokio::test]
async fn test_form_login_with_invalid_csrf_is_rejected() {
    let mvc = mock_mvc();

    let result = mvc
        .perform(form_login().csrf(csrf().use_invalid_token()))
        .await
        .expect("request performed");

    assert_eq!(result.status(), StatusCode::FORBIDDEN);
    result
        .and_expect(unauthenticated())
        .expect("no identity after CSRF rejection");
    assert_eq!(mvc.active_sessions().await, 0);
}

#[tokio::test]
async fn test_form_login_with_valid_csrf_is_accepted() {
    let mvc = mock_mvc();

    let result = mvc.perform(form_login()).await.expect("request performed");

    assert_eq!(result.status(), StatusCode::FOUND);
    assert_eq!(result.redirected_url(), Some("/"));
    assert!(result.session_id().is_some());
    result
        .and_expect(authenticated().with_username("user").with_roles(["USER"]))
        .expect("logged in as user");
}

#[tokio::test]
async fn test_form_login_bad_credentials_redirects_to_error() {
    let mvc = mock_mvc();

    let result = mvc
        .perform(form_login().user("user").password("not-the-password"))
        .await
        .expect("request performed");

    assert_eq!(result.status(), StatusCode::FOUND);
    assert_eq!(result.redirected_url(), Some("/login?error"));
    assert_eq!(result.session_id(), None);
    result.and_expect(unauthenticated()).expect("login failed");
}

#[tokio::test]
async fn test_form_login_custom_parameters() {
    init_test_environment();
    let mvc = MockMvc::builder(test_router())
        .config(
            SecurityConfig::default()
                .login_url("/auth/signin")
                .username_parameter("email")
                .password_parameter("secret"),
        )
        .user_details_service(TestUsers::service())
        .build();

    let result = mvc
        .perform(
            form_login()
                .login_processing_url("/auth/signin")
                .user_parameter("email")
                .password_parameter("secret")
                .user("admin")
                .password("admin-password"),
        )
        .await
        .expect("request performed");

    assert_eq!(result.status(), StatusCode::FOUND);
    result
        .and_expect(authenticated().with_username("admin"))
        .expect("logged in as admin");
}

#[tokio::test]
async fn test_login_page_hands_out_session_token() {
    let mvc = mock_mvc();

    let page = mvc
        .perform(MockRequest::get("/login"))
        .await
        .expect("request performed");
    assert_eq!(page.status(), StatusCode::OK);
    page.and_expect(unauthenticated()).expect("not yet logged in");
    let session_id = page.session_id().expect("session issued").to_string();
    let token = page.csrf_token().expect("csrf token issued").to_string();

    // Without a processor the session token is the expected one.
    let login = MockRequest::post("/login")
        .cookie(mvc.session_cookie_name(), &session_id)
        .param("username", "user")
        .param("password", TestUsers::PASSWORD)
        .param("_csrf", &token);
    let result = mvc.perform(login).await.expect("request performed");

    assert_eq!(result.status(), StatusCode::FOUND);
    result
        .and_expect(authenticated().with_username("user"))
        .expect("logged in");
    let new_session = result.session_id().expect("new session issued");
    assert_ne!(new_session, session_id, "session id rotates on login");
    assert_eq!(mvc.active_sessions().await, 1);
}

#[tokio::test]
async fn test_state_changing_request_needs_token() {
    let mvc = mock_mvc();

    let missing = mvc
        .perform(MockRequest::post("/transfer").with(user("alice")))
        .await
        .expect("request performed");
    assert_eq!(missing.status(), StatusCode::FORBIDDEN);

    let invalid = mvc
        .perform(
            MockRequest::post("/transfer")
                .with(user("alice"))
                .with(csrf().as_header().use_invalid_token()),
        )
        .await
        .expect("request performed");
    assert_eq!(invalid.status(), StatusCode::FORBIDDEN);

    for processor in [csrf(), csrf().as_header()] {
        let accepted = mvc
            .perform(
                MockRequest::post("/transfer")
                    .with(user("alice"))
                    .with(processor),
            )
            .await
            .expect("request performed");
        assert_eq!(accepted.status(), StatusCode::OK);
        assert_eq!(accepted.body_text(), "transferred by alice");
    }
}

#[tokio::test]
async fn test_csrf_disabled() {
    init_test_environment();
    let mvc = MockMvc::builder(test_router())
        .config(SecurityConfig::default().csrf_enabled(false))
        .build();

    let result = mvc
        .perform(MockRequest::post("/transfer").with(user("alice")))
        .await
        .expect("request performed");
    assert_eq!(result.status(), StatusCode::OK);
}
