use http::StatusCode;
use mock_identity::{
    Authentication, AuthenticationKind, Collaborators, ContextInjector, FactoryRegistry,
    Principal, SecurityContext, SecurityContextHolder, SetupError, TestDeclaration, TestSuite,
    UserDetails, WithAnonymousUser, WithMockUser, WithUserDetails, to_authorities,
};
use mock_identity_axum::{
    MockRequest, anonymous, authenticated, authentication, security_context,
    test_security_context, unauthenticated, user, user_details,
};

use crate::common::{TestUsers, mock_mvc};

fn injector() -> ContextInjector {
    ContextInjector::new(
        FactoryRegistry::new(),
        Collaborators::new().with_user_details_service(TestUsers::service()),
    )
}

#[tokio::test]
async fn test_back_to_back_tests_see_only_their_identity() {
    let mvc = mock_mvc();
    let mvc = &mvc;
    let mut injector = injector();
    let suite = TestSuite::new("AccountTests").with_descriptor(WithMockUser::new());

    let first = suite
        .test("admin_view")
        .method_level(WithMockUser::new().username("admin").roles(["ADMIN"]));
    let result = injector
        .run_test_async(&first, move || async move {
            mvc.perform(MockRequest::get("/whoami").with(test_security_context()))
                .await
                .expect("request performed")
        })
        .await
        .expect("setup succeeded");
    assert_eq!(result.body_text(), "admin");
    result
        .and_expect(authenticated().with_username("admin").with_roles(["ADMIN"]))
        .expect("first test runs as admin");
    assert!(!SecurityContextHolder::is_installed());

    let second = suite.test("user_view");
    let result = injector
        .run_test_async(&second, move || async move {
            mvc.perform(MockRequest::get("/whoami").with(test_security_context()))
                .await
                .expect("request performed")
        })
        .await
        .expect("setup succeeded");
    assert_eq!(result.body_text(), "user");
    result
        .and_expect(authenticated().with_username("user").with_roles(["USER"]))
        .expect("second test runs as the class-level user only");
    assert!(!SecurityContextHolder::is_installed());

    let third = TestDeclaration::new("no_identity");
    let result = injector
        .run_test_async(&third, move || async move {
            mvc.perform(MockRequest::get("/whoami").with(test_security_context()))
                .await
                .expect("request performed")
        })
        .await
        .expect("setup succeeded");
    result
        .and_expect(unauthenticated())
        .expect("nothing leaks into a test without identity");
}

#[tokio::test]
async fn test_user_details_descriptor_through_injector() {
    let mvc = mock_mvc();
    let mvc = &mvc;
    let mut injector = injector();

    let declaration = TestDeclaration::new("lookup").method_level(WithUserDetails::new("admin"));
    let result = injector
        .run_test_async(&declaration, move || async move {
            mvc.perform(MockRequest::get("/admin/dashboard").with(test_security_context()))
                .await
                .expect("request performed")
        })
        .await
        .expect("setup succeeded");
    assert_eq!(result.status(), StatusCode::OK);
    result
        .and_expect(authenticated().with_roles(["USER", "ADMIN"]))
        .expect("looked-up admin");
}

#[tokio::test]
async fn test_missing_identity_skips_body() {
    let mut injector = injector();
    let declaration = TestDeclaration::new("ghost").method_level(WithUserDetails::new("ghost"));

    let mut ran = false;
    let ran_flag = &mut ran;
    let result = injector
        .run_test_async(&declaration, move || async move {
            *ran_flag = true;
        })
        .await;

    assert_eq!(
        result,
        Err(SetupError::IdentityNotFound {
            username: "ghost".to_string()
        })
    );
    assert!(!ran);
    assert!(!SecurityContextHolder::is_installed());
}

#[tokio::test]
async fn test_anonymous_descriptor_is_unauthenticated() {
    let mvc = mock_mvc();
    let mvc = &mvc;
    let mut injector = injector();

    let declaration = TestDeclaration::new("anon").method_level(WithAnonymousUser::new());
    let result = injector
        .run_test_async(&declaration, move || async move {
            mvc.perform(MockRequest::get("/admin/dashboard").with(test_security_context()))
                .await
                .expect("request performed")
        })
        .await
        .expect("setup succeeded");
    assert_eq!(result.status(), StatusCode::UNAUTHORIZED);
    result.and_expect(unauthenticated()).expect("anonymous");
}

#[tokio::test]
async fn test_request_level_identities() {
    let mvc = mock_mvc();

    let by_user = mvc
        .perform(MockRequest::get("/whoami").with(user("ops").authorities(["metrics:read"])))
        .await
        .expect("request performed");
    by_user
        .and_expect(authenticated().with_authorities(["metrics:read"]))
        .expect("authorities verbatim");

    // Request-level identities are never looked up.
    let ghost = UserDetails::builder("ghost")
        .roles(["USER"])
        .build()
        .expect("valid user");
    let by_details = mvc
        .perform(MockRequest::get("/whoami").with(user_details(ghost)))
        .await
        .expect("request performed");
    assert_eq!(by_details.body_text(), "ghost");

    let custom = Authentication::new(
        Principal::Anonymous("service".to_string()),
        None,
        to_authorities(["SCOPE_jobs"]),
        true,
        AuthenticationKind::Custom("token".to_string()),
    );
    let by_auth = mvc
        .perform(MockRequest::get("/whoami").with(authentication(custom.clone())))
        .await
        .expect("request performed");
    by_auth
        .and_expect(
            authenticated()
                .with_username("service")
                .with_authentication("custom kind", |a| {
                    matches!(a.kind(), AuthenticationKind::Custom(_))
                }),
        )
        .expect("custom authentication");

    let by_context = mvc
        .perform(
            MockRequest::get("/whoami")
                .with(security_context(SecurityContext::with_authentication(custom))),
        )
        .await
        .expect("request performed");
    assert_eq!(by_context.body_text(), "service");

    let by_anonymous = mvc
        .perform(MockRequest::get("/whoami").with(anonymous()))
        .await
        .expect("request performed");
    assert_eq!(by_anonymous.body_text(), "anonymous");
    by_anonymous
        .and_expect(unauthenticated())
        .expect("anonymous is not authenticated");
}

#[tokio::test]
async fn test_invalid_mock_user_fails_perform() {
    let mvc = mock_mvc();
    let result = mvc
        .perform(MockRequest::get("/whoami").with(user("x").roles(["ROLE_ADMIN"])))
        .await;
    assert!(matches!(
        result,
        Err(mock_identity_axum::MockMvcError::InvalidRequest(_))
    ));
}
