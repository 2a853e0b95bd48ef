//! Social login via verified identity assertions.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;

use common::{
    PROVIDER_SECRET, TEST_AUDIENCE, TEST_ISSUER, body_json, mint_assertion,
    mint_assertion_claims, send, session_cookie_header, signup, test_app,
    test_app_social_disabled,
};
use percale_core::store::UserStore;

async fn social_login(app: &axum::Router, assertion: &str) -> axum::response::Response {
    send(
        app,
        "POST",
        "/social-login",
        None,
        Some(json!({"assertion": assertion})),
    )
    .await
}

#[tokio::test]
async fn first_social_login_creates_an_account_and_session() {
    let t = test_app();
    let response = social_login(&t.app, &mint_assertion("s@x.com", "Sacha", 300)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie_header(&response).expect("social login should set the cookie");
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "s@x.com");
    assert_eq!(body["user"]["name"], "Sacha");
    assert_eq!(body["user"]["role"], "CUSTOMER");

    let stored = t.store.find_by_email("s@x.com").await.unwrap().unwrap();
    assert!(stored.password_hash.is_none());

    let response = send(&t.app, "GET", "/me", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], "s@x.com");
}

#[tokio::test]
async fn repeat_social_login_reuses_the_existing_account() {
    let t = test_app();
    let first = body_json(social_login(&t.app, &mint_assertion("s@x.com", "Sacha", 300)).await).await;
    let second =
        body_json(social_login(&t.app, &mint_assertion("s@x.com", "Sacha", 300)).await).await;
    assert_eq!(first["user"]["id"], second["user"]["id"]);
}

#[tokio::test]
async fn social_login_does_not_overwrite_a_password_account() {
    let t = test_app();
    signup(&t.app, "A", "a@x.com", "secret1").await;

    let response = social_login(&t.app, &mint_assertion("a@x.com", "A", 300)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The password credential survives, so a normal login still works.
    let stored = t.store.find_by_email("a@x.com").await.unwrap().unwrap();
    assert!(stored.password_hash.is_some());
    assert_eq!(
        common::login(&t.app, "a@x.com", "secret1").await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn assertion_signed_with_the_wrong_key_is_rejected() {
    let t = test_app();
    let now = Utc::now().timestamp();
    let assertion = mint_assertion_claims(
        &json!({
            "email": "s@x.com",
            "iss": TEST_ISSUER,
            "aud": TEST_AUDIENCE,
            "exp": now + 300,
            "iat": now,
        }),
        "some-other-secret",
    );
    let response = social_login(&t.app, &assertion).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid identity assertion");
    assert!(t.store.find_by_email("s@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn assertion_for_another_audience_is_rejected() {
    let t = test_app();
    let now = Utc::now().timestamp();
    let assertion = mint_assertion_claims(
        &json!({
            "email": "s@x.com",
            "iss": TEST_ISSUER,
            "aud": "someone-else",
            "exp": now + 300,
            "iat": now,
        }),
        PROVIDER_SECRET,
    );
    let response = social_login(&t.app, &assertion).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_assertion_is_rejected() {
    let t = test_app();
    let response = social_login(&t.app, &mint_assertion("s@x.com", "Sacha", -10)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn assertion_without_an_email_claim_is_rejected() {
    let t = test_app();
    let now = Utc::now().timestamp();
    let assertion = mint_assertion_claims(
        &json!({
            "name": "No Email",
            "iss": TEST_ISSUER,
            "aud": TEST_AUDIENCE,
            "exp": now + 300,
            "iat": now,
        }),
        PROVIDER_SECRET,
    );
    let response = social_login(&t.app, &assertion).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Assertion carries no email claim");
}

#[tokio::test]
async fn missing_assertion_is_rejected() {
    let t = test_app();
    let response = send(&t.app, "POST", "/social-login", None, Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn social_login_rejects_everything_when_no_provider_is_configured() {
    let t = test_app_social_disabled();
    let response = social_login(&t.app, &mint_assertion("s@x.com", "Sacha", 300)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(t.store.find_by_email("s@x.com").await.unwrap().is_none());
}
