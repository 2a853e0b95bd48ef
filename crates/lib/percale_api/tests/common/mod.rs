//! Shared test fixtures: in-memory app state, a recording mailer and
//! request helpers.

#![allow(dead_code)]

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;

use percale_api::config::{ApiConfig, GateConfig};
use percale_api::{AppState, router};
use percale_core::auth::assertion::{DisabledVerifier, JwtIdentityVerifier, ProviderConfig};
use percale_core::auth::password::hash_password;
use percale_core::mail::{MailResult, Mailer};
use percale_core::models::user::{NewUser, Role, User};
use percale_core::store::UserStore;
use percale_core::store::memory::MemoryUserStore;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PROVIDER_SECRET: &str = "provider-integration-secret";
pub const TEST_ISSUER: &str = "https://id.example.test";
pub const TEST_AUDIENCE: &str = "percale-storefront";

/// Mailer that records deliveries instead of sending them.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<RwLock<Vec<(String, String)>>>,
}

impl RecordingMailer {
    pub fn sent_count(&self) -> usize {
        self.sent.read().unwrap().len()
    }

    pub fn last_reset_url(&self) -> Option<String> {
        self.sent.read().unwrap().last().map(|(_, url)| url.clone())
    }

    pub fn last_reset_token(&self) -> Option<String> {
        self.last_reset_url()
            .and_then(|url| url.split_once("token=").map(|(_, t)| t.to_string()))
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_password_reset(&self, to: &str, reset_url: &str) -> MailResult<()> {
        self.sent
            .write()
            .unwrap()
            .push((to.to_string(), reset_url.to_string()));
        Ok(())
    }
}

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryUserStore>,
    pub mailer: RecordingMailer,
}

pub fn test_config() -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        database_url: "postgres://unused".into(),
        session_secret: TEST_SECRET.into(),
        cookie_secure: false,
        public_base_url: "http://storefront.test".into(),
        gate: GateConfig::default(),
    }
}

pub fn test_app() -> TestApp {
    let verifier = JwtIdentityVerifier::new(ProviderConfig {
        secret: PROVIDER_SECRET.into(),
        issuer: TEST_ISSUER.into(),
        audience: TEST_AUDIENCE.into(),
    });
    build_app(Arc::new(verifier))
}

/// App with no identity provider configured; social login rejects all.
pub fn test_app_social_disabled() -> TestApp {
    build_app(Arc::new(DisabledVerifier))
}

fn build_app(
    verifier: Arc<dyn percale_core::auth::assertion::IdentityVerifier>,
) -> TestApp {
    let store = Arc::new(MemoryUserStore::new());
    let mailer = RecordingMailer::default();
    let state = AppState {
        store: store.clone(),
        mailer: Arc::new(mailer.clone()),
        verifier,
        config: test_config(),
    };
    TestApp {
        app: router(state),
        store,
        mailer,
    }
}

/// Send a request through the router, optionally with a `Cookie` header
/// and a JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `token=...` pair from a response's `Set-Cookie` header, usable
/// directly as a `Cookie` header value.
pub fn session_cookie_header(response: &Response) -> Option<String> {
    let set_cookie = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    let pair = set_cookie.split(';').next()?;
    pair.starts_with("token=").then(|| pair.to_string())
}

/// The bare session token value from a response's `Set-Cookie` header.
pub fn session_token_value(response: &Response) -> Option<String> {
    session_cookie_header(response)
        .and_then(|pair| pair.strip_prefix("token=").map(str::to_string))
}

pub async fn signup(app: &Router, name: &str, email: &str, password: &str) -> Response {
    send(
        app,
        "POST",
        "/signup",
        None,
        Some(json!({"name": name, "email": email, "password": password})),
    )
    .await
}

pub async fn login(app: &Router, email: &str, password: &str) -> Response {
    send(
        app,
        "POST",
        "/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await
}

/// Log in and return a `Cookie` header value for the new session.
pub async fn login_session(app: &Router, email: &str, password: &str) -> String {
    let response = login(app, email, password).await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie_header(&response).expect("login should set the session cookie")
}

/// Insert a user directly into the store, bypassing the endpoints.
pub async fn seed_user(store: &MemoryUserStore, email: &str, password: &str, role: Role) -> User {
    store
        .create(NewUser {
            email: email.to_string(),
            name: Some("Seeded".into()),
            image: None,
            password_hash: Some(hash_password(password).unwrap()),
            role,
        })
        .await
        .unwrap()
}

/// Sign an identity assertion with the given key and claim overrides.
pub fn mint_assertion_claims(claims: &Value, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// A well-formed assertion for the test provider.
pub fn mint_assertion(email: &str, name: &str, ttl_secs: i64) -> String {
    let now = Utc::now().timestamp();
    mint_assertion_claims(
        &json!({
            "email": email,
            "name": name,
            "iss": TEST_ISSUER,
            "aud": TEST_AUDIENCE,
            "exp": now + ttl_secs,
            "iat": now,
        }),
        PROVIDER_SECRET,
    )
}
