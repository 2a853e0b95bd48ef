//! Session accessor — the one place the session token is written to and
//! read from the `token` cookie.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use percale_core::auth::token::{SESSION_TTL_SECS, SessionClaims, verify_session_token};

use crate::AppState;
use crate::error::ApiError;

/// Cookie name for the session token.
pub const SESSION_COOKIE: &str = "token";

/// Build the httpOnly session cookie. `Max-Age` matches the token TTL.
pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE.to_string(), token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::seconds(SESSION_TTL_SECS))
        .build()
}

/// Build an expired cookie that clears the session. The token itself stays
/// valid until its expiry; only the client's copy is dropped.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE.to_string(), String::new()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::ZERO)
        .build()
}

/// Read and verify the session token from a cookie jar. Any failure is an
/// absent session.
pub fn session_from_jar(jar: &CookieJar, secret: &[u8]) -> Option<SessionClaims> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| verify_session_token(cookie.value(), secret))
}

/// Extractor for handlers that require an authenticated session.
pub struct Session(pub SessionClaims);

impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        session_from_jar(&jar, state.config.session_secret.as_bytes())
            .map(Session)
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".into()))
    }
}

/// Extractor for handlers that behave differently with and without a
/// session but reject neither.
pub struct MaybeSession(pub Option<SessionClaims>);

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(MaybeSession(session_from_jar(
            &jar,
            state.config.session_secret.as_bytes(),
        )))
    }
}
