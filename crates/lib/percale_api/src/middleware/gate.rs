//! Session gate — role-aware protection for configured path prefixes.
//!
//! Failures redirect rather than render an error: missing or invalid
//! sessions go to the login page, valid-but-unprivileged sessions go back
//! to the landing page. Protected areas are never confirmed to exist to
//! callers who may not enter them.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use percale_core::models::user::Role;

use crate::AppState;
use crate::session::session_from_jar;

/// Where unauthenticated requests to protected paths are sent.
const LOGIN_PATH: &str = "/login";

/// Where authenticated-but-unprivileged requests to admin paths are sent.
const LANDING_PATH: &str = "/";

/// Axum middleware enforcing the gate rules on every request, including
/// paths with no registered route.
pub async fn session_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    let gate = &state.config.gate;

    if !gate
        .protected_prefixes
        .iter()
        .any(|prefix| matches_prefix(path, prefix))
    {
        return next.run(request).await;
    }

    let Some(claims) = session_from_jar(&jar, state.config.session_secret.as_bytes()) else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    if gate
        .admin_prefixes
        .iter()
        .any(|prefix| matches_prefix(path, prefix))
        && claims.role != Role::Admin
    {
        return Redirect::to(LANDING_PATH).into_response();
    }

    next.run(request).await
}

/// Segment-aware prefix match: `/admin` covers `/admin` and `/admin/x`,
/// never `/administrator`.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}
