//! Signup, login, social login and logout handlers.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::CookieJar;
use tracing::info;

use percale_core::auth::token::{SESSION_TTL_SECS, issue_session_token};
use percale_core::models::user::{NewUser, Role};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    LoginRequest, SignupRequest, SocialLoginRequest, SuccessResponse, SuccessUserResponse,
    UserBody, UserEnvelope,
};
use crate::session::{clear_session_cookie, session_cookie};

/// Message for every login failure; never reveals which factor failed.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// `POST /signup` — create an account and open a session.
pub async fn signup_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SignupRequest>,
) -> ApiResult<(CookieJar, Json<UserEnvelope>)> {
    if body.name.is_empty() || body.email.is_empty() || body.password.is_empty() {
        return Err(ApiError::Validation(
            "Name, email and password are required".into(),
        ));
    }

    let password_hash = super::hash_password(body.password).await?;
    let user = state
        .store
        .create(NewUser {
            email: body.email,
            name: Some(body.name),
            image: None,
            password_hash: Some(password_hash),
            role: Role::Customer,
        })
        .await?;

    let token = issue_session_token(
        &user,
        SESSION_TTL_SECS,
        state.config.session_secret.as_bytes(),
    )?;
    info!(user_id = %user.id, "account created");

    let jar = jar.add(session_cookie(&token, state.config.cookie_secure));
    Ok((
        jar,
        Json(UserEnvelope {
            user: UserBody::from(&user),
        }),
    ))
}

/// `POST /login` — authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<UserEnvelope>)> {
    if body.email.is_empty() || body.password.is_empty() {
        return Err(ApiError::Validation("Email and password are required".into()));
    }

    // Unknown email, passwordless account and wrong password all fail the
    // same way so the endpoint cannot be used to probe for accounts.
    let user = state
        .store
        .find_by_email(&body.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.into()))?;
    let Some(digest) = user.password_hash.clone() else {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    };
    if !super::verify_password(body.password, digest).await? {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let token = issue_session_token(
        &user,
        SESSION_TTL_SECS,
        state.config.session_secret.as_bytes(),
    )?;
    info!(user_id = %user.id, "login");

    let jar = jar.add(session_cookie(&token, state.config.cookie_secure));
    Ok((
        jar,
        Json(UserEnvelope {
            user: UserBody::from(&user),
        }),
    ))
}

/// `POST /social-login` — exchange a verified provider assertion for a
/// session, creating the account on first sight.
pub async fn social_login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SocialLoginRequest>,
) -> ApiResult<(CookieJar, Json<SuccessUserResponse>)> {
    if body.assertion.is_empty() {
        return Err(ApiError::Validation("Identity assertion is required".into()));
    }

    let identity = state
        .verifier
        .verify(&body.assertion)
        .await
        .ok_or_else(|| ApiError::Unauthorized("Invalid identity assertion".into()))?;
    let email = identity
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::Validation("Assertion carries no email claim".into()))?;

    let user = match state.store.find_by_email(&email).await? {
        Some(user) => user,
        None => {
            let user = state
                .store
                .create(NewUser {
                    email,
                    name: identity.name,
                    image: identity.picture,
                    password_hash: None,
                    role: Role::Customer,
                })
                .await?;
            info!(user_id = %user.id, "account created via social login");
            user
        }
    };

    let token = issue_session_token(
        &user,
        SESSION_TTL_SECS,
        state.config.session_secret.as_bytes(),
    )?;
    let jar = jar.add(session_cookie(&token, state.config.cookie_secure));
    Ok((
        jar,
        Json(SuccessUserResponse {
            success: true,
            user: UserBody::from(&user),
        }),
    ))
}

/// `POST /logout` — drop the client's session cookie. The token itself
/// stays valid until expiry; there is no server-side revocation.
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    let jar = jar.add(clear_session_cookie(state.config.cookie_secure));
    (jar, Json(SuccessResponse { success: true }))
}
