//! Forgot-password and reset-password handlers.

use axum::Json;
use axum::extract::State;
use tracing::info;

use percale_core::auth::reset::{generate_reset_token, reset_token_expiry};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::{ForgotPasswordRequest, ResetPasswordRequest, SuccessResponse};

/// `POST /forgot-password` — issue a reset link if the account exists.
///
/// Responds `{"success":true}` whether or not the email is registered, so
/// the endpoint cannot be used to probe for accounts. Mail transport
/// failures still surface as 500s.
pub async fn forgot_password_handler(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    if body.email.is_empty() {
        return Err(ApiError::Validation("Email is required".into()));
    }

    let Some(user) = state.store.find_by_email(&body.email).await? else {
        info!("password reset requested for unknown email");
        return Ok(Json(SuccessResponse { success: true }));
    };

    let token = generate_reset_token();
    state
        .store
        .set_reset_token(user.id, &token, reset_token_expiry())
        .await?;

    let reset_url = format!(
        "{}/reset-password?token={token}",
        state.config.public_base_url
    );
    state.mailer.send_password_reset(&user.email, &reset_url).await?;
    info!(user_id = %user.id, "password reset link sent");

    Ok(Json(SuccessResponse { success: true }))
}

/// `POST /reset-password` — redeem a reset token for a new password.
///
/// Redemption is atomic in the store: the token is consumed in the same
/// write that sets the new hash, so a link can be used exactly once.
pub async fn reset_password_handler(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    if body.token.is_empty() || body.password.is_empty() {
        return Err(ApiError::Validation(
            "Token and new password are required".into(),
        ));
    }

    let new_hash = super::hash_password(body.password).await?;
    let user = state
        .store
        .redeem_reset_token(&body.token, &new_hash)
        .await?
        .ok_or_else(|| ApiError::Validation("Invalid or expired reset token".into()))?;
    info!(user_id = %user.id, "password reset");

    Ok(Json(SuccessResponse { success: true }))
}
