//! Current-user handlers: profile read/update and password change.

use axum::Json;
use axum::extract::State;
use tracing::info;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    ChangePasswordRequest, CurrentUserResponse, MessageResponse, SuccessUserResponse,
    UpdateProfileRequest, UserBody,
};
use crate::session::{MaybeSession, Session};

/// `GET /me` — the current user, or `null` without a valid session.
///
/// The user is re-read from the store so the body reflects profile edits
/// made after the token was issued.
pub async fn current_user_handler(
    State(state): State<AppState>,
    MaybeSession(claims): MaybeSession,
) -> ApiResult<Json<CurrentUserResponse>> {
    let Some(claims) = claims else {
        return Ok(Json(CurrentUserResponse { user: None }));
    };
    let user = state.store.find_by_id(claims.id).await?;
    Ok(Json(CurrentUserResponse {
        user: user.as_ref().map(UserBody::from),
    }))
}

/// `PUT /me` — update name and phone.
pub async fn update_profile_handler(
    State(state): State<AppState>,
    Session(claims): Session,
    Json(body): Json<UpdateProfileRequest>,
) -> ApiResult<Json<SuccessUserResponse>> {
    if body.name.is_empty() {
        return Err(ApiError::Validation("Name is required".into()));
    }
    let user = state
        .store
        .update_profile(claims.id, &body.name, body.phone.as_deref())
        .await?;
    Ok(Json(SuccessUserResponse {
        success: true,
        user: UserBody::from(&user),
    }))
}

/// `POST /change-password` — verify the current password, set a new one.
pub async fn change_password_handler(
    State(state): State<AppState>,
    Session(claims): Session,
    Json(body): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    if body.current_password.is_empty() || body.new_password.is_empty() {
        return Err(ApiError::Validation(
            "Current and new password are required".into(),
        ));
    }

    let user = state
        .store
        .find_by_id(claims.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    // Accounts without a password (social login only) cannot pass the
    // current-password check.
    let verified = match user.password_hash {
        Some(digest) => super::verify_password(body.current_password, digest).await?,
        None => false,
    };
    if !verified {
        return Err(ApiError::Validation("Current password is incorrect".into()));
    }

    let new_hash = super::hash_password(body.new_password).await?;
    state.store.set_password(user.id, &new_hash).await?;
    info!(user_id = %user.id, "password changed");

    Ok(Json(MessageResponse {
        message: "Password updated",
    }))
}
