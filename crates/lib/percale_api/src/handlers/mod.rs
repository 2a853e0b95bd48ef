//! Request handlers.

pub mod account;
pub mod auth;
pub mod health;
pub mod password_reset;

use crate::error::{ApiError, ApiResult};

/// Hash a password with bcrypt on the blocking thread pool.
pub(crate) async fn hash_password(password: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || percale_core::auth::password::hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("hash task: {e}")))?
        .map_err(ApiError::from)
}

/// Verify a password against a digest on the blocking thread pool.
pub(crate) async fn verify_password(password: String, digest: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || {
        percale_core::auth::password::verify_password(&password, &digest)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("verify task: {e}")))
}
