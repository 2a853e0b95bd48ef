//! User persistence.
//!
//! [`UserStore`] is the only surface the API layer talks to. The Postgres
//! implementation backs production; the in-memory one backs tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::user::{NewUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The email column's unique constraint fired.
    #[error("email already registered")]
    DuplicateEmail,
    #[error("user not found")]
    NotFound,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account. Fails with [`StoreError::DuplicateEmail`] if
    /// the email is taken.
    async fn create(&self, new_user: NewUser) -> StoreResult<User>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Update the profile fields a user may edit. A `None` phone leaves the
    /// stored value untouched.
    async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        phone: Option<&str>,
    ) -> StoreResult<User>;

    async fn set_password(&self, id: Uuid, password_hash: &str) -> StoreResult<()>;

    async fn set_reset_token(
        &self,
        id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()>;

    /// Atomically consume an unexpired reset token: set the new password
    /// hash, clear the token fields and return the updated user. `None`
    /// means the token matched no row or had expired; a second redemption
    /// of the same token always lands here.
    async fn redeem_reset_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> StoreResult<Option<User>>;
}
