//! In-memory [`UserStore`] used by tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{StoreError, StoreResult, UserStore};
use crate::models::user::{NewUser, User};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new_user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            name: new_user.name,
            phone: None,
            image: new_user.image,
            password_hash: new_user.password_hash,
            role: new_user.role,
            reset_token: None,
            reset_token_expires_at: None,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.read().unwrap();
        Ok(users.get(&id).cloned())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        phone: Option<&str>,
    ) -> StoreResult<User> {
        let mut users = self.users.write().unwrap();
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.name = Some(name.to_string());
        if let Some(phone) = phone {
            user.phone = Some(phone.to_string());
        }
        Ok(user.clone())
    }

    async fn set_password(&self, id: Uuid, password_hash: &str) -> StoreResult<()> {
        let mut users = self.users.write().unwrap();
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.password_hash = Some(password_hash.to_string());
        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut users = self.users.write().unwrap();
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.reset_token = Some(token.to_string());
        user.reset_token_expires_at = Some(expires_at);
        Ok(())
    }

    async fn redeem_reset_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> StoreResult<Option<User>> {
        let mut users = self.users.write().unwrap();
        let user = users.values_mut().find(|u| {
            u.reset_token.as_deref() == Some(token)
                && u.reset_token_expires_at.is_some_and(|at| at > Utc::now())
        });
        let Some(user) = user else {
            return Ok(None);
        };
        user.password_hash = Some(password_hash.to_string());
        user.reset_token = None;
        user.reset_token_expires_at = None;
        Ok(Some(user.clone()))
    }
}
