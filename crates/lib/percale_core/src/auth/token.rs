//! Session token issue and verification.
//!
//! Tokens are HS256-signed, self-contained claim sets; nothing is persisted
//! server-side. Rotating the signing secret invalidates every outstanding
//! session at once.

use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::AuthError;
use crate::models::user::{Role, User};

/// Session token lifetime: 1 day.
pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// The one canonical claim set embedded in session tokens.
///
/// Produced only by [`issue_session_token`]; every consumer sees exactly this
/// shape, with the user id under `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id.
    pub id: Uuid,
    /// User email at issuance time (may go stale against the datastore).
    pub email: String,
    /// Role at issuance time; a role change takes effect on reissue.
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

/// Issue a signed session token (HS256) for `user`.
pub fn issue_session_token(
    user: &User,
    ttl_secs: i64,
    secret: &[u8],
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = SessionClaims {
        id: user.id,
        email: user.email.clone(),
        role: user.role,
        name: user.name.clone(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::Token(format!("session token encode: {e}")))
}

/// Verify a session token, returning the claims on success.
///
/// Every failure — bad signature, malformed token, expired — collapses to
/// `None`. Expiry is checked with zero leeway: the token is invalid the
/// moment `exp` passes.
pub fn verify_session_token(token: &str, secret: &[u8]) -> Option<SessionClaims> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.leeway = 0;
    decode::<SessionClaims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims)
}

/// Resolve the session signing secret: env `SESSION_SECRET` → `AUTH_SECRET`
/// → persisted file.
pub fn resolve_session_secret() -> String {
    if let Ok(secret) = std::env::var("SESSION_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    if let Ok(secret) = std::env::var("AUTH_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    load_or_generate_secret(&session_secret_path())
}

/// Read the persisted secret, generating and persisting one if absent.
fn load_or_generate_secret(path: &Path) -> String {
    if let Ok(existing) = std::fs::read_to_string(path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(path, &secret);
    info!(path = %path.display(), "generated new session secret");
    secret
}

/// Path to the persisted session secret file.
fn session_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("percale")
        .join("session-secret")
}
