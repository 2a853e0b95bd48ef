//! Password reset tokens.
//!
//! Opaque random strings stored against the user row, never derived from
//! user data. Single-use redemption is enforced by the store, not here.

use chrono::{DateTime, Duration, Utc};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};

/// Length of a generated reset token.
pub const RESET_TOKEN_LEN: usize = 64;

/// Reset token lifetime: 1 hour.
pub const RESET_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Generate a fresh URL-safe reset token.
pub fn generate_reset_token() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Expiry timestamp for a token generated now.
pub fn reset_token_expiry() -> DateTime<Utc> {
    Utc::now() + Duration::seconds(RESET_TOKEN_TTL_SECS)
}
