//! Authentication primitives.
//!
//! Provides password hashing, session-token issue/verify, reset-token
//! generation, and upstream identity-assertion verification. Nothing in here
//! touches the datastore; the flows in `percale_api` compose these with the
//! store and mailer seams.

pub mod assertion;
pub mod password;
pub mod reset;
pub mod token;

use thiserror::Error;

/// Authentication errors.
///
/// Verification paths never produce these — a token or password that fails to
/// verify is a `None`/`false`, not an error.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token error: {0}")]
    Token(String),

    #[error("internal error: {0}")]
    Internal(String),
}
