//! # percale_core
//!
//! Core domain logic for Percale: password hashing, session tokens, reset
//! tokens, identity assertions, the user datastore seam, and the mail
//! dispatcher seam shared by `percale_api` and `percale_server`.

pub mod auth;
pub mod mail;
pub mod migrate;
pub mod models;
pub mod store;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
