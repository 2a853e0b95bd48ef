//! Domain models.
//!
//! These are internal domain models, distinct from the API's wire shapes.

pub mod user;
