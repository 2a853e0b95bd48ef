//! Request-intercepting middleware.

pub mod gate;
