//! HTTP route handlers.

pub mod health;
pub mod openapi;
pub mod refbooks;
