//! Request handlers.

pub mod health;
pub mod tweets;
pub mod videos;
