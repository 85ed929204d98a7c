//! Axum HTTP API server.
//!
//! This crate provides:
//! - Lifecycle orchestration for videos and tweets
//! - The uniform success/error response envelope
//! - Multipart upload staging for media files
//! - Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
pub mod upload;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use response::ApiResponse;
pub use routes::create_router;
pub use state::AppState;
