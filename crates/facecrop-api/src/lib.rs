//! Axum HTTP API server.
//!
//! This crate provides:
//! - `POST /api` face bounding-box detection over base64 images
//! - Rate limiting and security headers
//! - Health, readiness and Prometheus metrics endpoints

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
