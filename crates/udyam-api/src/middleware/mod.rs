//! # Middleware Stack
//!
//! - [`metrics`]: Prometheus request and domain metrics.
//!
//! Request tracing uses `tower_http::trace::TraceLayer` directly and CORS
//! uses `tower_http::cors::CorsLayer`; both are wired in [`crate::app`].

pub mod metrics;
