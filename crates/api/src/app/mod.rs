//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and the item service shared by handlers
//! - `routes/`: HTTP routes + handlers
//! - `views.rs`: server-rendered HTML
//! - `dto.rs`: query parameters and flash notices
//! - `errors.rs`: status mapping and JSON error bodies

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::config::Config;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;
pub mod views;

/// Router over already-built services (tests inject their own store here).
pub fn build_router(services: Arc<AppServices>) -> Router {
    routes::router().layer(Extension(services)).layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::log_requests))
            .layer(axum::middleware::from_fn(middleware::catch_panic)),
    )
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: Config) -> anyhow::Result<Router> {
    let services = services::build_services(config).await?;
    Ok(build_router(Arc::new(services)))
}

pub use services::AppServices;
