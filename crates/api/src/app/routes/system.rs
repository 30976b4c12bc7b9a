//! Diagnostic JSON endpoints.

use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use stockbook_inventory::ItemForm;

use crate::app::errors::{item_error_status, json_error};
use crate::app::services::AppServices;

pub async fn test() -> impl IntoResponse {
    Json(json!({ "message": "Test endpoint working!" }))
}

/// Insert a fixed sample item through the normal create path, then list.
pub async fn db_test(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let mut sample = ItemForm::new("Test Item", "99.99", "00:11:22:33:44:55", "TEST123", "Test Corp");
    sample.description = Some("Test Description".to_string());

    if let Err(e) = services.items.create(&sample).await {
        return json_error(item_error_status(&e), e.messages().join(" "));
    }

    let listing = services.items.list().await;
    if let Some(error) = listing.error {
        return json_error(StatusCode::INTERNAL_SERVER_ERROR, error);
    }

    Json(json!({
        "status": "success",
        "message": "Database connection working",
        "items": listing.items,
    }))
    .into_response()
}

pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    match services.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "database": "connected" })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "database": "disconnected" })),
            )
        }
    }
}

/// Runtime configuration with secrets masked.
pub async fn debug(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let info = services.config.debug_info();
    Json(json!({
        "database_url": info.database_url,
        "debug": info.debug,
        "env": info.env,
        "store": services.store().backend(),
    }))
}
