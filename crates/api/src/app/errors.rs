use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockbook_infra::ItemError;

/// HTTP status used when an item form is re-rendered after a failure.
pub fn item_error_status(err: &ItemError) -> StatusCode {
    match err {
        ItemError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ItemError::Conflict(_) => StatusCode::CONFLICT,
        ItemError::NotFound(_) => StatusCode::NOT_FOUND,
        ItemError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON body for the diagnostic endpoints.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "status": "error",
            "message": message.into(),
        })),
    )
        .into_response()
}
