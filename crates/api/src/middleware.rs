use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use futures_util::FutureExt;

use crate::app::views;

const PANIC_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Turn a panicking handler into a generic 500 page instead of a dropped connection.
pub async fn catch_panic(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            tracing::error!(%method, path = %path, "handler panicked: {}", panic_message(payload.as_ref()));
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(views::error_page(PANIC_MESSAGE)),
            )
                .into_response()
        }
    }
}

/// One log line per request.
pub async fn log_requests(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );
    response
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
