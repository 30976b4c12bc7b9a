use axum::{routing::get, Router};

pub mod items;
pub mod system;

/// Every page and diagnostic endpoint. Expects `Extension<Arc<AppServices>>`.
pub fn router() -> Router {
    Router::new()
        .route("/", get(items::list))
        .route("/add", get(items::add_form).post(items::create))
        .route("/edit/:id", get(items::edit_form).post(items::update))
        .route("/delete/:id", get(items::delete))
        .route("/test", get(system::test))
        .route("/db-test", get(system::db_test))
        .route("/health", get(system::health))
        .route("/debug", get(system::debug))
}
