//! Inventory pages: list, add, edit and delete.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use stockbook_core::ItemId;
use stockbook_infra::ItemError;
use stockbook_inventory::ItemForm;

use crate::app::dto::{ListQuery, Notice};
use crate::app::errors::item_error_status;
use crate::app::services::AppServices;
use crate::app::views;

const LOAD_FAILURE: &str = "Could not load the item. Please try again later.";

fn redirect(notice: Notice) -> Response {
    Redirect::to(&notice.redirect_target()).into_response()
}

/// Ids that do not parse are treated like ids that do not exist.
fn parse_id(raw: &str) -> Option<ItemId> {
    raw.parse().ok()
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ListQuery>,
) -> Html<String> {
    let listing = services.items.list().await;
    Html(views::list_page(&listing.items, query.notice(), listing.error))
}

pub async fn add_form() -> Html<String> {
    Html(views::form_page(None, &ItemForm::default(), &[]))
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<ItemForm>,
) -> Response {
    match services.items.create(&form).await {
        Ok(_) => redirect(Notice::Created),
        Err(e) => rerender(None, &form, &e),
    }
}

pub async fn edit_form(
    Extension(services): Extension<Arc<AppServices>>,
    Path(raw_id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&raw_id) else {
        return redirect(Notice::NotFound);
    };

    match services.items.get(id).await {
        Ok(item) => Html(views::form_page(Some(id), &ItemForm::from_item(&item), &[])).into_response(),
        Err(ItemError::NotFound(_)) => redirect(Notice::NotFound),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(views::error_page(LOAD_FAILURE)),
        )
            .into_response(),
    }
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Path(raw_id): Path<String>,
    Form(form): Form<ItemForm>,
) -> Response {
    let Some(id) = parse_id(&raw_id) else {
        return redirect(Notice::NotFound);
    };

    match services.items.update(id, &form).await {
        Ok(_) => redirect(Notice::Updated),
        Err(ItemError::NotFound(_)) => redirect(Notice::NotFound),
        Err(e) => rerender(Some(id), &form, &e),
    }
}

pub async fn delete(
    Extension(services): Extension<Arc<AppServices>>,
    Path(raw_id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&raw_id) else {
        return redirect(Notice::NotFound);
    };

    match services.items.delete(id).await {
        Ok(()) => redirect(Notice::Deleted),
        Err(ItemError::NotFound(_)) => redirect(Notice::NotFound),
        Err(e) => (
            item_error_status(&e),
            Html(views::error_page(&e.messages().join(" "))),
        )
            .into_response(),
    }
}

/// Failed submission: show the form again with what the user typed.
fn rerender(id: Option<ItemId>, form: &ItemForm, err: &ItemError) -> Response {
    (
        item_error_status(err),
        Html(views::form_page(id, form, &err.messages())),
    )
        .into_response()
}
