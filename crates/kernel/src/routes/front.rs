//! Item page route handler.
//!
//! Renders a published item as a full page: block output through the render
//! pipeline, captured block-support styles in the head, and the single
//! overlay container the client script fills when a trigger is activated.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};

use crate::content::html::{escape_attr, escape_text};
use crate::error::AppError;
use crate::state::AppState;

use super::modal::API_PREFIX;

/// Create the item page router.
pub fn router() -> Router<AppState> {
    Router::new().route("/item/{id}", get(view_item))
}

/// The shared overlay container, rendered once per page.
fn overlay(api_url: &str) -> String {
    format!(
        concat!(
            r#"<div id="modal-links-overlay" class="modal-overlay" role="dialog" aria-modal="true" "#,
            r#"aria-hidden="true" data-api-url="{}" hidden>"#,
            r#"<div class="modal-content">"#,
            r#"<button type="button" class="modal-close" aria-label="Close modal"><span aria-hidden="true">&times;</span></button>"#,
            r#"<div class="modal-body"></div>"#,
            "</div></div>"
        ),
        escape_attr(api_url)
    )
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html("<!DOCTYPE html><html><body><h1>Not found</h1></body></html>".to_string()),
    )
        .into_response()
}

/// Item page handler.
async fn view_item(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Ok(id) = id.parse::<i64>() else {
        return not_found();
    };

    let (item, rendered) = match state.modal().render_item(id).await {
        Ok(result) => result,
        Err(AppError::NotFound { .. }) => return not_found(),
        Err(e) => return e.into_response(),
    };

    let api_url = format!(
        "{}{API_PREFIX}/modal-content/",
        state.config().site_url
    );

    let html = format!(
        concat!(
            "<!DOCTYPE html>\n",
            r#"<html lang="en"><head><meta charset="utf-8">"#,
            "<title>{title}</title>{styles}</head>",
            r#"<body><article class="entry type-{kind} post-{id}">"#,
            "<h1>{title}</h1>",
            r#"<div class="entry-content">{content}</div>"#,
            "</article>{overlay}</body></html>"
        ),
        title = escape_text(&item.title),
        styles = rendered.styles,
        kind = escape_attr(&item.item_type),
        id = item.id,
        content = rendered.content,
        overlay = overlay(&api_url),
    );

    Html(html).into_response()
}
