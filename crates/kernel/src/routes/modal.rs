//! Modal link REST endpoints.
//!
//! All routes live under [`API_PREFIX`]:
//! - `GET /search`: editor link search with pagination headers
//! - `GET /modal-content/{id}`: rendered item content and captured styles
//! - `GET /modal-url?url=`: iframe markup for an external URL
//! - `GET /supported-blocks`: block names that accept modal links

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;

use crate::content::html::strip_tags;
use crate::error::{AppError, AppResult};
use crate::middleware::require_editor;
use crate::modal::{ModalContent, SupportedBlockSet};
use crate::state::AppState;

/// Path prefix of the modal link API.
pub const API_PREFIX: &str = "/api/modal-links/v1";

/// Default and maximum search page sizes.
const DEFAULT_PER_PAGE: u64 = 20;
const MAX_PER_PAGE: u64 = 100;

/// Create the modal link API router.
pub fn router(state: &AppState) -> Router<AppState> {
    let editor = Router::new()
        .route("/search", get(search))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_editor,
        ));

    let public = Router::new()
        .route("/modal-content/{id}", get(modal_content))
        .route("/modal-url", get(modal_url))
        .route("/supported-blocks", get(supported_blocks));

    Router::new().nest(API_PREFIX, editor.merge(public))
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
    pub per_page: Option<i64>,
    pub page: Option<i64>,
}

/// Collapse a search term to plain single-spaced text.
fn sanitize_search(raw: &str) -> String {
    strip_tags(raw)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Editor link search.
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Response> {
    let text = sanitize_search(params.search.as_deref().unwrap_or_default());
    if text.is_empty() {
        return Err(AppError::BadRequest(
            "Missing parameter(s): search".to_string(),
        ));
    }

    // Sizes are taken as absolute values, then clamped.
    let per_page = params
        .per_page
        .map_or(DEFAULT_PER_PAGE, i64::unsigned_abs)
        .clamp(1, MAX_PER_PAGE);
    let page = params
        .page
        .map_or(1, i64::unsigned_abs)
        .clamp(1, u64::from(u32::MAX));
    let per_page = u32::try_from(per_page).unwrap_or(MAX_PER_PAGE as u32);
    let page = u32::try_from(page).unwrap_or(u32::MAX);

    let results = state.modal().search(&text, page, per_page).await?;

    let mut headers = HeaderMap::new();
    headers.insert("x-total", HeaderValue::from(results.total));
    headers.insert("x-total-pages", HeaderValue::from(results.total_pages));

    let base = format!("{}{API_PREFIX}/search", state.config().site_url);
    if let Some(link) = link_header(&base, &text, per_page, page, results.total_pages) {
        let value = HeaderValue::from_str(&link)
            .map_err(|e| anyhow::anyhow!("invalid Link header: {e}"))?;
        headers.insert(header::LINK, value);
    }

    Ok((headers, Json(results.hits)).into_response())
}

/// RFC 5988 `Link` header with `prev`/`next` relations, when applicable.
fn link_header(base: &str, text: &str, per_page: u32, page: u32, total_pages: u64) -> Option<String> {
    let href = |target: u32| {
        format!(
            "<{base}?search={}&per_page={per_page}&page={target}>",
            urlencoding::encode(text)
        )
    };

    let mut links = Vec::new();
    if page > 1 {
        links.push(format!("{}; rel=\"prev\"", href(page - 1)));
    }
    if u64::from(page) < total_pages {
        links.push(format!("{}; rel=\"next\"", href(page + 1)));
    }

    (!links.is_empty()).then(|| links.join(", "))
}

/// Rendered content of a published item.
async fn modal_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ModalContent>> {
    let id: i64 = id
        .parse()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("Invalid parameter(s): id".to_string()))?;

    let content = state.modal().modal_content(id).await?;
    Ok(Json(content))
}

/// External URL query parameters.
#[derive(Debug, Deserialize)]
pub struct UrlParams {
    pub url: Option<String>,
}

/// Iframe markup for an external URL.
async fn modal_url(
    State(state): State<AppState>,
    Query(params): Query<UrlParams>,
) -> AppResult<Response> {
    let url = params.url.unwrap_or_default();
    let content = state.modal().url_content(&url)?;

    let cache_control = format!("public, max-age={}", state.config().cache_duration);
    let cache_control = HeaderValue::from_str(&cache_control)
        .map_err(|e| anyhow::anyhow!("invalid Cache-Control header: {e}"))?;

    Ok((
        [(header::CACHE_CONTROL, cache_control)],
        Json(json!({ "content": content })),
    )
        .into_response())
}

/// Block names that accept modal links.
async fn supported_blocks(State(state): State<AppState>) -> Json<SupportedBlockSet> {
    Json(state.supported_blocks().clone())
}
