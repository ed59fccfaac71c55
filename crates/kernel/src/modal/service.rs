//! Modal content service.
//!
//! Orchestrates the store, the render pipeline and the style capturer for
//! the REST handlers:
//! - item content with captured block styles
//! - iframe markup for external URLs
//! - link search for the editor

use std::sync::Arc;

use chrono::DateTime;
use serde::Serialize;
use tracing::{debug, warn};

use crate::content::BlockPipeline;
use crate::content::html::{decode_entities, escape_attr, strip_tags};
use crate::error::{AppError, AppResult};
use crate::models::{ContentItem, ContentStore, SearchQuery};

use super::style_capture::{RenderedContent, StyleCapturer, extract_css};
use super::url_policy::UrlPolicy;

/// Number of words kept in a search excerpt.
const EXCERPT_WORDS: usize = 20;

/// Content of a published item, ready for the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalContent {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Block-support CSS without the surrounding style element.
    pub styles: String,
    #[serde(rename = "type")]
    pub item_type: String,
}

/// One search result in the shape the link picker expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub subtype: String,
    pub kind: &'static str,
    /// RFC 3339 creation date.
    pub date: String,
    pub excerpt: String,
}

/// A page of search hits plus totals for pagination headers.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub hits: Vec<SearchHit>,
    pub total: u64,
    pub total_pages: u64,
}

/// Service behind the modal link endpoints.
pub struct ModalService {
    store: Arc<dyn ContentStore>,
    pipeline: Arc<BlockPipeline>,
    capturer: StyleCapturer,
    url_policy: UrlPolicy,
    site_url: String,
}

impl ModalService {
    pub fn new(
        store: Arc<dyn ContentStore>,
        pipeline: Arc<BlockPipeline>,
        capturer: StyleCapturer,
        url_policy: UrlPolicy,
        site_url: &str,
    ) -> Self {
        Self {
            store,
            pipeline,
            capturer,
            url_policy,
            site_url: site_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    pub fn pipeline(&self) -> &BlockPipeline {
        &self.pipeline
    }

    pub fn url_policy(&self) -> &UrlPolicy {
        &self.url_policy
    }

    /// Permalink of an item.
    pub fn permalink(&self, id: i64) -> String {
        format!("{}/item/{id}", self.site_url)
    }

    /// Load a published item, or fail with the post-not-found error.
    pub async fn published_item(&self, id: i64) -> AppResult<ContentItem> {
        match self.store.find(id).await? {
            Some(item) if item.is_published() => Ok(item),
            Some(item) => {
                debug!(item_id = id, status = %item.status, "item is not published");
                Err(AppError::post_not_found())
            }
            None => {
                debug!(item_id = id, "item not found");
                Err(AppError::post_not_found())
            }
        }
    }

    /// Render a published item with its block-support styles captured.
    pub async fn render_item(&self, id: i64) -> AppResult<(ContentItem, RenderedContent)> {
        let item = self.published_item(id).await?;
        let rendered = self.capturer.render_with_styles(&self.pipeline, &item);
        Ok((item, rendered))
    }

    /// Content of a published item for the overlay.
    pub async fn modal_content(&self, id: i64) -> AppResult<ModalContent> {
        let (item, rendered) = self.render_item(id).await?;
        Ok(ModalContent {
            id: item.id,
            title: item.title,
            content: rendered.content,
            styles: extract_css(&rendered.styles),
            item_type: item.item_type,
        })
    }

    /// Iframe markup for an external URL, wrapped with a loading indicator.
    pub fn url_content(&self, url: &str) -> AppResult<String> {
        if !self.url_policy.validate(url) {
            warn!(url = %url, "invalid modal URL");
            return Err(AppError::BadRequest("Invalid URL provided.".to_string()));
        }

        let src = escape_attr(url.trim());
        let iframe = format!(
            r#"<iframe src="{src}" style="width: 100%; height: 80vh; border: none;" title="External content"></iframe>"#
        );
        let loading = format!(
            r#"<div class="modal-loading-wrapper"><div class="modal-loading-indicator" aria-hidden="true">Loading content...</div>{iframe}</div>"#
        );
        Ok(format!(
            r#"<div class="modal-content-wrapper modal-content-type-url" data-content-id="{src}">{loading}</div>"#
        ))
    }

    /// Search published items.
    pub async fn search(&self, text: &str, page: u32, per_page: u32) -> AppResult<SearchResults> {
        let query = SearchQuery {
            text: text.trim().to_string(),
            page: page.max(1),
            per_page: per_page.max(1),
        };
        let page = self.store.search(&query).await?;
        let total_pages = page.total_pages(query.per_page);

        let hits = page
            .items
            .into_iter()
            .map(|item| self.search_hit(item))
            .collect();

        Ok(SearchResults {
            hits,
            total: page.total,
            total_pages,
        })
    }

    fn search_hit(&self, item: ContentItem) -> SearchHit {
        let date = DateTime::from_timestamp(item.created, 0)
            .map(|d| d.to_rfc3339())
            .unwrap_or_default();
        let source = match item.excerpt.as_deref() {
            Some(excerpt) if !excerpt.trim().is_empty() => excerpt.to_string(),
            _ => item.body.clone(),
        };

        SearchHit {
            id: item.id,
            title: decode_entities(&item.title),
            url: self.permalink(item.id),
            subtype: item.item_type.clone(),
            item_type: item.item_type,
            kind: "post-type",
            date,
            excerpt: trim_words(&strip_tags(&source), EXCERPT_WORDS),
        }
    }
}

/// Keep the first `count` words, appending `…` when text was cut.
pub fn trim_words(text: &str, count: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= count {
        return words.join(" ");
    }
    format!("{}…", words[..count].join(" "))
}
