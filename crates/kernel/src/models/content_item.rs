//! Content item model and storage backends.
//!
//! Content items are the posts and pages a modal link can point at. The
//! kernel only reads them: lookups by id for modal content and full-text
//! search for the editor's link picker. Two backends implement
//! [`ContentStore`]: PostgreSQL for deployments and an in-memory map for
//! development and tests.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Publication status of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Publish,
    #[default]
    Draft,
    Pending,
    Private,
    Future,
}

impl ContentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Private => "private",
            Self::Future => "future",
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "publish" => Ok(Self::Publish),
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "private" => Ok(Self::Private),
            "future" => Ok(Self::Future),
            other => bail!("unknown content status '{other}'"),
        }
    }
}

/// A post, page or other publishable unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    /// Numeric identifier.
    pub id: i64,

    /// Content kind (`post`, `page`, ...).
    #[serde(rename = "type", default = "default_item_type")]
    pub item_type: String,

    pub title: String,

    /// Serialized block markup.
    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub excerpt: Option<String>,

    #[serde(default)]
    pub status: ContentStatus,

    /// Unix timestamp when created.
    #[serde(default)]
    pub created: i64,
}

fn default_item_type() -> String {
    "post".to_string()
}

impl ContentItem {
    /// Only published items may be shown to anonymous visitors.
    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Publish
    }
}

/// Search parameters, already sanitized by the caller.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    /// 1-indexed page number.
    pub page: u32,
    pub per_page: u32,
}

impl SearchQuery {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub items: Vec<ContentItem>,
    /// Total number of matches across all pages.
    pub total: u64,
}

impl SearchPage {
    pub fn total_pages(&self, per_page: u32) -> u64 {
        if per_page == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(per_page))
    }
}

/// Read access to stored content.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Find an item by id, regardless of status.
    async fn find(&self, id: i64) -> Result<Option<ContentItem>>;

    /// Search published items, ordered by relevance then newest first.
    async fn search(&self, query: &SearchQuery) -> Result<SearchPage>;

    /// Whether the backend is reachable.
    async fn healthy(&self) -> bool;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct ContentRow {
    id: i64,
    #[sqlx(rename = "type")]
    item_type: String,
    title: String,
    body: String,
    excerpt: Option<String>,
    status: String,
    created: i64,
}

impl From<ContentRow> for ContentItem {
    fn from(row: ContentRow) -> Self {
        // Unknown statuses are never treated as public.
        let status = row.status.parse().unwrap_or(ContentStatus::Draft);
        Self {
            id: row.id,
            item_type: row.item_type,
            title: row.title,
            body: row.body,
            excerpt: row.excerpt,
            status,
            created: row.created,
        }
    }
}

/// PostgreSQL-backed content store.
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn find(&self, id: i64) -> Result<Option<ContentItem>> {
        let row = sqlx::query_as::<_, ContentRow>(
            "SELECT id, type, title, body, excerpt, status, created FROM content_item WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch content item by id")?;

        Ok(row.map(ContentItem::from))
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchPage> {
        let text = query.text.trim();
        if text.is_empty() {
            return Ok(SearchPage::default());
        }

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM content_item
            WHERE status = 'publish'
              AND search_vector @@ plainto_tsquery('english', $1)
            "#,
        )
        .bind(text)
        .fetch_one(&self.pool)
        .await
        .context("failed to count search results")?;

        let offset = i64::try_from(query.offset()).context("search offset out of range")?;

        let rows = sqlx::query_as::<_, ContentRow>(
            r#"
            SELECT id, type, title, body, excerpt, status, created
            FROM content_item
            WHERE status = 'publish'
              AND search_vector @@ plainto_tsquery('english', $1)
            ORDER BY ts_rank(search_vector, plainto_tsquery('english', $1)) DESC,
                     created DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(text)
        .bind(i64::from(query.per_page))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("failed to execute search query")?;

        Ok(SearchPage {
            items: rows.into_iter().map(ContentItem::from).collect(),
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn healthy(&self) -> bool {
        crate::db::check_health(&self.pool).await
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// In-memory content store keyed by id.
#[derive(Default)]
pub struct MemoryContentStore {
    items: RwLock<BTreeMap<i64, ContentItem>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a JSON array of content items.
    pub fn from_seed_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        let items: Vec<ContentItem> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse seed file {}", path.display()))?;

        let store = Self::new();
        for item in items {
            store.insert(item);
        }
        Ok(store)
    }

    /// Insert or replace an item.
    pub fn insert(&self, item: ContentItem) {
        self.items.write().insert(item.id, item);
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

/// Relevance of an item for the given lowercase terms, or `None` when some
/// term does not occur at all. Title hits weigh more than body hits.
fn relevance(item: &ContentItem, terms: &[String]) -> Option<usize> {
    let title = item.title.to_lowercase();
    let excerpt = item.excerpt.as_deref().unwrap_or_default().to_lowercase();
    let body = item.body.to_lowercase();

    let mut score = 0;
    for term in terms {
        let hits = title.matches(term.as_str()).count() * 3
            + excerpt.matches(term.as_str()).count() * 2
            + body.matches(term.as_str()).count();
        if hits == 0 {
            return None;
        }
        score += hits;
    }
    Some(score)
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn find(&self, id: i64) -> Result<Option<ContentItem>> {
        Ok(self.items.read().get(&id).cloned())
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchPage> {
        let terms: Vec<String> = query
            .text
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        if terms.is_empty() {
            return Ok(SearchPage::default());
        }

        let mut matches: Vec<(usize, ContentItem)> = self
            .items
            .read()
            .values()
            .filter(|item| item.is_published())
            .filter_map(|item| relevance(item, &terms).map(|score| (score, item.clone())))
            .collect();

        matches.sort_by(|(a_score, a), (b_score, b)| {
            b_score
                .cmp(a_score)
                .then(b.created.cmp(&a.created))
                .then(b.id.cmp(&a.id))
        });

        let total = matches.len() as u64;
        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let items = matches
            .into_iter()
            .skip(offset)
            .take(query.per_page as usize)
            .map(|(_, item)| item)
            .collect();

        Ok(SearchPage { items, total })
    }

    async fn healthy(&self) -> bool {
        true
    }
}
