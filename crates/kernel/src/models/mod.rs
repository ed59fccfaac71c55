//! Database models.

pub mod content_item;

pub use content_item::{
    ContentItem, ContentStatus, ContentStore, MemoryContentStore, PgContentStore, SearchPage,
    SearchQuery,
};
