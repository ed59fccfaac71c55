//! Block render pipeline.
//!
//! Renders a parsed block tree to HTML, depth first, and passes every
//! rendered block through registered filters:
//! - global filters run for every block, including freeform HTML
//! - block filters run only for blocks with a matching name
//!
//! Filters run in registration order. A filter may be installed for the
//! duration of a single render with [`BlockPipeline::intercept`]; the
//! returned guard removes it again when dropped.

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::Mutex;

use super::block_parser::ParsedBlock;
use super::styles::CapturedStyleSet;

/// Information about the item being rendered, visible to every filter.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub item_id: Option<i64>,
    pub item_type: Option<String>,
    /// Where block-support CSS goes, when the caller collects it.
    styles: Option<Arc<Mutex<CapturedStyleSet>>>,
}

impl RenderContext {
    pub fn for_item(item_id: i64, item_type: &str) -> Self {
        Self {
            item_id: Some(item_id),
            item_type: Some(item_type.to_string()),
            styles: None,
        }
    }

    /// Collect CSS added by filters into `styles`.
    pub fn with_styles(mut self, styles: Arc<Mutex<CapturedStyleSet>>) -> Self {
        self.styles = Some(styles);
        self
    }

    /// Record a CSS fragment for the current render. Ignored when nothing
    /// collects styles.
    pub fn add_style(&self, css: impl Into<String>) {
        if let Some(styles) = &self.styles {
            styles.lock().push(css);
        }
    }
}

/// A filter applied to the HTML of one rendered block.
pub trait RenderFilter: Send + Sync {
    /// Filter name for debugging.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Transform the rendered HTML of `block`.
    ///
    /// Filters that make no change should return `html` as-is.
    fn render(&self, html: String, block: &ParsedBlock, ctx: &RenderContext) -> String;
}

impl<F> RenderFilter for F
where
    F: Fn(String, &ParsedBlock, &RenderContext) -> String + Send + Sync,
{
    fn render(&self, html: String, block: &ParsedBlock, ctx: &RenderContext) -> String {
        self(html, block, ctx)
    }
}

/// Handle identifying a registered filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterId(u64);

#[derive(Clone)]
struct Registered {
    id: FilterId,
    filter: Arc<dyn RenderFilter>,
}

/// Ordered render filters, global and per block name.
///
/// Cloning is cheap: filters are shared. Requests that need to install a
/// temporary filter clone the application pipeline first.
#[derive(Clone, Default)]
pub struct BlockPipeline {
    global: Vec<Registered>,
    by_block: HashMap<String, Vec<Registered>>,
    next_id: u64,
}

impl fmt::Debug for BlockPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |filters: &[Registered]| -> Vec<String> {
            filters.iter().map(|r| r.filter.name().to_string()).collect()
        };
        let mut by_block: Vec<(&String, Vec<String>)> = self
            .by_block
            .iter()
            .map(|(block, filters)| (block, names(filters)))
            .collect();
        by_block.sort();
        f.debug_struct("BlockPipeline")
            .field("global", &names(&self.global))
            .field("by_block", &by_block)
            .finish()
    }
}

impl BlockPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, filter: Arc<dyn RenderFilter>) -> Registered {
        let id = FilterId(self.next_id);
        self.next_id += 1;
        Registered { id, filter }
    }

    /// Add a filter that runs for every block.
    pub fn add_global(&mut self, filter: Arc<dyn RenderFilter>) -> FilterId {
        let registered = self.register(filter);
        let id = registered.id;
        self.global.push(registered);
        id
    }

    /// Add a filter that runs only for blocks named `block_name`.
    pub fn add_for_block(&mut self, block_name: &str, filter: Arc<dyn RenderFilter>) -> FilterId {
        let registered = self.register(filter);
        let id = registered.id;
        self.by_block
            .entry(block_name.to_string())
            .or_default()
            .push(registered);
        id
    }

    /// Remove a filter. Returns false when it was not registered.
    pub fn remove(&mut self, id: FilterId) -> bool {
        let before = self.len();
        self.global.retain(|r| r.id != id);
        for filters in self.by_block.values_mut() {
            filters.retain(|r| r.id != id);
        }
        self.by_block.retain(|_, filters| !filters.is_empty());
        self.len() != before
    }

    /// Total number of registered filters.
    pub fn len(&self) -> usize {
        self.global.len() + self.by_block.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Block names that have at least one block filter.
    pub fn filtered_blocks(&self) -> impl Iterator<Item = &str> {
        self.by_block.keys().map(String::as_str)
    }

    /// Install a global filter until the returned guard is dropped.
    pub fn intercept(&mut self, filter: Arc<dyn RenderFilter>) -> Interception<'_> {
        let id = self.add_global(filter);
        tracing::trace!(filter = ?id, "render interception installed");
        Interception { pipeline: self, id }
    }

    /// Render a sequence of top-level blocks.
    pub fn render(&self, blocks: &[ParsedBlock], ctx: &RenderContext) -> String {
        blocks
            .iter()
            .map(|block| self.render_block(block, ctx))
            .collect()
    }

    /// Render one block and its inner blocks, then apply filters.
    pub fn render_block(&self, block: &ParsedBlock, ctx: &RenderContext) -> String {
        let mut html = String::with_capacity(block.inner_html.len());
        let mut inner = block.inner_blocks.iter();

        for chunk in &block.inner_content {
            match chunk {
                Some(text) => html.push_str(text),
                None => {
                    if let Some(child) = inner.next() {
                        html.push_str(&self.render_block(child, ctx));
                    }
                }
            }
        }

        for registered in &self.global {
            html = registered.filter.render(html, block, ctx);
        }

        if let Some(filters) = block.name.as_ref().and_then(|n| self.by_block.get(n)) {
            for registered in filters {
                html = registered.filter.render(html, block, ctx);
            }
        }

        html
    }
}

/// A temporary filter on a pipeline, removed when dropped.
///
/// Dereferences to the pipeline so it can be rendered while the filter is
/// installed.
pub struct Interception<'a> {
    pipeline: &'a mut BlockPipeline,
    id: FilterId,
}

impl Deref for Interception<'_> {
    type Target = BlockPipeline;

    fn deref(&self) -> &BlockPipeline {
        self.pipeline
    }
}

impl Drop for Interception<'_> {
    fn drop(&mut self) {
        self.pipeline.remove(self.id);
        tracing::trace!(filter = ?self.id, "render interception removed");
    }
}
