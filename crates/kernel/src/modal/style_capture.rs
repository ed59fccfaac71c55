//! Inline capture of block-support CSS.
//!
//! On a normal page, layout CSS generated while rendering container blocks
//! is collected into the page head. Content fetched for a modal has no such
//! page, so the CSS is captured during the render and returned next to the
//! HTML instead.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use regex::Regex;
use serde_json::Value;

use crate::content::block_types::BlockTypeRegistry;
use crate::content::html::add_root_classes;
use crate::content::layout::{
    Layout, LayoutStyleInput, SpacingValue, container_class, layout_classes, layout_styles,
};
use crate::content::{
    BlockPipeline, CapturedStyleSet, ParsedBlock, RenderContext, RenderFilter, parse_blocks,
};
use crate::models::ContentItem;

/// Contents of the first `<style>` element.
///
/// # Panics
///
/// Panics if the hard-coded regex literal is invalid (impossible in practice).
#[allow(clippy::expect_used)]
static STYLE_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<style[^>]*>(.*?)</style>").expect("valid regex literal")
});

/// The CSS inside a style element; empty when there is none.
pub fn extract_css(style_element: &str) -> String {
    STYLE_BODY
        .captures(style_element)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Render filter that adds layout classes to container blocks and records
/// their CSS in the render context's style set.
pub struct LayoutSupportFilter {
    registry: Arc<BlockTypeRegistry>,
    has_block_gap_support: bool,
    counter: AtomicUsize,
}

impl LayoutSupportFilter {
    pub fn new(registry: Arc<BlockTypeRegistry>, has_block_gap_support: bool) -> Self {
        Self {
            registry,
            has_block_gap_support,
            counter: AtomicUsize::new(0),
        }
    }

    fn used_layout(name: &str, block: &ParsedBlock, default: &Layout) -> Layout {
        let mut layout = block
            .attrs
            .get("layout")
            .and_then(Layout::from_value)
            .unwrap_or_else(|| default.clone());
        // Columns keep their vertical alignment outside the layout attribute.
        if name == "core/columns" && layout.vertical_alignment.is_none() {
            layout.vertical_alignment = block
                .attrs
                .get("verticalAlignment")
                .and_then(Value::as_str)
                .map(str::to_string);
        }
        layout
    }
}

impl RenderFilter for LayoutSupportFilter {
    fn name(&self) -> &str {
        "layout_support_capture"
    }

    fn render(&self, html: String, block: &ParsedBlock, ctx: &RenderContext) -> String {
        let Some(name) = block.name.as_deref() else {
            return html;
        };
        let Some(definition) = self.registry.get(name) else {
            return html;
        };
        let Some(support) = definition.supports.layout.as_ref() else {
            return html;
        };

        let layout = Self::used_layout(name, block, &support.default);
        let mut classes = layout_classes(name, &layout);
        if classes.is_empty() {
            return html;
        }

        let gap = block
            .attr_path(&["style", "spacing", "blockGap"])
            .and_then(SpacingValue::from_value);
        let padding = if definition.supports_padding() {
            block
                .attr_path(&["style", "spacing", "padding"])
                .and_then(SpacingValue::from_value)
        } else {
            None
        };

        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let container = container_class(name, n);
        let selector = format!(".{container}");
        let css = layout_styles(&LayoutStyleInput {
            selector: &selector,
            layout: &layout,
            has_block_gap_support: self.has_block_gap_support,
            gap: gap.as_ref(),
            skip_gap_serialization: definition.skips_gap_serialization(),
            fallback_gap: definition.fallback_gap(),
            padding: padding.as_ref(),
        });

        if !css.is_empty() {
            // Container class goes before the combined block class.
            let at = classes.len().saturating_sub(1);
            classes.insert(at, container);
            ctx.add_style(css);
        }

        add_root_classes(&html, &classes)
    }
}

/// Rendered item HTML with the style element captured alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedContent {
    pub content: String,
    /// `<style>` element, or empty.
    pub styles: String,
}

/// Renders items while capturing their block-support CSS.
#[derive(Debug, Clone)]
pub struct StyleCapturer {
    registry: Arc<BlockTypeRegistry>,
    has_block_gap_support: bool,
}

impl StyleCapturer {
    pub fn new(registry: Arc<BlockTypeRegistry>, has_block_gap_support: bool) -> Self {
        Self {
            registry,
            has_block_gap_support,
        }
    }

    /// Render `item` through a private copy of `pipeline` with the capture
    /// filter installed. The filter is gone again when this returns or
    /// unwinds. CSS that any filter adds through the render context is
    /// captured as well.
    pub fn render_with_styles(&self, pipeline: &BlockPipeline, item: &ContentItem) -> RenderedContent {
        let captured = Arc::new(Mutex::new(CapturedStyleSet::new()));
        let filter =
            LayoutSupportFilter::new(Arc::clone(&self.registry), self.has_block_gap_support);

        let blocks = parse_blocks(&item.body);
        let ctx = RenderContext::for_item(item.id, &item.item_type)
            .with_styles(Arc::clone(&captured));

        let mut scoped = pipeline.clone();
        let content = {
            let intercepted = scoped.intercept(Arc::new(filter));
            intercepted.render(&blocks, &ctx)
        };

        let styles = captured.lock().to_style_element(item.id);
        tracing::debug!(
            item_id = item.id,
            styles = styles.len(),
            "rendered item with captured block styles"
        );

        RenderedContent { content, styles }
    }
}
