//! Block type registry with block-support declarations.
//!
//! Provides:
//! - `BlockTypeDefinition`: metadata and supported features of a block type
//! - `BlockSupports`: layout and spacing capabilities consulted when
//!   computing block-support classes and CSS
//! - `BlockTypeRegistry`: registry of known block types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::layout::Layout;

/// Layout capability of a block type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSupport {
    /// Layout used when the block has no `layout` attribute.
    #[serde(default)]
    pub default: Layout,
}

/// Spacing capabilities of a block type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingSupport {
    /// Block accepts a `blockGap` value.
    pub block_gap: bool,
    /// Block accepts padding values.
    pub padding: bool,
    /// Block renders its own gap styles; skip generated gap CSS.
    #[serde(default)]
    pub skip_serialization: bool,
    /// Gap used when a side is missing from an array value.
    #[serde(default = "default_gap")]
    pub default_gap: String,
}

fn default_gap() -> String {
    "0.5em".to_string()
}

impl Default for SpacingSupport {
    fn default() -> Self {
        Self {
            block_gap: false,
            padding: false,
            skip_serialization: false,
            default_gap: default_gap(),
        }
    }
}

/// Supported features of a block type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockSupports {
    pub layout: Option<LayoutSupport>,
    pub spacing: Option<SpacingSupport>,
}

/// Definition of a single block type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockTypeDefinition {
    /// Fully qualified name (e.g. "core/group").
    pub name: String,
    /// Human-readable label (e.g. "Group").
    pub title: String,
    #[serde(default)]
    pub supports: BlockSupports,
}

impl BlockTypeDefinition {
    /// Define a block type with no supports.
    pub fn new(name: &str, title: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            supports: BlockSupports::default(),
        }
    }

    /// Declare layout support with the given default layout.
    pub fn with_layout(mut self, default: Layout) -> Self {
        self.supports.layout = Some(LayoutSupport { default });
        self
    }

    /// Declare spacing support.
    pub fn with_spacing(mut self, spacing: SpacingSupport) -> Self {
        self.supports.spacing = Some(spacing);
        self
    }

    pub fn has_layout_support(&self) -> bool {
        self.supports.layout.is_some()
    }

    pub fn supports_padding(&self) -> bool {
        self.supports.spacing.as_ref().is_some_and(|s| s.padding)
    }

    pub fn skips_gap_serialization(&self) -> bool {
        self.supports
            .spacing
            .as_ref()
            .is_some_and(|s| s.skip_serialization)
    }

    pub fn fallback_gap(&self) -> &str {
        self.supports
            .spacing
            .as_ref()
            .map_or("0.5em", |s| s.default_gap.as_str())
    }
}

/// Registry of block type definitions, keyed by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockTypeRegistry {
    types: HashMap<String, BlockTypeDefinition>,
}

impl BlockTypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the core block types.
    pub fn with_core_types() -> Self {
        let mut registry = Self::new();
        registry.register_core_types();
        registry
    }

    /// Register a single block type definition.
    pub fn register(&mut self, definition: BlockTypeDefinition) {
        self.types.insert(definition.name.clone(), definition);
    }

    /// Look up a block type by name.
    pub fn get(&self, name: &str) -> Option<&BlockTypeDefinition> {
        self.types.get(name)
    }

    /// Check whether a block type is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Register the core text and container block types.
    pub fn register_core_types(&mut self) {
        for (name, title) in [
            ("core/paragraph", "Paragraph"),
            ("core/heading", "Heading"),
            ("core/list-item", "List item"),
            ("core/verse", "Verse"),
            ("core/preformatted", "Preformatted"),
            ("core/navigation-link", "Custom Link"),
            ("core/button", "Button"),
            ("core/image", "Image"),
            ("core/separator", "Separator"),
        ] {
            self.register(BlockTypeDefinition::new(name, title));
        }

        let gap = || SpacingSupport {
            block_gap: true,
            padding: true,
            ..SpacingSupport::default()
        };

        self.register(
            BlockTypeDefinition::new("core/group", "Group")
                .with_layout(Layout::default())
                .with_spacing(gap()),
        );
        self.register(
            BlockTypeDefinition::new("core/columns", "Columns")
                .with_layout(Layout::flex())
                .with_spacing(SpacingSupport {
                    default_gap: "2em".to_string(),
                    ..gap()
                }),
        );
        self.register(
            BlockTypeDefinition::new("core/column", "Column")
                .with_layout(Layout::default())
                .with_spacing(gap()),
        );
        self.register(
            BlockTypeDefinition::new("core/buttons", "Buttons")
                .with_layout(Layout::flex())
                .with_spacing(gap()),
        );
        self.register(
            BlockTypeDefinition::new("core/list", "List").with_spacing(SpacingSupport {
                padding: true,
                ..SpacingSupport::default()
            }),
        );
        self.register(
            BlockTypeDefinition::new("core/quote", "Quote")
                .with_layout(Layout::default())
                .with_spacing(gap()),
        );
        self.register(
            BlockTypeDefinition::new("core/gallery", "Gallery")
                .with_layout(Layout::flex())
                .with_spacing(SpacingSupport {
                    skip_serialization: true,
                    ..gap()
                }),
        );
        self.register(
            BlockTypeDefinition::new("core/navigation", "Navigation")
                .with_layout(Layout::flex())
                .with_spacing(gap()),
        );
        self.register(
            BlockTypeDefinition::new("core/social-links", "Social Icons")
                .with_layout(Layout::flex())
                .with_spacing(gap()),
        );
        self.register(
            BlockTypeDefinition::new("core/cover", "Cover")
                .with_layout(Layout::constrained())
                .with_spacing(gap()),
        );
        self.register(
            BlockTypeDefinition::new("core/post-content", "Content")
                .with_layout(Layout::constrained()),
        );
    }
}
