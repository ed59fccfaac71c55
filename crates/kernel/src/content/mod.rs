//! Content rendering module.
//!
//! This module provides:
//! - Block parser: serialized block markup to a block tree
//! - BlockTypeRegistry: block types and their layout/spacing supports
//! - Layout: block-support classes and CSS for container blocks
//! - BlockPipeline: depth-first rendering with per-block render filters
//! - CapturedStyleSet: CSS collected by filters during one render

pub mod block_parser;
pub mod block_types;
pub mod html;
pub mod layout;
pub mod pipeline;
pub mod styles;

pub use block_parser::{ParsedBlock, parse_blocks};
pub use block_types::{BlockTypeDefinition, BlockTypeRegistry};
pub use layout::{Layout, LayoutType, SpacingValue};
pub use pipeline::{BlockPipeline, FilterId, Interception, RenderContext, RenderFilter};
pub use styles::CapturedStyleSet;
