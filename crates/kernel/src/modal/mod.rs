//! Modal links.
//!
//! Editors annotate inline text with a link to a post, page or external URL.
//! This module turns those annotations into overlay triggers at render time
//! and serves the content the overlay displays:
//! - SupportedBlockSet: block types whose output is rewritten
//! - Span rewriter: annotation spans to trigger elements
//! - Style capture: block-support CSS returned with fetched content
//! - UrlPolicy: which external URLs may be framed
//! - ModalService: orchestration for the REST endpoints

pub mod service;
pub mod span_rewriter;
pub mod style_capture;
pub mod supported_blocks;
pub mod url_policy;

pub use service::{ModalContent, ModalService, SearchHit, SearchResults};
pub use span_rewriter::{LinkPayload, SpanRewriter, rewrite_spans};
pub use style_capture::{RenderedContent, StyleCapturer};
pub use supported_blocks::{SupportedBlockSet, SupportedBlocksExtension};
pub use url_policy::UrlPolicy;
