//! Rewrites modal link annotation spans into trigger elements.
//!
//! The editor stores a modal link as an inline span:
//!
//! ```text
//! <span class="modal-link-trigger" data-modal-link="{&quot;id&quot;:42}"
//!       data-modal-content-type="post" data-modal-content-id="42">Learn more</span>
//! ```
//!
//! At render time the span becomes a keyboard-accessible trigger that only
//! carries the content type and id. The client overlay listens for
//! activation of `.has-modal-link` elements.

use std::borrow::Cow;
use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::content::html::{decode_entities, escape_attr};
use crate::content::{BlockPipeline, ParsedBlock, RenderContext, RenderFilter};

use super::supported_blocks::SupportedBlockSet;

/// Substring that must be present for any rewriting to happen.
pub const ANNOTATION_MARKER: &str = "data-modal-link";

/// An annotation span and its inner content. Nested spans are not
/// supported: the first `</span>` ends the match.
///
/// # Panics
///
/// Panics if the hard-coded regex literal is invalid (impossible in practice).
#[allow(clippy::expect_used)]
static ANNOTATION_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<span[^>]*class="[^"]*modal-link-trigger[^"]*"[^>]*>(.*?)</span>"#)
        .expect("valid regex literal")
});

#[allow(clippy::expect_used)]
static LINK_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"data-modal-link="([^"]*)""#).expect("valid regex literal"));

#[allow(clippy::expect_used)]
static TYPE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"data-modal-content-type="([^"]*)""#).expect("valid regex literal")
});

#[allow(clippy::expect_used)]
static ID_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"data-modal-content-id="([^"]*)""#).expect("valid regex literal")
});

/// Numeric or string identifier inside a link payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkTarget {
    Number(i64),
    Text(String),
}

/// Link payload written by the editor. Every field is optional; anything
/// that fails to decode becomes the empty payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkPayload {
    pub url: Option<String>,
    pub id: Option<LinkTarget>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
}

impl LinkPayload {
    /// Decode an attribute value: HTML entities first, then JSON.
    pub fn decode(raw: &str) -> Self {
        let json = decode_entities(raw);
        match serde_json::from_str(&json) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(error = %e, "undecodable modal link payload");
                Self::default()
            }
        }
    }
}

/// The three attributes of a well-formed annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub payload: LinkPayload,
    pub content_type: String,
    pub content_id: String,
}

fn attr<'a>(regex: &Regex, tag: &'a str) -> Option<&'a str> {
    regex.captures(tag)?.get(1).map(|m| m.as_str())
}

/// Extract the annotation attributes from span markup. Returns `None` when
/// any of them is missing.
pub fn parse_annotation(span: &str) -> Option<Annotation> {
    let link = attr(&LINK_ATTR, span)?;
    let content_type = attr(&TYPE_ATTR, span)?;
    let content_id = attr(&ID_ATTR, span)?;

    Some(Annotation {
        payload: LinkPayload::decode(link),
        content_type: content_type.to_string(),
        content_id: content_id.to_string(),
    })
}

/// Build the trigger element. `inner` is kept verbatim.
pub fn trigger_element(content_type: &str, content_id: &str, inner: &str) -> String {
    format!(
        concat!(
            r#"<span class="has-modal-link modal-link-trigger" "#,
            r#"data-modal-content-type="{}" data-modal-content-id="{}" "#,
            r#"role="button" tabindex="0" "#,
            r#"style="cursor: pointer; text-decoration: underline; text-decoration-style: dashed;">"#,
            "{}</span>"
        ),
        escape_attr(&decode_entities(content_type)),
        escape_attr(&decode_entities(content_id)),
        inner
    )
}

/// Rewrite every annotation span in `html`.
///
/// Input without the annotation marker is returned borrowed. Spans missing
/// one of the required attributes are left as they are.
pub fn rewrite_spans(html: &str) -> Cow<'_, str> {
    if !html.contains(ANNOTATION_MARKER) {
        return Cow::Borrowed(html);
    }

    ANNOTATION_SPAN.replace_all(html, |caps: &Captures<'_>| {
        let full = caps.get(0).map_or("", |m| m.as_str());
        let inner = caps.get(1).map_or("", |m| m.as_str());

        match parse_annotation(full) {
            Some(annotation) => {
                tracing::trace!(
                    content_type = %annotation.content_type,
                    content_id = %annotation.content_id,
                    "rewriting modal link annotation"
                );
                trigger_element(&annotation.content_type, &annotation.content_id, inner)
            }
            None => {
                tracing::debug!("leaving incomplete modal link annotation unchanged");
                full.to_string()
            }
        }
    })
}

/// Render filter applying [`rewrite_spans`] to a block's HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanRewriter;

impl RenderFilter for SpanRewriter {
    fn name(&self) -> &str {
        "modal_span_rewriter"
    }

    fn render(&self, html: String, _block: &ParsedBlock, _ctx: &RenderContext) -> String {
        match rewrite_spans(&html) {
            Cow::Borrowed(_) => html,
            Cow::Owned(rewritten) => rewritten,
        }
    }
}

/// Register the rewriter for every supported block.
pub fn register(pipeline: &mut BlockPipeline, blocks: &SupportedBlockSet) {
    let filter: Arc<dyn RenderFilter> = Arc::new(SpanRewriter);
    for name in blocks.iter() {
        pipeline.add_for_block(name, Arc::clone(&filter));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::content::parse_blocks;

    const LEARN_MORE: &str = concat!(
        r#"<span class="modal-link-trigger" "#,
        r#"data-modal-link="{&quot;url&quot;:&quot;/?p=42&quot;,&quot;id&quot;:42,&quot;type&quot;:&quot;post&quot;,&quot;title&quot;:&quot;Guide&quot;}" "#,
        r#"data-modal-content-type="post" data-modal-content-id="42">Learn more</span>"#
    );

    fn expected_trigger(content_type: &str, content_id: &str, inner: &str) -> String {
        format!(
            r#"<span class="has-modal-link modal-link-trigger" data-modal-content-type="{content_type}" data-modal-content-id="{content_id}" role="button" tabindex="0" style="cursor: pointer; text-decoration: underline; text-decoration-style: dashed;">{inner}</span>"#
        )
    }

    #[test]
    fn rewrites_well_formed_span() {
        let html = format!("<p>Read {LEARN_MORE} today.</p>");
        assert_eq!(
            rewrite_spans(&html),
            format!("<p>Read {} today.</p>", expected_trigger("post", "42", "Learn more"))
        );
    }

    #[test]
    fn html_without_marker_is_borrowed() {
        let html = r#"<p><span class="modal-link-trigger">x</span></p>"#;
        assert!(matches!(rewrite_spans(html), Cow::Borrowed(s) if s == html));
    }

    #[test]
    fn rewrites_every_span_and_keeps_surroundings() {
        let url_span = concat!(
            r#"<span class="modal-link-trigger" data-modal-link="{}" "#,
            r#"data-modal-content-type="url" data-modal-content-id="https://example.com/a?b=1&amp;c=2">"#,
            "<strong>docs</strong></span>"
        );
        let html = format!("<ul><li>{LEARN_MORE}</li><li>and {url_span}!</li></ul>");
        let out = rewrite_spans(&html);
        assert_eq!(
            out,
            format!(
                "<ul><li>{}</li><li>and {}!</li></ul>",
                expected_trigger("post", "42", "Learn more"),
                expected_trigger(
                    "url",
                    "https://example.com/a?b=1&amp;c=2",
                    "<strong>docs</strong>"
                )
            )
        );
    }

    #[test]
    fn missing_attribute_leaves_span_intact() {
        let html = concat!(
            r#"<p><span class="modal-link-trigger" data-modal-link="{}" data-modal-content-id="7">A</span> "#,
            r#"<span class="modal-link-trigger" data-modal-link="{}" data-modal-content-type="page" data-modal-content-id="7">B</span></p>"#
        );
        let out = rewrite_spans(html);
        assert!(out.starts_with(
            r#"<p><span class="modal-link-trigger" data-modal-link="{}" data-modal-content-id="7">A</span> "#
        ));
        assert!(out.ends_with(&format!("{}</p>", expected_trigger("page", "7", "B"))));
    }

    #[test]
    fn inner_content_spans_lines() {
        let html = concat!(
            r#"<p><span class="modal-link-trigger" data-modal-link="{}" "#,
            r#"data-modal-content-type="post" data-modal-content-id="3">line one"#,
            "\nline two</span></p>"
        );
        assert_eq!(
            rewrite_spans(html),
            format!("<p>{}</p>", expected_trigger("post", "3", "line one\nline two"))
        );
    }

    #[test]
    fn rewriting_is_idempotent() {
        let once = rewrite_spans(LEARN_MORE).into_owned();
        let twice = rewrite_spans(&once).into_owned();
        assert_eq!(once, twice);
    }

    #[test]
    fn attribute_values_are_escaped() {
        let html = concat!(
            r#"<span class="modal-link-trigger" data-modal-link="x" "#,
            r#"data-modal-content-type="post&quot;onclick=&quot;x" data-modal-content-id="1">A</span>"#
        );
        let out = rewrite_spans(html);
        assert!(out.contains(r#"data-modal-content-type="post&quot;onclick=&quot;x""#));
        assert!(!out.contains(r#"onclick="x""#));
    }

    #[test]
    fn payload_decodes_entities_then_json() {
        let annotation = parse_annotation(LEARN_MORE).unwrap();
        assert_eq!(annotation.payload.id, Some(LinkTarget::Number(42)));
        assert_eq!(annotation.payload.kind.as_deref(), Some("post"));
        assert_eq!(annotation.payload.title.as_deref(), Some("Guide"));
        assert_eq!(annotation.content_type, "post");
        assert_eq!(annotation.content_id, "42");
    }

    #[test]
    fn bad_payload_is_empty_not_an_error() {
        assert_eq!(LinkPayload::decode("{not json"), LinkPayload::default());
        let span = r#"<span class="modal-link-trigger" data-modal-link="oops" data-modal-content-type="post" data-modal-content-id="9">x</span>"#;
        let annotation = parse_annotation(span).unwrap();
        assert_eq!(annotation.payload, LinkPayload::default());
        assert_eq!(rewrite_spans(span), expected_trigger("post", "9", "x"));
    }

    #[test]
    fn only_supported_blocks_are_rewritten() {
        let mut pipeline = BlockPipeline::new();
        register(&mut pipeline, &SupportedBlockSet::default());

        let markup = format!(
            "<!-- wp:paragraph --><p>{LEARN_MORE}</p><!-- /wp:paragraph -->\
             <!-- wp:button --><div>{LEARN_MORE}</div><!-- /wp:button -->"
        );
        let out = pipeline.render(&parse_blocks(&markup), &RenderContext::default());
        assert!(out.starts_with(&format!(
            "<p>{}</p>",
            expected_trigger("post", "42", "Learn more")
        )));
        assert!(out.ends_with(&format!("<div>{LEARN_MORE}</div>")));
    }

    #[test]
    fn later_filters_see_rewritten_output() {
        let mut pipeline = BlockPipeline::new();
        register(&mut pipeline, &SupportedBlockSet::default());
        pipeline.add_for_block(
            "core/paragraph",
            Arc::new(|html: String, _: &ParsedBlock, _: &RenderContext| {
                html.replace("has-modal-link", "has-modal-link extra")
            }),
        );
        let markup = format!("<!-- wp:paragraph --><p>{LEARN_MORE}</p><!-- /wp:paragraph -->");
        let out = pipeline.render(&parse_blocks(&markup), &RenderContext::default());
        assert!(out.contains("has-modal-link extra modal-link-trigger"));
    }
}
