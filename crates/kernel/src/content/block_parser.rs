//! Parser for serialized block markup.
//!
//! Content bodies are stored as HTML annotated with block delimiters:
//!
//! ```text
//! <!-- wp:group {"layout":{"type":"flex"}} -->
//! <div class="wp-block-group"><!-- wp:paragraph --><p>Hi</p><!-- /wp:paragraph --></div>
//! <!-- /wp:group -->
//! ```
//!
//! Void blocks use `<!-- wp:name /-->`. Names without a namespace belong to
//! `core/`. HTML outside any block becomes a freeform block with no name.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Matches the head of a block delimiter comment: opener or closer plus name.
///
/// # Panics
///
/// Panics if the hard-coded regex literal is invalid (impossible in practice).
#[allow(clippy::expect_used)]
static DELIMITER_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<!--\s+(/)?wp:([a-z][a-z0-9_-]*/)?([a-z][a-z0-9_-]*)\s+")
        .expect("valid regex literal")
});

/// A block parsed from serialized markup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedBlock {
    /// Fully qualified name (`core/paragraph`); `None` for freeform HTML.
    pub name: Option<String>,
    /// Block attributes from the delimiter JSON.
    pub attrs: Map<String, Value>,
    /// The block's own HTML with inner blocks removed.
    pub inner_html: String,
    pub inner_blocks: Vec<ParsedBlock>,
    /// HTML chunks interleaved with `None` slots, one per inner block.
    pub inner_content: Vec<Option<String>>,
}

impl ParsedBlock {
    /// Create a block with the given name and no content.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    fn freeform(html: &str) -> Self {
        Self {
            name: None,
            attrs: Map::new(),
            inner_html: html.to_string(),
            inner_blocks: Vec::new(),
            inner_content: vec![Some(html.to_string())],
        }
    }

    /// Short name without namespace (`paragraph` for `core/paragraph`).
    pub fn short_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(|n| n.rsplit('/').next().unwrap_or(n))
    }

    /// Look up a nested attribute by path (`["style", "spacing", "blockGap"]`).
    pub fn attr_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut value = self.attrs.get(*first)?;
        for key in rest {
            value = value.get(*key)?;
        }
        Some(value)
    }

    fn push_html(&mut self, html: &str) {
        if html.is_empty() {
            return;
        }
        self.inner_html.push_str(html);
        match self.inner_content.last_mut() {
            Some(Some(last)) => last.push_str(html),
            _ => self.inner_content.push(Some(html.to_string())),
        }
    }

    fn push_inner_block(&mut self, block: ParsedBlock) {
        self.inner_blocks.push(block);
        self.inner_content.push(None);
    }
}

/// A delimiter comment found in the markup.
#[derive(Debug)]
enum Delimiter {
    Open {
        name: String,
        attrs: Map<String, Value>,
        void: bool,
    },
    Close,
}

/// Try to read a delimiter at the start of `input`. Returns the token and
/// its byte length.
fn read_delimiter(input: &str) -> Option<(Delimiter, usize)> {
    let head = DELIMITER_HEAD.captures(input)?;
    let head_len = head.get(0)?.end();
    let end = input[head_len..].find("-->")? + head_len;
    let token_len = end + 3;

    let closer = head.get(1).is_some();
    let namespace = head.get(2).map_or("core/", |m| m.as_str());
    let name = format!("{namespace}{}", head.get(3)?.as_str());

    let mut middle = input[head_len..end].trim_end();
    let void = middle.ends_with('/');
    if void {
        middle = middle[..middle.len() - 1].trim_end();
    }

    if closer {
        return (middle.is_empty() && !void).then_some((Delimiter::Close, token_len));
    }

    let attrs = if middle.is_empty() {
        Map::new()
    } else if middle.starts_with('{') && middle.ends_with('}') {
        match serde_json::from_str::<Value>(middle) {
            Ok(Value::Object(map)) => map,
            _ => {
                tracing::debug!(block = %name, "ignoring unparseable block attributes");
                Map::new()
            }
        }
    } else {
        return None;
    };

    Some((Delimiter::Open { name, attrs, void }, token_len))
}

/// Attach a finished block to its parent, or to the top level.
fn attach(stack: &mut [ParsedBlock], output: &mut Vec<ParsedBlock>, block: ParsedBlock) {
    match stack.last_mut() {
        Some(parent) => parent.push_inner_block(block),
        None => output.push(block),
    }
}

/// Attach HTML to the open block, or emit it as freeform at the top level.
fn attach_html(stack: &mut [ParsedBlock], output: &mut Vec<ParsedBlock>, html: &str) {
    match stack.last_mut() {
        Some(parent) => parent.push_html(html),
        None if html.trim().is_empty() => {}
        None => output.push(ParsedBlock::freeform(html)),
    }
}

/// Parse serialized block markup into a block tree.
///
/// Never fails: stray closers are ignored, unclosed blocks are closed at the
/// end of input and unparseable attributes become empty.
pub fn parse_blocks(markup: &str) -> Vec<ParsedBlock> {
    let mut output = Vec::new();
    let mut stack: Vec<ParsedBlock> = Vec::new();
    let mut offset = 0;
    let mut cursor = 0;

    while let Some(found) = markup[cursor..].find("<!--") {
        let start = cursor + found;
        let Some((token, len)) = read_delimiter(&markup[start..]) else {
            cursor = start + 4;
            continue;
        };

        attach_html(&mut stack, &mut output, &markup[offset..start]);

        match token {
            Delimiter::Open { name, attrs, void } => {
                let block = ParsedBlock {
                    name: Some(name),
                    attrs,
                    ..ParsedBlock::default()
                };
                if void {
                    attach(&mut stack, &mut output, block);
                } else {
                    stack.push(block);
                }
            }
            Delimiter::Close => {
                if let Some(block) = stack.pop() {
                    attach(&mut stack, &mut output, block);
                } else {
                    tracing::debug!(offset = start, "ignoring stray block closer");
                }
            }
        }

        offset = start + len;
        cursor = offset;
    }

    attach_html(&mut stack, &mut output, &markup[offset..]);

    while let Some(block) = stack.pop() {
        attach(&mut stack, &mut output, block);
    }

    output
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_single_block_with_default_namespace() {
        let blocks = parse_blocks("<!-- wp:paragraph --><p>Hello</p><!-- /wp:paragraph -->");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name.as_deref(), Some("core/paragraph"));
        assert_eq!(blocks[0].inner_html, "<p>Hello</p>");
        assert_eq!(blocks[0].inner_content, vec![Some("<p>Hello</p>".to_string())]);
    }

    #[test]
    fn parses_attributes_and_namespace() {
        let blocks = parse_blocks(
            r#"<!-- wp:acme/card {"level":3,"style":{"spacing":{"blockGap":"2em"}}} --><div></div><!-- /wp:acme/card -->"#,
        );
        assert_eq!(blocks[0].name.as_deref(), Some("acme/card"));
        assert_eq!(blocks[0].attrs.get("level"), Some(&json!(3)));
        assert_eq!(
            blocks[0].attr_path(&["style", "spacing", "blockGap"]),
            Some(&json!("2em"))
        );
        assert_eq!(blocks[0].short_name(), Some("card"));
    }

    #[test]
    fn nested_blocks_leave_slots_in_inner_content() {
        let markup = concat!(
            r#"<!-- wp:group {"layout":{"type":"flex"}} -->"#,
            r#"<div class="wp-block-group">"#,
            "<!-- wp:paragraph --><p>A</p><!-- /wp:paragraph -->",
            "<!-- wp:paragraph --><p>B</p><!-- /wp:paragraph -->",
            "</div>",
            "<!-- /wp:group -->"
        );
        let blocks = parse_blocks(markup);
        assert_eq!(blocks.len(), 1);
        let group = &blocks[0];
        assert_eq!(group.inner_blocks.len(), 2);
        assert_eq!(
            group.inner_content,
            vec![
                Some(r#"<div class="wp-block-group">"#.to_string()),
                None,
                None,
                Some("</div>".to_string()),
            ]
        );
        assert_eq!(group.inner_html, r#"<div class="wp-block-group"></div>"#);
    }

    #[test]
    fn void_blocks_have_no_content() {
        let blocks = parse_blocks(r#"<!-- wp:separator {"opacity":"css"} /-->"#);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name.as_deref(), Some("core/separator"));
        assert!(blocks[0].inner_content.is_empty());
        assert_eq!(blocks[0].attrs.get("opacity"), Some(&json!("css")));
    }

    #[test]
    fn html_without_delimiters_is_freeform() {
        let blocks = parse_blocks("<p>Classic content</p>");
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].name.is_none());
        assert_eq!(blocks[0].inner_html, "<p>Classic content</p>");
    }

    #[test]
    fn whitespace_between_blocks_is_dropped() {
        let blocks = parse_blocks(
            "<!-- wp:paragraph --><p>A</p><!-- /wp:paragraph -->\n\n<!-- wp:paragraph --><p>B</p><!-- /wp:paragraph -->",
        );
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.name.is_some()));
    }

    #[test]
    fn ordinary_comments_stay_in_html() {
        let blocks =
            parse_blocks("<!-- wp:paragraph --><p><!-- note -->A</p><!-- /wp:paragraph -->");
        assert_eq!(blocks[0].inner_html, "<p><!-- note -->A</p>");
    }

    #[test]
    fn bad_attribute_json_becomes_empty() {
        let blocks =
            parse_blocks("<!-- wp:paragraph {not json} --><p>A</p><!-- /wp:paragraph -->");
        assert_eq!(blocks[0].name.as_deref(), Some("core/paragraph"));
        assert!(blocks[0].attrs.is_empty());
    }

    #[test]
    fn unclosed_block_is_closed_at_end() {
        let blocks = parse_blocks("<!-- wp:quote --><blockquote>Q</blockquote>");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].inner_html, "<blockquote>Q</blockquote>");
    }

    #[test]
    fn stray_closer_is_ignored() {
        let blocks = parse_blocks("<p>A</p><!-- /wp:paragraph -->");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].inner_html, "<p>A</p>");
    }
}
