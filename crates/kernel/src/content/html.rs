//! Small HTML helpers used while rendering blocks.

use std::sync::LazyLock;

use regex::Regex;

/// Matches a quoted class attribute inside a start tag. The value is in
/// group 1 (double quotes) or group 2 (single quotes).
///
/// # Panics
///
/// Panics if the hard-coded regex literal is invalid (impossible in practice).
#[allow(clippy::expect_used)]
static CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\sclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex literal")
});

/// Matches any tag, for [`strip_tags`].
#[allow(clippy::expect_used)]
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>").expect("valid regex literal"));

/// Escape text for use inside a double-quoted attribute value.
pub fn escape_attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

/// Escape text for use as element content.
pub fn escape_text(value: &str) -> String {
    html_escape::encode_safe(value).into_owned()
}

/// Decode HTML entities (`&quot;`, `&#123;`, ...).
pub fn decode_entities(value: &str) -> String {
    html_escape::decode_html_entities(value).into_owned()
}

/// Remove tags and comments, leaving decoded text.
pub fn strip_tags(html: &str) -> String {
    decode_entities(&ANY_TAG.replace_all(html, " "))
}

/// Byte range of the first real start tag: skips comments, closing tags and
/// doctype-style declarations. The range ends after the closing `>`.
fn first_start_tag(html: &str) -> Option<(usize, usize)> {
    let bytes = html.as_bytes();
    let mut pos = 0;

    while let Some(found) = html[pos..].find('<') {
        let start = pos + found;
        let rest = &html[start..];

        if rest.starts_with("<!--") {
            pos = start + rest.find("-->").map_or(rest.len(), |end| end + 3);
            continue;
        }
        if !bytes.get(start + 1).is_some_and(u8::is_ascii_alphabetic) {
            pos = start + 1;
            continue;
        }

        let mut quote = None;
        for (offset, c) in rest.char_indices() {
            match (quote, c) {
                (None, '"' | '\'') => quote = Some(c),
                (Some(q), c) if c == q => quote = None,
                (None, '>') => return Some((start, start + offset + 1)),
                _ => {}
            }
        }
        return None;
    }
    None
}

/// Add classes to the root element of a fragment of HTML.
///
/// Classes already present on the element are not added twice. Markup
/// without any start tag is returned unchanged.
pub fn add_root_classes(html: &str, classes: &[String]) -> String {
    if classes.is_empty() {
        return html.to_string();
    }
    let Some((start, end)) = first_start_tag(html) else {
        return html.to_string();
    };
    let tag = &html[start..end];

    let new_tag = if let Some(caps) = CLASS_ATTR.captures(tag) {
        let Some(value) = caps.get(1).or_else(|| caps.get(2)) else {
            return html.to_string();
        };
        let mut merged: Vec<&str> = value.as_str().split_whitespace().collect();
        for class in classes {
            if !merged.contains(&class.as_str()) {
                merged.push(class);
            }
        }
        format!(
            "{}{}{}",
            &tag[..value.start()],
            merged.join(" "),
            &tag[value.end()..]
        )
    } else {
        let mut unique: Vec<&str> = Vec::with_capacity(classes.len());
        for class in classes {
            if !unique.contains(&class.as_str()) {
                unique.push(class);
            }
        }
        let insert_at = if tag.ends_with("/>") {
            tag.len() - 2
        } else {
            tag.len() - 1
        };
        let head = tag[..insert_at].trim_end();
        format!(
            "{head} class=\"{}\"{}",
            escape_attr(&unique.join(" ")),
            &tag[insert_at..]
        )
    };

    format!("{}{new_tag}{}", &html[..start], &html[end..])
}
