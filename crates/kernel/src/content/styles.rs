//! CSS collected while rendering blocks.

use super::html::escape_attr;

/// CSS fragments collected during one render, in first-seen order without
/// duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedStyleSet {
    fragments: Vec<String>,
}

impl CapturedStyleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment. Empty and already captured fragments are ignored.
    pub fn push(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        if fragment.trim().is_empty() || self.fragments.contains(&fragment) {
            return;
        }
        self.fragments.push(fragment);
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(String::as_str)
    }

    /// All fragments joined by newlines.
    pub fn css(&self) -> String {
        self.fragments.join("\n")
    }

    /// Serialize as `<style id="modal-{id}-block-supports">`, or an empty
    /// string when nothing was captured.
    pub fn to_style_element(&self, item_id: i64) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!(
            r#"<style id="modal-{}-block-supports">{}</style>"#,
            escape_attr(&item_id.to_string()),
            self.css()
        )
    }
}
