//! The set of block types that may carry modal link annotations.
//!
//! Built once at startup from the defaults, configured additions and
//! extension callbacks, then read-only. Natively interactive blocks render
//! as buttons or anchors; a trigger inside them would nest interactive
//! elements, so they are refused no matter who asks for them.

use serde::Serialize;

/// Blocks supported out of the box.
pub const DEFAULT_SUPPORTED_BLOCKS: &[&str] = &[
    "core/paragraph",
    "core/heading",
    "core/list",
    "core/list-item",
    "core/quote",
    "core/verse",
    "core/preformatted",
    "core/navigation-link",
];

/// Blocks that are interactive themselves and can never be supported.
pub const INTERACTIVE_BLOCKS: &[&str] = &["core/button"];

/// Callback that may add or remove names before the set is frozen.
pub type SupportedBlocksExtension = Box<dyn Fn(&mut Vec<String>) + Send + Sync>;

/// Immutable, ordered set of supported block names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SupportedBlockSet {
    names: Vec<String>,
}

impl SupportedBlockSet {
    pub fn builder() -> SupportedBlockSetBuilder {
        SupportedBlockSetBuilder::new()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for SupportedBlockSet {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder collecting additions and extension callbacks.
pub struct SupportedBlockSetBuilder {
    names: Vec<String>,
    extensions: Vec<SupportedBlocksExtension>,
}

impl SupportedBlockSetBuilder {
    /// Start from the default blocks.
    pub fn new() -> Self {
        Self {
            names: DEFAULT_SUPPORTED_BLOCKS
                .iter()
                .map(|n| (*n).to_string())
                .collect(),
            extensions: Vec::new(),
        }
    }

    /// Add block names (e.g. from configuration).
    pub fn add_all<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Register an extension callback. Callbacks run in registration order
    /// after all additions.
    pub fn extend(mut self, extension: SupportedBlocksExtension) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Run extensions, drop refused and malformed names and freeze the set.
    pub fn build(self) -> SupportedBlockSet {
        let mut candidates = self.names;
        for extension in &self.extensions {
            extension(&mut candidates);
        }

        let mut names: Vec<String> = Vec::with_capacity(candidates.len());
        for name in candidates {
            let name = qualify(name.trim());
            if INTERACTIVE_BLOCKS.contains(&name.as_str()) {
                tracing::warn!(
                    block = %name,
                    "refusing modal link support for natively interactive block"
                );
                continue;
            }
            if !is_block_name(&name) {
                tracing::warn!(block = %name, "ignoring malformed block name");
                continue;
            }
            if !names.contains(&name) {
                names.push(name);
            }
        }

        tracing::debug!(count = names.len(), "supported block set built");
        SupportedBlockSet { names }
    }
}

impl Default for SupportedBlockSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Names without a namespace belong to `core`, as in serialized block markup.
fn qualify(name: &str) -> String {
    if name.is_empty() || name.contains('/') {
        name.to_string()
    } else {
        format!("core/{name}")
    }
}

/// `namespace/name`, lowercase letters, digits, `-` and `_`.
fn is_block_name(name: &str) -> bool {
    let valid_part = |part: &str| {
        part.starts_with(|c: char| c.is_ascii_lowercase())
            && part
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    };
    match name.split_once('/') {
        Some((namespace, local)) => valid_part(namespace) && valid_part(local),
        None => false,
    }
}
