//! Layout and spacing block supports.
//!
//! Computes the CSS that container blocks need for their layout (flow,
//! constrained, flex, grid), block gap and padding. Values come from block
//! attributes, which are author-controlled, so every value is checked for
//! characters that could break out of a declaration before it is emitted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Layout type of a container block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayoutType {
    Default,
    Constrained,
    Flex,
    Grid,
    Unknown,
}

impl From<String> for LayoutType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "default" | "flow" => Self::Default,
            "constrained" => Self::Constrained,
            "flex" => Self::Flex,
            "grid" => Self::Grid,
            _ => Self::Unknown,
        }
    }
}

impl From<LayoutType> for String {
    fn from(value: LayoutType) -> Self {
        match value {
            LayoutType::Default => "default",
            LayoutType::Constrained => "constrained",
            LayoutType::Flex => "flex",
            LayoutType::Grid => "grid",
            LayoutType::Unknown => "unknown",
        }
        .to_string()
    }
}

impl LayoutType {
    /// Class name shared by every block using this layout.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Default => "is-layout-flow",
            Self::Constrained => "is-layout-constrained",
            Self::Flex => "is-layout-flex",
            Self::Grid => "is-layout-grid",
            Self::Unknown => "",
        }
    }
}

/// The `layout` attribute of a block, or a block type's default layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Layout {
    #[serde(rename = "type")]
    pub layout_type: Option<LayoutType>,
    pub orientation: Option<String>,
    pub justify_content: Option<String>,
    pub vertical_alignment: Option<String>,
    pub flex_wrap: Option<String>,
    pub content_size: Option<String>,
    pub wide_size: Option<String>,
    /// Legacy flag for "inherit content width".
    pub inherit: bool,
    pub column_count: Option<u32>,
    pub minimum_column_width: Option<String>,
}

impl Layout {
    pub fn flex() -> Self {
        Self {
            layout_type: Some(LayoutType::Flex),
            ..Self::default()
        }
    }

    pub fn constrained() -> Self {
        Self {
            layout_type: Some(LayoutType::Constrained),
            ..Self::default()
        }
    }

    /// Parse a layout attribute value, falling back to `None` when its
    /// shape is wrong.
    pub fn from_value(value: &Value) -> Option<Self> {
        match serde_json::from_value(value.clone()) {
            Ok(layout) => Some(layout),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring malformed layout attribute");
                None
            }
        }
    }

    /// Effective layout type. Legacy content-width settings force
    /// `constrained`.
    pub fn resolved_type(&self) -> LayoutType {
        let has_content_size = self.content_size.as_deref().is_some_and(|s| !s.is_empty());
        if self.inherit || has_content_size {
            return LayoutType::Constrained;
        }
        self.layout_type.unwrap_or(LayoutType::Default)
    }

    pub fn is_vertical(&self) -> bool {
        self.orientation.as_deref() == Some("vertical")
    }
}

/// A spacing attribute: one shorthand value or one value per side.
#[derive(Debug, Clone, PartialEq)]
pub enum SpacingValue {
    Single(String),
    Sides(Vec<(String, String)>),
}

impl SpacingValue {
    /// Read a spacing value from JSON. Unsafe entries are dropped.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => is_safe_css_value(s).then(|| Self::Single(s.clone())),
            Value::Object(map) => Some(Self::Sides(
                map.iter()
                    .filter_map(|(side, v)| {
                        let v = v.as_str()?;
                        is_safe_css_value(v).then(|| (side.clone(), v.to_string()))
                    })
                    .collect(),
            )),
            _ => None,
        }
    }

    pub fn side(&self, name: &str) -> Option<&str> {
        match self {
            Self::Single(_) => None,
            Self::Sides(sides) => sides
                .iter()
                .find(|(side, _)| side == name)
                .map(|(_, v)| v.as_str()),
        }
    }
}

/// Whether a value can be emitted inside a CSS declaration.
///
/// Rejects empty values, backslashes, parentheses, braces, `&`, `=` and
/// comment openers.
pub fn is_safe_css_value(value: &str) -> bool {
    !value.trim().is_empty()
        && !value.contains("/*")
        && !value
            .chars()
            .any(|c| matches!(c, '\\' | '(' | ')' | '{' | '}' | '&' | '='))
}

/// Convert a preset token (`var:preset|spacing|xl`) into a CSS custom
/// property reference (`var(--wp--preset--spacing--xl)`). Other values pass
/// through unchanged.
pub fn preset_to_css_var(value: &str) -> String {
    let Some(rest) = value.strip_prefix("var:") else {
        return value.to_string();
    };
    if !rest.contains('|') {
        return value.to_string();
    }
    let path = rest
        .split('|')
        .map(to_kebab_case)
        .collect::<Vec<_>>()
        .join("--");
    format!("var(--wp--{path})")
}

fn to_kebab_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut prev_lower_or_digit = false;
    for c in segment.chars() {
        if c == '_' || c == ' ' || c == '-' {
            if !out.ends_with('-') && !out.is_empty() {
                out.push('-');
            }
            prev_lower_or_digit = false;
        } else if c.is_uppercase() {
            if prev_lower_or_digit {
                out.push('-');
            }
            out.extend(c.to_lowercase());
            prev_lower_or_digit = false;
        } else {
            out.push(c);
            prev_lower_or_digit = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

/// Ordered set of CSS rules; declarations for a repeated selector merge into
/// the first rule with that selector.
#[derive(Debug, Default)]
pub struct Stylesheet {
    rules: Vec<(String, Vec<(String, String)>)>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, selector: &str, declarations: &[(&str, &str)]) {
        if declarations.is_empty() {
            return;
        }
        let index = match self.rules.iter().position(|(s, _)| s == selector) {
            Some(i) => i,
            None => {
                self.rules.push((selector.to_string(), Vec::new()));
                self.rules.len() - 1
            }
        };
        let rule = &mut self.rules[index].1;
        for (prop, value) in declarations {
            match rule.iter_mut().find(|(p, _)| p == prop) {
                Some(existing) => existing.1 = (*value).to_string(),
                None => rule.push(((*prop).to_string(), (*value).to_string())),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Compact form: `selector{prop: value;prop: value;}`.
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for (selector, declarations) in &self.rules {
            css.push_str(selector);
            css.push('{');
            for (prop, value) in declarations {
                css.push_str(prop);
                css.push_str(": ");
                css.push_str(value);
                css.push(';');
            }
            css.push('}');
        }
        css
    }
}

/// Inputs for [`layout_styles`].
#[derive(Debug, Clone)]
pub struct LayoutStyleInput<'a> {
    /// Selector the rules are scoped to (e.g. `.wp-container-core-group-is-layout-1`).
    pub selector: &'a str,
    pub layout: &'a Layout,
    /// Theme declares block gap support.
    pub has_block_gap_support: bool,
    pub gap: Option<&'a SpacingValue>,
    pub skip_gap_serialization: bool,
    pub fallback_gap: &'a str,
    /// Padding, only passed for blocks that support it.
    pub padding: Option<&'a SpacingValue>,
}

/// Generate the layout, gap and padding CSS for one block.
///
/// Returns an empty string when nothing needs to be emitted.
pub fn layout_styles(input: &LayoutStyleInput<'_>) -> String {
    let mut sheet = Stylesheet::new();
    let sel = input.selector;
    let layout = input.layout;
    let emit_gap = input.has_block_gap_support && !input.skip_gap_serialization;

    match layout.resolved_type() {
        LayoutType::Default => {
            if emit_gap {
                flow_gap(&mut sheet, sel, input.gap);
            }
        }
        LayoutType::Constrained => {
            constrained(&mut sheet, sel, layout);
            if emit_gap {
                flow_gap(&mut sheet, sel, input.gap);
            }
        }
        LayoutType::Flex => {
            flex(&mut sheet, sel, layout);
            if emit_gap {
                axis_gap(&mut sheet, sel, input.gap, input.fallback_gap);
            }
        }
        LayoutType::Grid => {
            grid(&mut sheet, sel, layout);
            if emit_gap {
                axis_gap(&mut sheet, sel, input.gap, input.fallback_gap);
            }
        }
        LayoutType::Unknown => {}
    }

    if let Some(padding) = input.padding {
        padding_rules(&mut sheet, sel, padding);
    }

    sheet.to_css()
}

/// Gap for flow layouts: vertical margin between children.
fn flow_gap(sheet: &mut Stylesheet, sel: &str, gap: Option<&SpacingValue>) {
    let value = match gap {
        Some(SpacingValue::Single(v)) => Some(v.as_str()),
        Some(sides @ SpacingValue::Sides(_)) => sides.side("top"),
        None => None,
    };
    let Some(value) = value else {
        return;
    };
    let value = preset_to_css_var(value);
    sheet.add(
        &format!("{sel} > *"),
        &[("margin-block-start", "0"), ("margin-block-end", "0")],
    );
    sheet.add(
        &format!("{sel} > * + *"),
        &[("margin-block-start", value.as_str()), ("margin-block-end", "0")],
    );
}

/// Gap for flex and grid layouts: `row column`, collapsed when equal.
fn axis_gap(sheet: &mut Stylesheet, sel: &str, gap: Option<&SpacingValue>, fallback: &str) {
    let combined = match gap {
        Some(SpacingValue::Single(v)) => preset_to_css_var(v),
        Some(sides @ SpacingValue::Sides(_)) => {
            let row = preset_to_css_var(sides.side("top").unwrap_or(fallback));
            let column = preset_to_css_var(sides.side("left").unwrap_or(fallback));
            if row == column {
                row
            } else {
                format!("{row} {column}")
            }
        }
        None => return,
    };
    let combined = combined.trim();
    if !combined.is_empty() {
        sheet.add(sel, &[("gap", combined)]);
    }
}

fn constrained(sheet: &mut Stylesheet, sel: &str, layout: &Layout) {
    let safe = |v: &Option<String>| {
        v.as_deref()
            .filter(|v| is_safe_css_value(v))
            .map(preset_to_css_var)
    };
    let content_size = safe(&layout.content_size);
    let wide_size = safe(&layout.wide_size);

    let children = format!("{sel} > :where(:not(.alignleft):not(.alignright):not(.alignfull))");

    if let Some(max_width) = content_size.as_ref().or(wide_size.as_ref()) {
        let wide = wide_size.as_ref().unwrap_or(max_width);
        sheet.add(
            &children,
            &[
                ("max-width", max_width.as_str()),
                ("margin-left", "auto !important"),
                ("margin-right", "auto !important"),
            ],
        );
        sheet.add(&format!("{sel} > .alignwide"), &[("max-width", wide.as_str())]);
        sheet.add(&format!("{sel} .alignfull"), &[("max-width", "none")]);
    }

    match layout.justify_content.as_deref() {
        Some("left") => sheet.add(&children, &[("margin-left", "0 !important")]),
        Some("right") => sheet.add(&children, &[("margin-right", "0 !important")]),
        _ => {}
    }
}

fn flex(sheet: &mut Stylesheet, sel: &str, layout: &Layout) {
    if layout.flex_wrap.as_deref() == Some("nowrap") {
        sheet.add(sel, &[("flex-wrap", "nowrap")]);
    }

    let justify = layout.justify_content.as_deref();
    let vertical = layout.vertical_alignment.as_deref();

    if layout.is_vertical() {
        sheet.add(sel, &[("flex-direction", "column")]);
        if let Some(v) = justify.and_then(vertical_justify) {
            sheet.add(sel, &[("align-items", v)]);
        }
        if let Some(v) = vertical.and_then(vertical_alignment) {
            sheet.add(sel, &[("justify-content", v)]);
        }
    } else {
        if let Some(v) = justify.and_then(horizontal_justify) {
            sheet.add(sel, &[("justify-content", v)]);
        }
        if let Some(v) = vertical.and_then(vertical_alignment) {
            sheet.add(sel, &[("align-items", v)]);
        }
    }
}

fn grid(sheet: &mut Stylesheet, sel: &str, layout: &Layout) {
    let columns = match layout.column_count {
        Some(count) if count > 0 => format!("repeat({count}, minmax(0, 1fr))"),
        _ => {
            let minimum = layout
                .minimum_column_width
                .as_deref()
                .filter(|v| is_safe_css_value(v))
                .map_or_else(|| "12rem".to_string(), preset_to_css_var);
            format!("repeat(auto-fill, minmax(min({minimum}, 100%), 1fr))")
        }
    };
    sheet.add(sel, &[("grid-template-columns", columns.as_str())]);
}

fn padding_rules(sheet: &mut Stylesheet, sel: &str, padding: &SpacingValue) {
    match padding {
        SpacingValue::Single(v) => {
            let value = preset_to_css_var(v);
            sheet.add(sel, &[("padding", value.as_str())]);
        }
        SpacingValue::Sides(_) => {
            for side in ["top", "right", "bottom", "left"] {
                if let Some(v) = padding.side(side) {
                    let prop = format!("padding-{side}");
                    let value = preset_to_css_var(v);
                    sheet.add(sel, &[(prop.as_str(), value.as_str())]);
                }
            }
        }
    }
}

fn horizontal_justify(value: &str) -> Option<&'static str> {
    match value {
        "left" => Some("flex-start"),
        "right" => Some("flex-end"),
        "center" => Some("center"),
        "space-between" => Some("space-between"),
        _ => None,
    }
}

fn vertical_justify(value: &str) -> Option<&'static str> {
    match value {
        "left" => Some("flex-start"),
        "right" => Some("flex-end"),
        "center" => Some("center"),
        "stretch" => Some("stretch"),
        _ => None,
    }
}

fn vertical_alignment(value: &str) -> Option<&'static str> {
    match value {
        "top" => Some("flex-start"),
        "center" => Some("center"),
        "bottom" => Some("flex-end"),
        "stretch" => Some("stretch"),
        "space-between" => Some("space-between"),
        _ => None,
    }
}

/// Classes describing a block's layout, without the per-render container
/// class.
///
/// The first entry is the layout class (`is-layout-flex`), followed by
/// modifiers and the combined `wp-block-{short}-{layout}` class.
pub fn layout_classes(block_name: &str, layout: &Layout) -> Vec<String> {
    let layout_type = layout.resolved_type();
    let layout_class = layout_type.class_name();
    if layout_class.is_empty() {
        return Vec::new();
    }

    let mut classes = vec![layout_class.to_string()];

    if let Some(orientation) = layout
        .orientation
        .as_deref()
        .map(sanitize_class)
        .filter(|o| !o.is_empty())
    {
        classes.push(format!("is-{orientation}"));
    }
    if let Some(justify) = layout
        .justify_content
        .as_deref()
        .map(sanitize_class)
        .filter(|j| !j.is_empty())
    {
        classes.push(format!("is-content-justification-{justify}"));
    }
    if layout.flex_wrap.as_deref() == Some("nowrap") {
        classes.push("is-nowrap".to_string());
    }
    if block_name == "core/columns" {
        let alignment = layout
            .vertical_alignment
            .as_deref()
            .map(sanitize_class)
            .filter(|a| !a.is_empty());
        classes.extend(alignment.map(|a| format!("are-vertically-aligned-{a}")));
    }

    let short = block_name.rsplit('/').next().unwrap_or(block_name);
    classes.push(format!("wp-block-{}-{layout_class}", sanitize_class(short)));
    classes
}

/// Container class unique within one render: `wp-container-core-group-is-layout-3`.
pub fn container_class(block_name: &str, counter: usize) -> String {
    format!(
        "wp-container-{}-is-layout-{counter}",
        sanitize_class(&block_name.replace('/', "-"))
    )
}

/// Keep only characters valid in an HTML class token.
pub fn sanitize_class(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input<'a>(
        layout: &'a Layout,
        gap: Option<&'a SpacingValue>,
        padding: Option<&'a SpacingValue>,
    ) -> LayoutStyleInput<'a> {
        LayoutStyleInput {
            selector: ".c",
            layout,
            has_block_gap_support: true,
            gap,
            skip_gap_serialization: false,
            fallback_gap: "0.5em",
            padding,
        }
    }

    #[test]
    fn layout_parses_camel_case_attributes() {
        let layout = Layout::from_value(&json!({
            "type": "flex",
            "orientation": "vertical",
            "justifyContent": "center",
            "flexWrap": "nowrap"
        }))
        .unwrap();
        assert_eq!(layout.layout_type, Some(LayoutType::Flex));
        assert!(layout.is_vertical());
        assert_eq!(layout.justify_content.as_deref(), Some("center"));
    }

    #[test]
    fn unknown_layout_type_has_no_class() {
        let layout = Layout::from_value(&json!({"type": "masonry"})).unwrap();
        assert_eq!(layout.resolved_type(), LayoutType::Unknown);
        assert_eq!(LayoutType::Unknown.class_name(), "");
    }

    #[test]
    fn legacy_content_width_forces_constrained() {
        let layout = Layout::from_value(&json!({"inherit": true})).unwrap();
        assert_eq!(layout.resolved_type(), LayoutType::Constrained);
        let layout = Layout::from_value(&json!({"type": "default", "contentSize": "640px"})).unwrap();
        assert_eq!(layout.resolved_type(), LayoutType::Constrained);
    }

    #[test]
    fn unsafe_values_are_rejected() {
        for bad in [
            "1em;}body{color:red",
            "url(x)",
            "a\\b",
            "1em /* c */",
            "x=1",
            "a&b",
            "",
        ] {
            assert!(!is_safe_css_value(bad), "{bad:?} should be rejected");
        }
        assert!(is_safe_css_value("2em"));
        assert!(is_safe_css_value("var:preset|spacing|40"));
    }

    #[test]
    fn preset_tokens_become_custom_properties() {
        assert_eq!(
            preset_to_css_var("var:preset|spacing|xl"),
            "var(--wp--preset--spacing--xl)"
        );
        assert_eq!(
            preset_to_css_var("var:preset|spacing|xxLarge"),
            "var(--wp--preset--spacing--xx-large)"
        );
        assert_eq!(preset_to_css_var("24px"), "24px");
    }

    #[test]
    fn spacing_value_drops_unsafe_sides() {
        let value = SpacingValue::from_value(&json!({"top": "1em", "left": "calc(1em)"})).unwrap();
        assert_eq!(value.side("top"), Some("1em"));
        assert_eq!(value.side("left"), None);
        assert!(SpacingValue::from_value(&json!("url(x)")).is_none());
        assert!(SpacingValue::from_value(&json!(12)).is_none());
    }

    #[test]
    fn flex_gap_is_scoped_to_selector() {
        let layout = Layout::flex();
        let gap = SpacingValue::Single("2em".to_string());
        let css = layout_styles(&input(&layout, Some(&gap), None));
        assert_eq!(css, ".c{gap: 2em;}");
    }

    #[test]
    fn flex_gap_sides_combine_and_fall_back() {
        let layout = Layout::flex();
        let gap = SpacingValue::from_value(&json!({"top": "var:preset|spacing|20"})).unwrap();
        let css = layout_styles(&input(&layout, Some(&gap), None));
        assert_eq!(css, ".c{gap: var(--wp--preset--spacing--20) 0.5em;}");

        let gap = SpacingValue::from_value(&json!({"top": "1em", "left": "1em"})).unwrap();
        let css = layout_styles(&input(&layout, Some(&gap), None));
        assert_eq!(css, ".c{gap: 1em;}");
    }

    #[test]
    fn flex_alignment_declarations_merge_into_one_rule() {
        let layout = Layout::from_value(&json!({
            "type": "flex",
            "flexWrap": "nowrap",
            "justifyContent": "space-between",
            "verticalAlignment": "center"
        }))
        .unwrap();
        let css = layout_styles(&input(&layout, None, None));
        assert_eq!(
            css,
            ".c{flex-wrap: nowrap;justify-content: space-between;align-items: center;}"
        );
    }

    #[test]
    fn vertical_flex_swaps_axes() {
        let layout = Layout::from_value(&json!({
            "type": "flex",
            "orientation": "vertical",
            "justifyContent": "right",
            "verticalAlignment": "bottom"
        }))
        .unwrap();
        let css = layout_styles(&input(&layout, None, None));
        assert_eq!(
            css,
            ".c{flex-direction: column;align-items: flex-end;justify-content: flex-end;}"
        );
    }

    #[test]
    fn flow_gap_sets_child_margins() {
        let layout = Layout::default();
        let gap = SpacingValue::Single("var:preset|spacing|xl".to_string());
        let css = layout_styles(&input(&layout, Some(&gap), None));
        assert_eq!(
            css,
            ".c > *{margin-block-start: 0;margin-block-end: 0;}\
             .c > * + *{margin-block-start: var(--wp--preset--spacing--xl);margin-block-end: 0;}"
        );
    }

    #[test]
    fn gap_skipped_without_theme_support() {
        let layout = Layout::flex();
        let gap = SpacingValue::Single("2em".to_string());
        let mut params = input(&layout, Some(&gap), None);
        params.has_block_gap_support = false;
        assert_eq!(layout_styles(&params), "");
        params.has_block_gap_support = true;
        params.skip_gap_serialization = true;
        assert_eq!(layout_styles(&params), "");
    }

    #[test]
    fn constrained_emits_width_rules() {
        let layout = Layout::from_value(&json!({
            "type": "constrained",
            "contentSize": "640px",
            "wideSize": "1200px",
            "justifyContent": "left"
        }))
        .unwrap();
        let css = layout_styles(&input(&layout, None, None));
        assert!(css.contains("max-width: 640px;margin-left: 0 !important;margin-right: auto !important;"));
        assert!(css.contains(".c > .alignwide{max-width: 1200px;}"));
        assert!(css.contains(".c .alignfull{max-width: none;}"));
    }

    #[test]
    fn grid_uses_column_count_or_minimum_width() {
        let layout = Layout::from_value(&json!({"type": "grid", "columnCount": 3})).unwrap();
        assert_eq!(
            layout_styles(&input(&layout, None, None)),
            ".c{grid-template-columns: repeat(3, minmax(0, 1fr));}"
        );
        let layout = Layout::from_value(&json!({"type": "grid"})).unwrap();
        assert_eq!(
            layout_styles(&input(&layout, None, None)),
            ".c{grid-template-columns: repeat(auto-fill, minmax(min(12rem, 100%), 1fr));}"
        );
    }

    #[test]
    fn padding_per_side_in_fixed_order() {
        let layout = Layout::default();
        let padding =
            SpacingValue::from_value(&json!({"left": "2px", "top": "var:preset|spacing|10"}))
                .unwrap();
        let css = layout_styles(&input(&layout, None, Some(&padding)));
        assert_eq!(
            css,
            ".c{padding-top: var(--wp--preset--spacing--10);padding-left: 2px;}"
        );
    }

    #[test]
    fn stylesheet_merges_repeated_selectors() {
        let mut sheet = Stylesheet::new();
        sheet.add(".a", &[("gap", "1em")]);
        sheet.add(".b", &[("color", "red")]);
        sheet.add(".a", &[("gap", "2em"), ("flex-wrap", "nowrap")]);
        assert_eq!(sheet.to_css(), ".a{gap: 2em;flex-wrap: nowrap;}.b{color: red;}");
    }

    #[test]
    fn classes_for_vertical_flex_group() {
        let layout = Layout {
            orientation: Some("vertical".to_string()),
            justify_content: Some("center".to_string()),
            flex_wrap: Some("nowrap".to_string()),
            ..Layout::flex()
        };
        assert_eq!(
            layout_classes("core/group", &layout),
            vec![
                "is-layout-flex",
                "is-vertical",
                "is-content-justification-center",
                "is-nowrap",
                "wp-block-group-is-layout-flex",
            ]
        );
    }

    #[test]
    fn any_orientation_gets_a_class() {
        let layout = Layout {
            orientation: Some("horizontal".to_string()),
            ..Layout::flex()
        };
        assert_eq!(
            layout_classes("core/group", &layout),
            vec!["is-layout-flex", "is-horizontal", "wp-block-group-is-layout-flex"]
        );

        let layout = Layout {
            orientation: Some("vertical".to_string()),
            ..Layout::default()
        };
        assert_eq!(
            layout_classes("core/group", &layout),
            vec!["is-layout-flow", "is-vertical", "wp-block-group-is-layout-flow"]
        );
    }

    #[test]
    fn columns_get_vertical_alignment_class() {
        let layout = Layout {
            vertical_alignment: Some("top".to_string()),
            ..Layout::flex()
        };
        let classes = layout_classes("core/columns", &layout);
        assert!(classes.contains(&"are-vertically-aligned-top".to_string()));
        assert!(classes.contains(&"wp-block-columns-is-layout-flex".to_string()));
    }

    #[test]
    fn unknown_layout_has_no_classes() {
        let layout = Layout::from_value(&json!({"type": "masonry"})).unwrap();
        assert!(layout_classes("core/group", &layout).is_empty());
    }

    #[test]
    fn container_class_uses_full_block_name() {
        assert_eq!(
            container_class("core/group", 1),
            "wp-container-core-group-is-layout-1"
        );
        assert_eq!(
            container_class("acme/my block", 2),
            "wp-container-acme-myblock-is-layout-2"
        );
    }
}
