//! Item classification heuristics.
//!
//! Rules run on trimmed, NFC-normalized content in a fixed order and the
//! first match wins:
//!
//! 1. content ending with `:` is a form label
//! 2. a lone checkbox glyph is a checkbox
//! 3. content mentioning a field name (`date:`, `no.`, ...) is a possible form field
//! 4. a run of `_` or `-` is a blank text input
//!
//! Anything else keeps the type the backend declared.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::backend::{IntakeItem, StyleHint};
use crate::model::{FieldType, FormType, Item, ItemType, TextStyle};

const CHECKBOX_GLYPHS: &[&str] = &["[ ]", "[X]", "[x]", "☐", "☑", "□", "■", "▢", "▣"];

const CHECKED_GLYPHS: &[&str] = &["[X]", "[x]", "☑", "■", "▣"];

const FIELD_INDICATORS: &[&str] = &[
    "name:",
    "date:",
    "address:",
    "phone:",
    "email:",
    "signature:",
    "id:",
    "no.",
    "number:",
    "title:",
    "ssn:",
    "dob:",
    "zip:",
];

/// Deepest heading level.
const MAX_HEADER_LEVEL: u32 = 6;

/// Trim and NFC-normalize raw backend text.
pub fn normalize_content(raw: &str) -> String {
    raw.trim().nfc().collect()
}

/// Apply the classification rules to `item.content`.
///
/// Returns `true` when a rule matched and the declared type was overridden.
pub fn classify(item: &mut Item) -> bool {
    let content = item.content.as_str();
    let attrs = &mut item.attributes;

    if content.ends_with(':') {
        item.item_type = ItemType::FormLabel;
        attrs.form_type = Some(FormType::Label);
        return true;
    }

    if CHECKBOX_GLYPHS.contains(&content) {
        item.item_type = ItemType::Checkbox;
        attrs.checked = Some(CHECKED_GLYPHS.contains(&content));
        return true;
    }

    let lower = content.to_lowercase();
    if FIELD_INDICATORS.iter().any(|ind| lower.contains(ind)) {
        item.item_type = ItemType::FormLabel;
        attrs.possible_form_field = Some(true);
        return true;
    }

    if is_underline(content) {
        item.item_type = ItemType::FormField;
        attrs.field_type = Some(FieldType::TextInput);
        return true;
    }

    false
}

/// A non-empty run of one underline character.
fn is_underline(content: &str) -> bool {
    let mut chars = content.chars();
    match chars.next() {
        Some(first @ ('_' | '-')) => chars.all(|c| c == first),
        _ => false,
    }
}

/// Add the attributes that depend on the backend-declared type.
pub fn add_type_attributes(item: &mut Item, declared: ItemType, intake: &IntakeItem) {
    let attrs = &mut item.attributes;
    match declared {
        ItemType::SectionHeader => {
            attrs.header_level = Some(header_level(intake.level));
        }
        ItemType::ListItem => {
            let marker = intake
                .marker
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .or_else(|| detect_list_marker(&item.content));
            attrs.marker = Some(marker.unwrap_or_default());
            attrs.list_level = Some(intake.list_level.unwrap_or(intake.level));
        }
        ItemType::Figure => {
            attrs.caption = Some(
                intake
                    .caption
                    .as_deref()
                    .map(normalize_content)
                    .unwrap_or_default(),
            );
        }
        _ => {}
    }
}

/// Heading level for a structural nesting level, capped at 6.
pub fn header_level(level: u32) -> u8 {
    (level.saturating_add(1)).min(MAX_HEADER_LEVEL) as u8
}

fn list_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([-*•◦▪·‣]|\(?[0-9]{1,3}[.)]|\(?[a-zA-Z][.)])\s+").unwrap()
    })
}

/// Leading list marker of `content` (`"1."`, `"•"`, `"a)"`), if any.
pub fn detect_list_marker(content: &str) -> Option<String> {
    list_marker_regex()
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Resolve font information from style hints, first hint with a value wins per field.
pub fn resolve_style(hints: &[StyleHint]) -> Option<TextStyle> {
    let mut style = TextStyle::default();

    for hint in hints {
        if style.font.is_none() {
            style.font = hint.font.clone().filter(|f| !f.trim().is_empty());
        }
        if style.font_size.is_none() {
            style.font_size = hint.font_size.filter(|s| s.is_finite() && *s > 0.0);
        }
        if style.bold.is_none() {
            style.bold = hint.bold;
        }
        if style.italic.is_none() {
            style.italic = hint.italic;
        }
    }

    if style.is_empty() {
        None
    } else {
        Some(style)
    }
}
