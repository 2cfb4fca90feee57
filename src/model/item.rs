//! Item-level types.

use super::BoundingBox;
use serde::{Deserialize, Serialize};

/// Semantic type of an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// Running text
    Text,
    /// A form label ("Name:")
    FormLabel,
    /// A blank to be filled in ("______")
    FormField,
    /// A checkbox glyph
    Checkbox,
    /// A heading
    SectionHeader,
    /// An entry of a list
    ListItem,
    /// A picture or figure
    Figure,
    /// A table
    Table,
    /// Anything the backend labelled in a way we do not know
    #[default]
    Unknown,
}

impl ItemType {
    /// Map a backend kind label (e.g. `"SectionHeaderItem"`, `"list_item"`) to a type.
    pub fn from_backend_label(label: &str) -> Self {
        let normalized: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        let key = match normalized.strip_suffix("item") {
            Some(rest) if !rest.is_empty() => rest,
            _ => normalized.as_str(),
        };

        match key {
            "text" | "paragraph" | "caption" | "footnote" | "pageheader" | "pagefooter"
            | "code" | "formula" => ItemType::Text,
            "title" | "sectionheader" | "heading" | "header" => ItemType::SectionHeader,
            "list" => ItemType::ListItem,
            "figure" | "picture" | "image" => ItemType::Figure,
            "table" => ItemType::Table,
            "formlabel" => ItemType::FormLabel,
            "formfield" | "field" => ItemType::FormField,
            "checkbox" | "checkboxselected" | "checkboxunselected" => ItemType::Checkbox,
            _ => ItemType::Unknown,
        }
    }

    /// Check if this item carries form semantics.
    pub fn is_form(&self) -> bool {
        matches!(
            self,
            ItemType::FormLabel | ItemType::FormField | ItemType::Checkbox
        )
    }
}

/// Role of a form label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    Label,
}

/// Kind of input a blank form field expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    TextInput,
}

/// Font information resolved from the backend's style sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub italic: Option<bool>,
}

impl TextStyle {
    /// No field has been resolved.
    pub fn is_empty(&self) -> bool {
        self.font.is_none() && self.font_size.is_none() && self.bold.is_none() && self.italic.is_none()
    }
}

/// Derived per-item fields.
///
/// Layout fields (`column`, `row_band`, `reading_order`) are filled by the
/// page passes; the rest by the classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemAttributes {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub row_band: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reading_order: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub style: Option<TextStyle>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub form_type: Option<FormType>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub possible_form_field: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub field_type: Option<FieldType>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub marker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub list_level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub caption: Option<String>,

    /// Number of fragments this item was merged from.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub merged_from: Option<usize>,
}

/// One atomic content unit of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Position in the final item sequence
    pub index: usize,

    /// Semantic type
    #[serde(rename = "type")]
    pub item_type: ItemType,

    /// Structural nesting level reported by the backend
    pub level: u32,

    /// Normalized text content
    pub content: String,

    /// Canonical bounding box, absent when the backend gave no usable geometry
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bbox: Option<BoundingBox>,

    /// Page number (1-indexed, 0 when the backend did not place the item)
    pub page: u32,

    /// Backend confidence in `0.0..=1.0`
    pub confidence: f32,

    /// Derived attributes
    pub attributes: ItemAttributes,
}

impl Item {
    /// Create a text item with no geometry.
    pub fn new(content: impl Into<String>, page: u32) -> Self {
        Self {
            index: 0,
            item_type: ItemType::Text,
            level: 0,
            content: content.into(),
            bbox: None,
            page,
            confidence: 1.0,
            attributes: ItemAttributes::default(),
        }
    }

    /// Set the bounding box and return self.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Set the type and return self.
    pub fn with_type(mut self, item_type: ItemType) -> Self {
        self.item_type = item_type;
        self
    }

    /// Check if the item has spatial data.
    pub fn has_bbox(&self) -> bool {
        self.bbox.is_some()
    }

    /// Reading-order rank, if the page passes assigned one.
    pub fn reading_order(&self) -> Option<usize> {
        self.attributes.reading_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_labels() {
        assert_eq!(ItemType::from_backend_label("TextItem"), ItemType::Text);
        assert_eq!(
            ItemType::from_backend_label("SectionHeaderItem"),
            ItemType::SectionHeader
        );
        assert_eq!(ItemType::from_backend_label("section_header"), ItemType::SectionHeader);
        assert_eq!(ItemType::from_backend_label("ListItem"), ItemType::ListItem);
        assert_eq!(ItemType::from_backend_label("list_item"), ItemType::ListItem);
        assert_eq!(ItemType::from_backend_label("PictureItem"), ItemType::Figure);
        assert_eq!(ItemType::from_backend_label("TableItem"), ItemType::Table);
        assert_eq!(ItemType::from_backend_label("Checkbox"), ItemType::Checkbox);
        assert_eq!(ItemType::from_backend_label("mystery"), ItemType::Unknown);
        assert_eq!(ItemType::from_backend_label("Item"), ItemType::Unknown);
    }

    #[test]
    fn test_attributes_skip_absent_fields() {
        let item = Item::new("Hello", 1);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "Text");
        assert!(json.get("bbox").is_none());
        assert_eq!(json["attributes"], serde_json::json!({}));
    }

    #[test]
    fn test_style_is_empty() {
        assert!(TextStyle::default().is_empty());
        let style = TextStyle {
            bold: Some(true),
            ..Default::default()
        };
        assert!(!style.is_empty());
    }

    #[test]
    fn test_form_types() {
        assert!(ItemType::Checkbox.is_form());
        assert!(!ItemType::Text.is_form());
        assert_eq!(
            serde_json::to_string(&FieldType::TextInput).unwrap(),
            "\"text_input\""
        );
    }
}
