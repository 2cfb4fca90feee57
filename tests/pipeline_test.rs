//! End-to-end tests: backend export in, document record out.

use relayout::render::to_text;
use relayout::{
    reconstruct_file, reconstruct_str, CoordOrigin, DocumentRecord, DocumentStats, ItemType,
    JsonFormat, LayoutOptions, OutputFormat,
};

const FIXTURE: &str = include_str!("fixtures/two_column_form.json");

fn fixture_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/two_column_form.json")
}

fn record() -> DocumentRecord {
    reconstruct_str(FIXTURE).unwrap()
}

fn find<'a>(doc: &'a DocumentRecord, content: &str) -> &'a relayout::Item {
    doc.items
        .iter()
        .find(|i| i.content == content)
        .unwrap_or_else(|| panic!("no item with content {:?}", content))
}

#[test]
fn test_item_count_and_indices() {
    let doc = record();

    assert_eq!(doc.items.len(), 13);
    assert_eq!(doc.metadata.item_count, 13);
    for (i, item) in doc.items.iter().enumerate() {
        assert_eq!(item.index, i);
    }

    // Items without a page come first.
    assert_eq!(doc.items[0].content, "Footnote");
    assert_eq!(doc.items[0].page, 0);
    assert!(doc.items[0].bbox.is_none());
    assert_eq!(doc.items[1].content, "Quarterly Report");
}

#[test]
fn test_metadata() {
    let doc = record();

    assert_eq!(doc.metadata.source_file, "two_column_form.pdf");
    assert_eq!(doc.metadata.backend.as_deref(), Some("docling 2.5"));
    assert_eq!(doc.metadata.warnings, 1);
    assert_eq!(doc.metadata.table_count, 1);
    assert!(!doc.metadata.document_id.is_empty());
}

#[test]
fn test_boxes_are_top_left() {
    let doc = record();

    let header = find(&doc, "Quarterly Report");
    let bbox = header.bbox.as_ref().unwrap();
    assert_eq!(bbox.coord_origin, CoordOrigin::TopLeft);
    assert_eq!(bbox.top, 32.0);
    assert_eq!(bbox.bottom, 52.0);
    assert_eq!(bbox.height, 20.0);
    assert!(bbox.relative.is_some());

    for item in doc.items.iter().filter(|i| i.has_bbox()) {
        let bbox = item.bbox.as_ref().unwrap();
        assert!(bbox.left <= bbox.right, "{}", item.content);
        assert!(bbox.top <= bbox.bottom, "{}", item.content);
    }
}

#[test]
fn test_inverted_box_is_dropped() {
    let doc = record();

    let broken = find(&doc, "Broken");
    assert!(broken.bbox.is_none());
    assert_eq!(broken.page, 1);
    assert!(broken.reading_order().is_none());
    assert_eq!(doc.items.last().unwrap().content, "Broken");
}

#[test]
fn test_two_columns_detected() {
    let doc = record();

    assert_eq!(doc.pages.len(), 1);
    let page = &doc.pages[0];
    assert_eq!(page.page_number, 1);
    assert_eq!(page.width, 612.0);
    assert_eq!(page.columns, Some(2));
    assert_eq!(page.column_boundaries.as_deref(), Some(&[0.0, 212.5][..]));

    assert_eq!(find(&doc, "Revenue grew").attributes.column, Some(0));
    assert_eq!(find(&doc, "Costs fell").attributes.column, Some(1));
    assert_eq!(find(&doc, "_____").attributes.column, Some(1));
}

#[test]
fn test_reading_order_follows_rows_then_columns() {
    let doc = record();

    let mut ranked: Vec<&relayout::Item> =
        doc.items.iter().filter(|i| i.reading_order().is_some()).collect();
    ranked.sort_by_key(|i| i.reading_order());

    let keys: Vec<(i64, usize)> = ranked
        .iter()
        .map(|i| (i.attributes.row_band.unwrap(), i.attributes.column.unwrap()))
        .collect();
    assert!(keys.windows(2).all(|w| w[0] <= w[1]), "{:?}", keys);

    assert_eq!(find(&doc, "Quarterly Report").reading_order(), Some(0));
    assert_eq!(find(&doc, "Revenue grew").reading_order(), Some(1));
    assert_eq!(find(&doc, "Costs fell").reading_order(), Some(2));
    assert_eq!(find(&doc, "Margins improved").reading_order(), Some(3));
}

#[test]
fn test_fragments_merged() {
    let doc = record();

    let merged = find(&doc, "Invoice Number");
    assert_eq!(merged.index, 6);
    assert_eq!(merged.attributes.merged_from, Some(2));
    let bbox = merged.bbox.as_ref().unwrap();
    assert_eq!(bbox.left, 72.0);
    assert_eq!(bbox.right, 140.0);
    assert_eq!(bbox.top, 172.0);
    assert!(bbox.relative.is_some());

    assert!(doc.items.iter().all(|i| i.content != "Invoice" && i.content != "Number"));
    // Lines with wide gaps stay apart.
    find(&doc, "Revenue grew");
    find(&doc, "Costs fell");
}

#[test]
fn test_form_and_structure_types() {
    let doc = record();

    let label = find(&doc, "Date:");
    assert_eq!(label.item_type, ItemType::FormLabel);

    let field = find(&doc, "_____");
    assert_eq!(field.item_type, ItemType::FormField);

    let checkbox = find(&doc, "☑");
    assert_eq!(checkbox.item_type, ItemType::Checkbox);
    assert_eq!(checkbox.attributes.checked, Some(true));
    assert!((checkbox.confidence - 0.87).abs() < 1e-6);

    let header = find(&doc, "Quarterly Report");
    assert_eq!(header.item_type, ItemType::SectionHeader);
    assert_eq!(header.attributes.header_level, Some(1));
    let style = header.attributes.style.as_ref().unwrap();
    assert_eq!(style.bold, Some(true));
    assert_eq!(style.font_size, Some(18.0));

    let figure = find(&doc, "Figure 1: Trend");
    assert_eq!(figure.item_type, ItemType::Figure);
    assert_eq!(figure.attributes.caption.as_deref(), Some("Figure 1: Trend"));

    assert_eq!(find(&doc, "Footnote").item_type, ItemType::Text);
    assert_eq!(find(&doc, "Footnote").confidence, 1.0);
}

#[test]
fn test_table_record() {
    let doc = record();

    assert_eq!(doc.tables.len(), 1);
    let table = &doc.tables[0];
    assert_eq!(table.index, 10);
    assert_eq!(doc.items[10].item_type, ItemType::Table);

    assert_eq!(table.num_rows, 2);
    assert_eq!(table.num_cols, 2);
    assert_eq!(table.cells.len(), 4);
    assert_eq!(table.cell(1, 1).unwrap().content, "1.2M");
    assert_eq!(
        table.headers.as_deref(),
        Some(&["Quarter".to_string(), "Revenue".to_string()][..])
    );
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].cells, vec!["Q1", "1.2M"]);
}

#[test]
fn test_json_output_shape() {
    let doc = record();
    let json = OutputFormat::Json(JsonFormat::Compact).render(&doc).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["items"].as_array().unwrap().len(), 13);
    assert_eq!(value["items"][6]["type"], "Text");
    assert_eq!(value["items"][6]["attributes"]["merged_from"], 2);
    assert_eq!(value["items"][1]["bbox"]["coord_origin"], "TOPLEFT");
    assert_eq!(value["pages"][0]["columns"], 2);
    assert_eq!(value["tables"][0]["index"], 10);
    assert_eq!(value["tables"][0]["cells"][1]["col"], 1);
    assert_eq!(value["tables"][0]["cells"][1]["content"], "Revenue");
    assert!(value["items"][0].get("bbox").is_none());
}

#[test]
fn test_text_output_in_reading_order() {
    let text = to_text(&record()).unwrap();

    let expected = "Footnote\n\n\
        Quarterly Report\nRevenue grew\nCosts fell\nMargins improved\nOutlook stable\n\
        Invoice Number\nDate:\n_____\n☑\nFigure 1: Trend\nBroken\n";
    assert_eq!(text, expected);
}

#[test]
fn test_stats() {
    let stats = DocumentStats::from_document(&record());

    assert_eq!(stats.page_count, 1);
    assert_eq!(stats.item_count, 13);
    assert_eq!(stats.table_count, 1);
    assert_eq!(stats.multi_column_pages, 1);
    assert_eq!(stats.merged_items, 1);
    assert_eq!(stats.items_without_bbox, 2);
    assert_eq!(stats.form_items(), 3);
    assert_eq!(stats.count_of(ItemType::Figure), 1);
}

#[test]
fn test_without_merge_keeps_fragments() {
    let intake = relayout::JsonBackend::new().parse_str(FIXTURE).unwrap();
    let doc = relayout::reconstruct_intake(intake, LayoutOptions::default().without_merge());

    assert_eq!(doc.items.len(), 14);
    find(&doc, "Invoice");
    find(&doc, "Number");
    assert_eq!(doc.tables[0].index, 11);
}

#[test]
fn test_wide_column_gap_disables_columns() {
    let intake = relayout::JsonBackend::new().parse_str(FIXTURE).unwrap();
    let doc = relayout::reconstruct_intake(intake, LayoutOptions::default().with_column_gap(500.0));

    assert!(doc.pages[0].columns.is_none());
    assert!(doc.items.iter().all(|i| i.reading_order().is_none()));
}

#[test]
fn test_reconstruct_from_file() {
    let doc = reconstruct_file(fixture_path()).unwrap();

    assert_eq!(doc.metadata.file_name, "two_column_form.json");
    assert_eq!(doc.items.len(), 13);
}

#[test]
fn test_parallel_and_sequential_agree() {
    let parse = || relayout::JsonBackend::new().parse_str(FIXTURE).unwrap();
    let parallel = relayout::reconstruct_intake(parse(), LayoutOptions::default());
    let sequential = relayout::reconstruct_intake(parse(), LayoutOptions::default().sequential());

    assert_eq!(parallel.items, sequential.items);
    assert_eq!(parallel.tables, sequential.tables);
}

#[test]
fn test_mistyped_field_keeps_position() {
    let doc = reconstruct_str(
        r#"{"pages": [{"page_no": 1, "width": 612, "height": 792}],
            "items": [{"label": "text", "text": "Total due", "confidence": "high",
                       "prov": [{"page_no": 1, "bbox": {"l": 72, "t": 700, "r": 200, "b": 688,
                                 "coord_origin": "BOTTOMLEFT"}}]}]}"#,
    )
    .unwrap();

    let item = find(&doc, "Total due");
    assert_eq!(item.page, 1);
    let bbox = item.bbox.as_ref().unwrap();
    assert_eq!(bbox.top, 92.0);
    assert_eq!(bbox.left, 72.0);
    assert_eq!(doc.metadata.warnings, 1);
}
