//! Document assembly.
//!
//! The assembler is the only stage with cross-page state. It runs in two
//! phases:
//!
//! 1. every backend item becomes an [`Item`] independently (coordinates
//!    normalized, type classified, style resolved);
//! 2. items are grouped by page and the page passes run per page, in
//!    parallel when enabled. Results are collected in page order and only
//!    then are final indices assigned, by a single writer.

use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;

use crate::backend::{IntakeDocument, IntakeItem, ItemOutcome, TableSource};
use crate::layout::classify::{add_type_attributes, classify, normalize_content, resolve_style};
use crate::layout::{
    assemble_table, normalize_box, process_page, LayoutOptions, MergedItem, PageFrame,
};
use crate::model::{DocumentRecord, Item, ItemAttributes, ItemType, Metadata, PageInfo, PageSize};

/// Page number given to items the backend did not place on a page.
pub const UNPLACED_PAGE: u32 = 0;

/// Builds [`DocumentRecord`]s from backend intake.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler {
    options: LayoutOptions,
}

/// A page known to the assembler.
#[derive(Debug, Clone)]
struct PageSlot {
    info: PageInfo,
    /// Dimensions came from the backend rather than the Letter default
    known: bool,
}

/// One page's items after phase 1.
#[derive(Debug, Default)]
struct PageBucket {
    items: Vec<Item>,
    tables: Vec<Option<TableSource>>,
}

/// One page's items after phase 2.
struct PageResult {
    page_number: u32,
    info: Option<PageInfo>,
    items: Vec<MergedItem>,
    tables: Vec<Option<TableSource>>,
}

impl DocumentAssembler {
    /// Create an assembler with the given options.
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Assemble a document record for `source`.
    pub fn assemble(&self, source: impl Into<String>, intake: IntakeDocument) -> DocumentRecord {
        let started = Instant::now();
        let source = source.into();
        let mut warnings = 0usize;

        let mut pages = describe_pages(&intake);

        // Phase 1: independent per-item derivation.
        let mut buckets: BTreeMap<u32, PageBucket> = BTreeMap::new();
        for (position, outcome) in intake.items.into_iter().enumerate() {
            let (raw, warning) = match outcome {
                ItemOutcome::Complete(item) => (item, None),
                ItemOutcome::Partial { item, warning } => (item, Some(warning)),
                ItemOutcome::Failed { warning } => {
                    log::warn!("Dropping item {}: {}", position, warning);
                    warnings += 1;
                    continue;
                }
            };
            if let Some(warning) = warning {
                log::warn!("Item {} only partially decoded: {}", position, warning);
                warnings += 1;
            }

            let page_number = raw.page().unwrap_or(UNPLACED_PAGE);
            if page_number != UNPLACED_PAGE && !pages.contains_key(&page_number) {
                pages.insert(page_number, fallback_page(page_number, &raw));
            }
            let frame = page_frame(&raw, pages.get(&page_number));

            let (item, invalid_bbox) = build_item(position, &raw, page_number, frame);
            if invalid_bbox {
                warnings += 1;
            }

            let has_table = raw.table.is_some() || item_is_table(&raw);
            let bucket = buckets.entry(page_number).or_default();
            bucket.items.push(item);
            bucket.tables.push(if has_table {
                Some(raw.table.unwrap_or_default())
            } else {
                None
            });
        }

        if pages.is_empty() {
            pages.insert(1, PageSlot {
                info: PageInfo::letter(1),
                known: false,
            });
        }

        // Phase 2: page passes.
        let work: Vec<(u32, PageBucket, Option<PageSlot>)> = buckets
            .into_iter()
            .map(|(number, bucket)| (number, bucket, pages.get(&number).cloned()))
            .collect();

        let run = |(number, bucket, slot): (u32, PageBucket, Option<PageSlot>)| {
            run_page(number, bucket, slot, &self.options)
        };
        let results: Vec<PageResult> = if self.options.parallel && work.len() > 1 {
            work.into_par_iter().map(run).collect()
        } else {
            work.into_iter().map(run).collect()
        };

        // Single writer: indices, page metadata and tables.
        let mut items = Vec::new();
        let mut tables = Vec::new();
        for result in results {
            if let (Some(info), Some(slot)) = (result.info, pages.get_mut(&result.page_number)) {
                slot.info = info;
            }

            let mut page_tables = result.tables;
            for merged in result.items {
                let index = items.len();
                let mut item = merged.item;
                item.index = index;

                for &member in &merged.members {
                    if let Some(source) = page_tables.get_mut(member).and_then(Option::take) {
                        tables.push(assemble_table(index, Some(&source)));
                    }
                }
                items.push(item);
            }
        }

        let mut metadata = Metadata::for_source(source);
        metadata.item_count = items.len();
        metadata.table_count = tables.len();
        metadata.backend = intake.backend;
        metadata.warnings = warnings;
        metadata.processing_time = started.elapsed().as_secs_f64();

        log::info!(
            "Assembled {}: {} pages, {} items, {} tables, {} warnings in {:.3}s",
            metadata.file_name,
            pages.len(),
            metadata.item_count,
            metadata.table_count,
            metadata.warnings,
            metadata.processing_time
        );

        DocumentRecord {
            metadata,
            pages: pages.into_values().map(|slot| slot.info).collect(),
            items,
            tables,
        }
    }
}

/// Page list from the backend's page descriptions, keyed by page number.
fn describe_pages(intake: &IntakeDocument) -> BTreeMap<u32, PageSlot> {
    let mut pages = BTreeMap::new();
    for page in &intake.pages {
        let slot = match page.known_size() {
            Some(size) => PageSlot {
                info: PageInfo::new(page.page_number, size.width, size.height),
                known: true,
            },
            None => PageSlot {
                info: PageInfo::letter(page.page_number),
                known: false,
            },
        };
        pages.entry(page.page_number).or_insert(slot);
    }
    pages
}

/// Page for a number the backend never described, sized from the item's
/// provenance when it carries a page size.
fn fallback_page(page_number: u32, item: &IntakeItem) -> PageSlot {
    log::debug!("Page {} not described by backend, adding it", page_number);
    match provenance_size(item) {
        Some(size) => PageSlot {
            info: PageInfo::new(page_number, size.width, size.height),
            known: true,
        },
        None => PageSlot {
            info: PageInfo::letter(page_number),
            known: false,
        },
    }
}

fn provenance_size(item: &IntakeItem) -> Option<PageSize> {
    item.provenance
        .as_ref()
        .and_then(|p| p.page_size)
        .filter(PageSize::is_usable)
}

/// Provenance page size first, then the backend page, then US-Letter.
fn page_frame(item: &IntakeItem, slot: Option<&PageSlot>) -> PageFrame {
    if let Some(size) = provenance_size(item) {
        return PageFrame::known(size);
    }
    match slot {
        Some(slot) if slot.known => PageFrame::known(slot.info.size()),
        Some(slot) => PageFrame {
            flip_height: slot.info.height,
            known: None,
        },
        None => PageFrame::unknown(),
    }
}

fn declared_type(item: &IntakeItem) -> ItemType {
    let declared = item
        .kind
        .as_deref()
        .map(ItemType::from_backend_label)
        .unwrap_or_default();
    if declared == ItemType::Unknown && item.table.is_some() {
        ItemType::Table
    } else {
        declared
    }
}

fn item_is_table(item: &IntakeItem) -> bool {
    declared_type(item) == ItemType::Table
}

/// Phase-1 derivation of one item. The flag reports a discarded invalid bbox.
fn build_item(position: usize, raw: &IntakeItem, page: u32, frame: PageFrame) -> (Item, bool) {
    let declared = declared_type(raw);
    let mut invalid_bbox = false;

    let bbox = raw
        .provenance
        .as_ref()
        .and_then(|p| p.bbox.as_ref())
        .and_then(|b| match normalize_box(b, frame) {
            Ok(bbox) => Some(bbox),
            Err(e) if e.is_invalid_geometry() => {
                log::warn!("Invalid bbox for item {}: {}", position, e);
                invalid_bbox = true;
                None
            }
            Err(e) => {
                log::debug!("No bbox for item {}: {}", position, e);
                None
            }
        });

    let confidence = match raw.confidence {
        Some(c) if c.is_finite() => c.clamp(0.0, 1.0),
        _ => 1.0,
    };

    let mut item = Item {
        index: position,
        item_type: declared,
        level: raw.level,
        content: normalize_content(raw.content()),
        bbox,
        page,
        confidence,
        attributes: ItemAttributes::default(),
    };

    classify(&mut item);
    add_type_attributes(&mut item, declared, raw);
    item.attributes.style = resolve_style(&raw.style_hints);

    (item, invalid_bbox)
}

fn run_page(
    page_number: u32,
    bucket: PageBucket,
    slot: Option<PageSlot>,
    options: &LayoutOptions,
) -> PageResult {
    let PageBucket { items, tables } = bucket;

    match slot {
        Some(slot) if page_number != UNPLACED_PAGE => {
            let layout = process_page(slot.info, items, slot.known, options);
            PageResult {
                page_number,
                info: Some(layout.page),
                items: layout.items,
                tables,
            }
        }
        _ => PageResult {
            page_number,
            info: None,
            items: items
                .into_iter()
                .enumerate()
                .map(|(pos, item)| MergedItem {
                    item,
                    members: vec![pos],
                })
                .collect(),
            tables,
        },
    }
}
