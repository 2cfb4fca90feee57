//! Document model types for reconstructed layout.
//!
//! These are the output types of the pipeline: one [`DocumentRecord`] per
//! input, holding pages, items in reading-friendly order, and tables. All of
//! them serialize to the JSON shape consumed by downstream renderers.

mod bbox;
mod document;
mod item;
mod page;
mod table;

pub use bbox::{BoundingBox, CoordOrigin, PageSize, RelativeBox};
pub use document::{DocumentRecord, Metadata};
pub use item::{FieldType, FormType, Item, ItemAttributes, ItemType, TextStyle};
pub use page::PageInfo;
pub use table::{CellRect, TableCell, TableRecord, TableRow};
