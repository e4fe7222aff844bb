// ============================================================
// TABULAR DOMAIN LAYER
// ============================================================
// In-memory table loaded from an upload and annotated in place
// No I/O, no external formats

mod cell_value;
mod document;

pub use cell_value::CellValue;
pub use document::{Column, TablePreview, TabularDocument};
