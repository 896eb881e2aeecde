// ============================================================
// XLSX INFRASTRUCTURE LAYER
// ============================================================
// Workbook reading (calamine) and writing (quick-xml parts in a zip container)

mod reader;
mod writer;

pub use reader::read_first_sheet;
pub use writer::write_xlsx;
