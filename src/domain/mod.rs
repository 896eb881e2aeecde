pub mod error;
pub mod format;
pub mod text_analysis;

// Tabular data model
pub mod table;
