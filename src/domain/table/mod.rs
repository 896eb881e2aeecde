// ============================================================
// TABLE DOMAIN LAYER
// ============================================================
// Core types for extracted and cleaned tabular data
// No I/O, no external dependencies

mod canonical;
mod dataset;
mod value;

pub use canonical::{CanonicalColumn, ColumnKind, NOT_INFORMED};
pub use dataset::Dataset;
pub use value::Value;
