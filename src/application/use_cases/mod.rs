pub mod extraction;
pub mod persistence;
pub mod pipeline;
pub mod reporting;
pub mod text_normalizer;
pub mod transformation;
