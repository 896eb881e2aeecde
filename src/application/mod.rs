pub mod use_cases;

pub use use_cases::extraction::ExtractionUseCase;
pub use use_cases::pipeline::{PipelineOrchestrator, RunReport};
pub use use_cases::transformation::TransformationPipeline;
