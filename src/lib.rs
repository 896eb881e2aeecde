mod application;
mod domain;
mod infrastructure;
mod interfaces;

pub use application::{ExtractionUseCase, PipelineOrchestrator, RunReport, TransformationPipeline};
pub use domain::error::{AppError, Result};
pub use domain::table::{Dataset, Value};
pub use infrastructure::config::{AppConfig, ConfigOverrides};
pub use interfaces::cli::Cli;

use std::process::ExitCode;

use clap::Parser;

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    interfaces::cli::run(&cli)
}
