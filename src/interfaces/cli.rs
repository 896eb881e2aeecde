// ============================================================
// COMMAND LINE INTERFACE
// ============================================================

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::application::{PipelineOrchestrator, RunReport};
use crate::application::use_cases::pipeline::FileOutcome;
use crate::domain::error::Result;
use crate::domain::format::{DocumentMode, TableFormat};
use crate::infrastructure::config::{AppConfig, ConfigOverrides};

#[derive(Parser, Debug, Default)]
#[command(name = "docflow")]
#[command(about = "Extract, clean and report on the business documents of an intake directory")]
#[command(version)]
pub struct Cli {
    /// TOML configuration file (default: docflow.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory scanned for source files
    #[arg(long)]
    pub intake: Option<PathBuf>,

    /// Directory receiving cleaned tables and text analyses
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Directory receiving charts
    #[arg(long)]
    pub charts: Option<PathBuf>,

    /// Cleaned table format
    #[arg(long, value_parser = parse_table_format)]
    pub table_format: Option<TableFormat>,

    /// Read PDF/DOCX files as text or as their first table
    #[arg(long, value_parser = parse_document_mode)]
    pub document_mode: Option<DocumentMode>,

    /// Log filter directive, e.g. `debug` or `docflow_lib=trace`
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            intake_dir: self.intake.clone(),
            output_dir: self.output.clone(),
            charts_dir: self.charts.clone(),
            table_format: self.table_format,
            document_mode: self.document_mode,
            log_filter: self.log_level.clone(),
        }
    }
}

fn parse_table_format(value: &str) -> std::result::Result<TableFormat, String> {
    match value.to_ascii_lowercase().as_str() {
        "csv" => Ok(TableFormat::Csv),
        "xlsx" => Ok(TableFormat::Xlsx),
        other => Err(format!("expected csv or xlsx, got '{}'", other)),
    }
}

fn parse_document_mode(value: &str) -> std::result::Result<DocumentMode, String> {
    match value.to_ascii_lowercase().as_str() {
        "text" => Ok(DocumentMode::Text),
        "table" => Ok(DocumentMode::Table),
        other => Err(format!("expected text or table, got '{}'", other)),
    }
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load configuration, run the batch and print its report.
pub fn run(cli: &Cli) -> ExitCode {
    let _ = dotenvy::dotenv();

    let config = match AppConfig::load(cli.config.as_deref(), &cli.overrides()) {
        Ok(config) => config,
        Err(err) => {
            init_tracing("info");
            error!(error = %err, "Run halted");
            eprintln!("{}", err);
            return ExitCode::from(1);
        }
    };
    init_tracing(&config.log_filter);

    match execute(&config) {
        Ok(report) => {
            print_report(&report, &config);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::from(1)
        }
    }
}

fn execute(config: &AppConfig) -> Result<RunReport> {
    PipelineOrchestrator::new(config.clone()).run()
}

fn print_report(report: &RunReport, config: &AppConfig) {
    for file in &report.files {
        if let FileOutcome::Processed {
            summary: Some(summary),
            ..
        } = &file.outcome
        {
            println!("\n{}", file.file.display());
            println!("{}", summary.render(&config.currency_symbol));
        }
    }
    println!("\n{}", report);
}
