// ============================================================
// PIPELINE ORCHESTRATOR
// ============================================================
// Scan the intake directory and drive every file through
// extraction -> transformation -> reporting -> persistence

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::application::use_cases::extraction::{Extracted, ExtractionUseCase};
use crate::application::use_cases::persistence::{save_table, save_text_analysis, SaveOutcome};
use crate::application::use_cases::reporting::{generate_charts, ChartOutcome, ExecutiveSummary};
use crate::application::use_cases::text_normalizer;
use crate::application::use_cases::transformation::TransformationPipeline;
use crate::domain::error::{AppError, Result};
use crate::domain::table::Dataset;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::storage::{derived_output_path, ensure_dir, list_intake_files};

const TABLE_SUFFIX: &str = "_tratado";
const TEXT_SUFFIX: &str = "_texto";

/// Result of processing one intake file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Processed {
        outputs: Vec<PathBuf>,
        summary: Option<ExecutiveSummary>,
        /// Partial failures that did not stop the file, e.g. a chart write
        problems: Vec<String>,
    },
    Skipped {
        reason: String,
    },
    Failed {
        error: AppError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub file: PathBuf,
    pub outcome: FileOutcome,
}

/// Every file of a batch, in processing order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn processed(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Processed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.files {
            let name = report
                .file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| report.file.display().to_string());

            match &report.outcome {
                FileOutcome::Processed {
                    outputs, problems, ..
                } => {
                    let outputs: Vec<String> =
                        outputs.iter().map(|path| path.display().to_string()).collect();
                    writeln!(f, "processed  {} -> {}", name, outputs.join(", "))?;
                    for problem in problems {
                        writeln!(f, "           ! {}", problem)?;
                    }
                }
                FileOutcome::Skipped { reason } => writeln!(f, "skipped    {} ({})", name, reason)?,
                FileOutcome::Failed { error } => writeln!(f, "failed     {} ({})", name, error)?,
            }
        }
        write!(
            f,
            "{} processed, {} skipped, {} failed",
            self.processed(),
            self.skipped(),
            self.failed()
        )
    }
}

pub struct PipelineOrchestrator {
    config: AppConfig,
    extraction: ExtractionUseCase,
    transformation: TransformationPipeline,
}

impl PipelineOrchestrator {
    pub fn new(config: AppConfig) -> Self {
        Self {
            extraction: ExtractionUseCase::new(&config),
            transformation: TransformationPipeline::new(),
            config,
        }
    }

    /// Process every intake file in name order. Only a missing or empty
    /// intake directory (or an unusable output directory) stops the batch.
    pub fn run(&self) -> Result<RunReport> {
        let files = list_intake_files(&self.config.intake_dir).map_err(|e| {
            error!(error = %e, "Run halted");
            e
        })?;
        ensure_dir(&self.config.output_dir)?;

        info!(
            files = files.len(),
            intake = %self.config.intake_dir.display(),
            "Starting batch"
        );

        let mut report = RunReport::default();
        for file in files {
            let outcome = self.process_file(&file);
            match &outcome {
                FileOutcome::Processed { .. } => info!(file = %file.display(), "File processed"),
                FileOutcome::Skipped { reason } => {
                    warn!(file = %file.display(), reason = %reason, "File skipped")
                }
                FileOutcome::Failed { error } => {
                    error!(file = %file.display(), error = %error, "File failed")
                }
            }
            report.files.push(FileReport { file, outcome });
        }

        info!(
            processed = report.processed(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Batch finished"
        );
        Ok(report)
    }

    /// Run one file through the pipeline. Never fails; errors become the
    /// outcome.
    pub fn process_file(&self, path: &Path) -> FileOutcome {
        info!(file = %path.display(), "Processing file");

        let result = match self.extraction.extract(path) {
            Ok(Extracted::Table(dataset)) => self.process_table(path, Some(dataset)),
            Ok(Extracted::Paragraphs(paragraphs)) => self.process_text(path, &paragraphs),
            Err(e) => Err(e),
        };

        match result {
            Ok(outcome) => outcome,
            Err(AppError::UnsupportedFormat(reason)) => FileOutcome::Skipped { reason },
            Err(error) => FileOutcome::Failed { error },
        }
    }

    fn process_table(&self, path: &Path, dataset: Option<Dataset>) -> Result<FileOutcome> {
        let Some((cleaned, _)) = self.transformation.run(dataset) else {
            return Ok(FileOutcome::Skipped {
                reason: "no dataset extracted".to_string(),
            });
        };

        let destination = derived_output_path(
            &self.config.output_dir,
            path,
            TABLE_SUFFIX,
            self.config.table_format.extension(),
        );
        let mut outputs = Vec::new();
        if let SaveOutcome::Saved(saved) = save_table(Some(&cleaned), &destination)? {
            outputs.push(saved);
        }

        let mut problems = Vec::new();
        for chart in generate_charts(&cleaned, &self.config.charts_dir()) {
            match chart {
                ChartOutcome::Written(chart_path) => outputs.push(chart_path),
                ChartOutcome::Failed { title, error } => {
                    problems.push(format!("chart '{}' failed: {}", title, error))
                }
                ChartOutcome::Skipped { .. } => {}
            }
        }

        let summary = ExecutiveSummary::build(Some(&cleaned));
        if summary.is_none() {
            info!(file = %path.display(), "Nothing to summarize");
        }

        Ok(FileOutcome::Processed {
            outputs,
            summary,
            problems,
        })
    }

    fn process_text(&self, path: &Path, paragraphs: &[String]) -> Result<FileOutcome> {
        let analysis = text_normalizer::analyze(paragraphs);
        if analysis.paragraphs.is_empty() {
            return Err(AppError::EmptyContent(format!(
                "{} has no words after cleaning",
                path.display()
            )));
        }

        let destination = derived_output_path(&self.config.output_dir, path, TEXT_SUFFIX, "json");
        let outputs = match save_text_analysis(Some(&analysis), &destination)? {
            SaveOutcome::Saved(saved) => vec![saved],
            SaveOutcome::Skipped(_) => Vec::new(),
        };

        Ok(FileOutcome::Processed {
            outputs,
            summary: None,
            problems: Vec::new(),
        })
    }
}
