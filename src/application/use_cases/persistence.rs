// ============================================================
// PERSISTENCE
// ============================================================
// Cleaned tables and text analyses to the output directory

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{info, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::format::{extension_of, TableFormat};
use crate::domain::table::Dataset;
use crate::domain::text_analysis::TextAnalysis;
use crate::infrastructure::csv::write_csv;
use crate::infrastructure::storage::ensure_parent_dir;
use crate::infrastructure::xlsx::write_xlsx;

const JSON_INDENT: &[u8] = b"    ";

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// Nothing to write
    Skipped(String),
}

/// Write a cleaned dataset; the destination extension picks CSV or XLSX.
pub fn save_table(dataset: Option<&Dataset>, path: &Path) -> Result<SaveOutcome> {
    let Some(dataset) = dataset else {
        warn!(path = %path.display(), "No dataset to save");
        return Ok(SaveOutcome::Skipped("no dataset to save".to_string()));
    };

    let format = TableFormat::from_path(path)?;
    ensure_parent_dir(path)?;

    match format {
        TableFormat::Csv => write_csv(dataset, path)?,
        TableFormat::Xlsx => write_xlsx(dataset, path)?,
    }

    info!(path = %path.display(), rows = dataset.len(), "Dataset saved");
    Ok(SaveOutcome::Saved(path.to_path_buf()))
}

/// Write a text analysis as pretty JSON (4-space indent, UTF-8 as-is).
pub fn save_text_analysis(analysis: Option<&TextAnalysis>, path: &Path) -> Result<SaveOutcome> {
    let Some(analysis) = analysis else {
        warn!(path = %path.display(), "No text analysis to save");
        return Ok(SaveOutcome::Skipped("no text analysis to save".to_string()));
    };

    if extension_of(path) != "json" {
        return Err(AppError::UnsupportedFormat(format!(
            "text analysis must be written as .json, got {}",
            path.display()
        )));
    }
    ensure_parent_dir(path)?;

    let file = File::create(path).map_err(|e| write_error(path, e))?;
    let mut writer = BufWriter::new(file);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(JSON_INDENT));
    analysis
        .serialize(&mut serializer)
        .map_err(|e| write_error(path, e))?;
    writer.flush().map_err(|e| write_error(path, e))?;

    info!(path = %path.display(), paragraphs = analysis.paragraphs.len(), "Text analysis saved");
    Ok(SaveOutcome::Saved(path.to_path_buf()))
}

fn write_error(path: &Path, err: impl std::fmt::Display) -> AppError {
    AppError::WriteError(format!("{}: {}", path.display(), err))
}
