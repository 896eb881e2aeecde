use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

/// Whether a source file carries a table or running text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatFamily {
    Tabular,
    Document,
}

/// Input formats accepted at the intake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
    Pdf,
    Docx,
}

impl SourceFormat {
    /// Resolve the format from a path's extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = extension_of(path);
        match extension.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" => Ok(SourceFormat::Xlsx),
            "pdf" => Ok(SourceFormat::Pdf),
            "docx" => Ok(SourceFormat::Docx),
            _ => Err(AppError::UnsupportedFormat(unsupported_message(&extension))),
        }
    }

    pub fn family(self) -> FormatFamily {
        match self {
            SourceFormat::Csv | SourceFormat::Xlsx => FormatFamily::Tabular,
            SourceFormat::Pdf | SourceFormat::Docx => FormatFamily::Document,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceFormat::Csv => "CSV",
            SourceFormat::Xlsx => "XLSX",
            SourceFormat::Pdf => "PDF",
            SourceFormat::Docx => "DOCX",
        };
        f.write_str(label)
    }
}

/// Destination formats for a cleaned dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    #[default]
    Csv,
    Xlsx,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = extension_of(path);
        match extension.as_str() {
            "csv" => Ok(TableFormat::Csv),
            "xlsx" => Ok(TableFormat::Xlsx),
            _ => Err(AppError::UnsupportedFormat(unsupported_message(&extension))),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Xlsx => "xlsx",
        }
    }
}

/// How PDF and DOCX sources are read by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentMode {
    /// Paragraphs and word statistics
    #[default]
    Text,
    /// First table of the document
    Table,
}

pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}

fn unsupported_message(extension: &str) -> String {
    if extension.is_empty() {
        "file has no extension".to_string()
    } else {
        format!("extension '.{}' is not supported", extension)
    }
}
