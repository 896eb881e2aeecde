// ============================================================
// EXTRACTION USE CASE
// ============================================================
// Resolve a source file's format and route it to the matching reader

use std::path::Path;

use tracing::{debug, info};

use crate::domain::error::{AppError, Result};
use crate::domain::format::{DocumentMode, FormatFamily, SourceFormat};
use crate::domain::table::Dataset;
use crate::infrastructure::config::AppConfig;

mod parsers;

/// What a source file yielded
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Table(Dataset),
    Paragraphs(Vec<String>),
}

pub struct ExtractionUseCase {
    delimiter: u8,
    detect_delimiter: bool,
    fallback_encoding: Option<String>,
    document_mode: DocumentMode,
}

impl Default for ExtractionUseCase {
    fn default() -> Self {
        Self {
            delimiter: b',',
            detect_delimiter: false,
            fallback_encoding: None,
            document_mode: DocumentMode::Text,
        }
    }
}

impl ExtractionUseCase {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            delimiter: config.delimiter_byte(),
            detect_delimiter: config.detect_delimiter,
            fallback_encoding: config.fallback_encoding.clone(),
            document_mode: config.document_mode,
        }
    }

    /// Extract a file according to its family and the configured document
    /// mode: tabular sources always give a table, PDF/DOCX give paragraphs
    /// unless table mode is on.
    pub fn extract(&self, path: &Path) -> Result<Extracted> {
        let format = self.resolve(path)?;

        match (format.family(), self.document_mode) {
            (FormatFamily::Tabular, _) | (FormatFamily::Document, DocumentMode::Table) => {
                self.read_table(format, path).map(Extracted::Table)
            }
            (FormatFamily::Document, DocumentMode::Text) => {
                self.read_paragraphs(format, path).map(Extracted::Paragraphs)
            }
        }
    }

    /// Tabular sub-dispatcher. Accepts all four formats; documents yield
    /// their first table.
    pub fn extract_table(&self, path: &Path) -> Result<Dataset> {
        let format = self.resolve(path)?;
        self.read_table(format, path)
    }

    /// Textual sub-dispatcher. Accepts PDF and DOCX only.
    pub fn extract_text(&self, path: &Path) -> Result<Vec<String>> {
        let format = self.resolve(path)?;
        if format.family() != FormatFamily::Document {
            return Err(AppError::UnsupportedFormat(format!(
                "{} sources carry no running text",
                format
            )));
        }
        self.read_paragraphs(format, path)
    }

    fn resolve(&self, path: &Path) -> Result<SourceFormat> {
        if !path.is_file() {
            return Err(AppError::FileNotFound(path.display().to_string()));
        }
        let format = SourceFormat::from_path(path)?;
        debug!(file = %path.display(), format = %format, "Resolved source format");
        Ok(format)
    }

    fn read_table(&self, format: SourceFormat, path: &Path) -> Result<Dataset> {
        let dataset = match format {
            SourceFormat::Csv => self.parse_csv(path)?,
            SourceFormat::Xlsx => self.parse_xlsx(path)?,
            SourceFormat::Pdf => self.parse_pdf_table(path)?,
            SourceFormat::Docx => self.parse_docx_table(path)?,
        };

        info!(
            file = %path.display(),
            format = %format,
            rows = dataset.len(),
            columns = dataset.width(),
            "Extracted table"
        );
        Ok(dataset)
    }

    fn read_paragraphs(&self, format: SourceFormat, path: &Path) -> Result<Vec<String>> {
        let paragraphs = match format {
            SourceFormat::Pdf => self.parse_pdf_text(path)?,
            SourceFormat::Docx => self.parse_docx_text(path)?,
            SourceFormat::Csv | SourceFormat::Xlsx => {
                return Err(AppError::UnsupportedFormat(format!(
                    "{} sources carry no running text",
                    format
                )))
            }
        };

        info!(
            file = %path.display(),
            format = %format,
            paragraphs = paragraphs.len(),
            "Extracted paragraphs"
        );
        Ok(paragraphs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Value;

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_reported_before_format() {
        let dir = tempfile::tempdir().unwrap();
        let err = ExtractionUseCase::default()
            .extract(&dir.path().join("ghost.txt"))
            .unwrap_err();
        assert_eq!(err.kind(), "file_not_found");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "notes.txt", "hello");
        let err = ExtractionUseCase::default().extract(&path).unwrap_err();
        assert_eq!(err.kind(), "unsupported_format");
    }

    #[test]
    fn test_csv_routes_to_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "SALES.CSV", "Company,Year\nacme,2020\n");

        match ExtractionUseCase::default().extract(&path).unwrap() {
            Extracted::Table(dataset) => {
                assert_eq!(dataset.columns(), &["Company", "Year"]);
                assert_eq!(dataset.rows()[0][1], Value::Int(2020));
            }
            other => panic!("expected a table, got {:?}", other),
        }
    }

    #[test]
    fn test_text_dispatcher_rejects_tabular_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "sales.csv", "a,b\n1,2\n");
        let err = ExtractionUseCase::default().extract_text(&path).unwrap_err();
        assert_eq!(err.kind(), "unsupported_format");
    }

    #[test]
    fn test_detected_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "semi.csv", "Empresa;Ano\nacme;2020\nbeta;2021\n");

        let config = AppConfig {
            detect_delimiter: true,
            ..AppConfig::default()
        };
        let dataset = ExtractionUseCase::new(&config).extract_table(&path).unwrap();
        assert_eq!(dataset.columns(), &["Empresa", "Ano"]);
        assert_eq!(dataset.len(), 2);
    }
}
