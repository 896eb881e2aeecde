use std::path::Path;

use lopdf::Document;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::super::ExtractionUseCase;
use super::{into_paragraphs, table_from_rows};
use crate::domain::error::{AppError, Result};
use crate::domain::table::Dataset;

/// Cell boundaries in a text-rendered table row: tabs, pipes, or wide gaps.
static CELL_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\t+|\s*\|\s*|\s{2,}").unwrap());

impl ExtractionUseCase {
    /// Page text split on line breaks, in page order.
    pub(in crate::application::use_cases::extraction) fn parse_pdf_text(
        &self,
        path: &Path,
    ) -> Result<Vec<String>> {
        let document = load_pdf(path)?;
        let pages = document.get_pages();
        if pages.is_empty() {
            return Err(AppError::EmptyContent(format!(
                "{} has no pages",
                path.display()
            )));
        }

        let mut lines = Vec::new();
        for &page_number in pages.keys() {
            match document.extract_text(&[page_number]) {
                Ok(text) => lines.extend(text.lines().map(str::to_string)),
                Err(e) => {
                    warn!(file = %path.display(), page = page_number, error = %e, "Skipping unreadable PDF page");
                }
            }
        }

        into_paragraphs(lines, &path.display().to_string())
    }

    /// First table found in the first page's text.
    pub(in crate::application::use_cases::extraction) fn parse_pdf_table(
        &self,
        path: &Path,
    ) -> Result<Dataset> {
        let document = load_pdf(path)?;
        let first_page = document
            .get_pages()
            .keys()
            .next()
            .copied()
            .ok_or_else(|| AppError::EmptyContent(format!("{} has no pages", path.display())))?;

        let text = document.extract_text(&[first_page]).map_err(|e| {
            AppError::ParseError(format!(
                "Failed to read first page of {}: {}",
                path.display(),
                e
            ))
        })?;

        let rows = first_table(&text).ok_or_else(|| {
            AppError::EmptyContent(format!("No table on the first page of {}", path.display()))
        })?;
        debug!(file = %path.display(), rows = rows.len(), "Detected PDF table");

        table_from_rows(rows, &path.display().to_string())
    }
}

fn load_pdf(path: &Path) -> Result<Document> {
    Document::load(path)
        .map_err(|e| AppError::ParseError(format!("Failed to load PDF {}: {}", path.display(), e)))
}

/// Cells of a line when it reads as a table row (two or more cells).
fn split_cells(line: &str) -> Option<Vec<String>> {
    let cells: Vec<String> = CELL_SEPARATOR
        .split(line.trim())
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect();

    (cells.len() >= 2).then_some(cells)
}

/// The first run of consecutive table rows. Blank lines neither extend nor
/// end a run; any other non-row line ends it.
fn first_table(text: &str) -> Option<Vec<Vec<String>>> {
    let mut rows: Vec<Vec<String>> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match split_cells(line) {
            Some(cells) => rows.push(cells),
            None if !rows.is_empty() => break,
            None => {}
        }
    }

    (!rows.is_empty()).then_some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Value;
    use lopdf::{dictionary, Object};

    fn empty_pdf(path: &Path) {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0i64,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);
        document.save(path).unwrap();
    }

    #[test]
    fn test_split_cells() {
        assert_eq!(
            split_cells("Company   Year  Revenue"),
            Some(vec!["Company".to_string(), "Year".to_string(), "Revenue".to_string()])
        );
        assert_eq!(
            split_cells("| acme | 2020 |"),
            Some(vec!["acme".to_string(), "2020".to_string()])
        );
        assert_eq!(split_cells("a\tb"), Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(split_cells("Quarterly report for 2020"), None);
    }

    #[test]
    fn test_first_table_takes_first_run() {
        let text = "Annual Report\n\nCompany  Year\nacme  2020\n\nbeta  2021\nNotes follow\nx  y\n";
        let rows = first_table(text).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["Company", "Year"]);
        assert_eq!(rows[2], vec!["beta", "2021"]);
    }

    #[test]
    fn test_no_table_in_prose() {
        assert!(first_table("Just a sentence.\nAnother one.").is_none());
    }

    #[test]
    fn test_zero_page_pdf_is_empty_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        empty_pdf(&path);

        let use_case = ExtractionUseCase::default();
        assert_eq!(use_case.parse_pdf_text(&path).unwrap_err().kind(), "empty_content");
        assert_eq!(use_case.parse_pdf_table(&path).unwrap_err().kind(), "empty_content");
    }

    #[test]
    fn test_garbage_pdf_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"definitely not a pdf").unwrap();

        let err = ExtractionUseCase::default().parse_pdf_text(&path).unwrap_err();
        assert_eq!(err.kind(), "parse_error");
    }

    #[test]
    fn test_detected_rows_become_dataset() {
        let rows = first_table("Company | Year\nacme | 2020\n").unwrap();
        let dataset = table_from_rows(rows, "page").unwrap();
        assert_eq!(dataset.rows()[0], vec![Value::Text("acme".to_string()), Value::Int(2020)]);
    }
}
