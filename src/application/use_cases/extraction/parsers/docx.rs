use std::fs;
use std::path::Path;

use super::super::ExtractionUseCase;
use super::{into_paragraphs, table_from_rows};
use crate::domain::error::{AppError, Result};
use crate::domain::table::Dataset;

impl ExtractionUseCase {
    /// Body paragraphs in document order.
    pub(in crate::application::use_cases::extraction) fn parse_docx_text(
        &self,
        path: &Path,
    ) -> Result<Vec<String>> {
        let docx = load_docx(path)?;
        let paragraphs = docx.document.children.iter().filter_map(|child| match child {
            docx_rs::DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        });

        into_paragraphs(paragraphs, &path.display().to_string())
    }

    /// First table in the document body.
    pub(in crate::application::use_cases::extraction) fn parse_docx_table(
        &self,
        path: &Path,
    ) -> Result<Dataset> {
        let docx = load_docx(path)?;
        let table = docx
            .document
            .children
            .iter()
            .find_map(|child| match child {
                docx_rs::DocumentChild::Table(table) => Some(table),
                _ => None,
            })
            .ok_or_else(|| AppError::EmptyContent(format!("{} has no tables", path.display())))?;

        table_from_rows(table_rows(table), &path.display().to_string())
    }
}

fn load_docx(path: &Path) -> Result<docx_rs::Docx> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AppError::FileNotFound(path.display().to_string()),
        _ => AppError::ParseError(format!("Failed to read DOCX file {}: {}", path.display(), e)),
    })?;

    docx_rs::read_docx(&bytes).map_err(|e| {
        AppError::ParseError(format!("Failed to parse DOCX file {}: {}", path.display(), e))
    })
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut buffer = String::new();
    for child in &paragraph.children {
        push_paragraph_child(child, &mut buffer);
    }
    buffer
}

fn push_paragraph_child(child: &docx_rs::ParagraphChild, buffer: &mut String) {
    match child {
        docx_rs::ParagraphChild::Run(run) => push_run(run, buffer),
        docx_rs::ParagraphChild::Hyperlink(link) => {
            for link_child in &link.children {
                push_paragraph_child(link_child, buffer);
            }
        }
        docx_rs::ParagraphChild::Insert(insert) => {
            for insert_child in &insert.children {
                if let docx_rs::InsertChild::Run(run) = insert_child {
                    push_run(run, buffer);
                }
            }
        }
        _ => {}
    }
}

fn push_run(run: &docx_rs::Run, buffer: &mut String) {
    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(text) => buffer.push_str(&text.text),
            docx_rs::RunChild::Tab(_) | docx_rs::RunChild::PTab(_) => buffer.push('\t'),
            docx_rs::RunChild::Break(_) => buffer.push('\n'),
            docx_rs::RunChild::Sym(sym) => buffer.push_str(&sym.char),
            _ => {}
        }
    }
}

/// Cell texts row by row. Empty cells keep their position.
fn table_rows(table: &docx_rs::Table) -> Vec<Vec<String>> {
    table
        .rows
        .iter()
        .map(|row| {
            let docx_rs::TableChild::TableRow(row) = row;
            row.cells
                .iter()
                .map(|cell| {
                    let docx_rs::TableRowChild::TableCell(cell) = cell;
                    cell_text(cell)
                })
                .collect()
        })
        .collect()
}

/// Paragraphs of a cell joined by spaces; nested tables are flattened in.
fn cell_text(cell: &docx_rs::TableCell) -> String {
    let mut parts = Vec::new();
    for content in &cell.children {
        match content {
            docx_rs::TableCellContent::Paragraph(paragraph) => {
                let text = paragraph_text(paragraph);
                if !text.trim().is_empty() {
                    parts.push(text.trim().to_string());
                }
            }
            docx_rs::TableCellContent::Table(nested) => {
                let flattened: Vec<String> = table_rows(nested)
                    .into_iter()
                    .flatten()
                    .filter(|text| !text.is_empty())
                    .collect();
                if !flattened.is_empty() {
                    parts.push(flattened.join(" "));
                }
            }
            _ => {}
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Value;
    use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};

    fn cell(text: &str) -> TableCell {
        TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
    }

    fn row(cells: &[&str]) -> TableRow {
        TableRow::new(cells.iter().map(|text| cell(text)).collect())
    }

    fn write_docx(path: &Path, docx: Docx) {
        let file = fs::File::create(path).unwrap();
        docx.build().pack(file).unwrap();
    }

    fn sample(path: &Path) {
        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("  Relatório anual ")))
            .add_paragraph(Paragraph::new())
            .add_table(Table::new(vec![
                row(&["Company", "Year", "Gross Revenue"]),
                row(&["acme corp", "2020", "1500.5"]),
                row(&["beta", "", "200"]),
            ]))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Closing note")))
            .add_table(Table::new(vec![row(&["Other"]), row(&["ignored"])]));
        write_docx(path, docx);
    }

    #[test]
    fn test_docx_paragraphs_skip_blank_and_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.docx");
        sample(&path);

        let paragraphs = ExtractionUseCase::default().parse_docx_text(&path).unwrap();
        assert_eq!(paragraphs, vec!["Relatório anual", "Closing note"]);
    }

    #[test]
    fn test_docx_first_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.docx");
        sample(&path);

        let dataset = ExtractionUseCase::default().parse_docx_table(&path).unwrap();
        assert_eq!(dataset.columns(), &["Company", "Year", "Gross Revenue"]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.rows()[0],
            vec![
                Value::Text("acme corp".to_string()),
                Value::Int(2020),
                Value::Real(1500.5)
            ]
        );
        assert_eq!(dataset.rows()[1][1], Value::Null);
    }

    #[test]
    fn test_docx_without_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.docx");
        write_docx(
            &path,
            Docx::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("Only text"))),
        );

        let err = ExtractionUseCase::default().parse_docx_table(&path).unwrap_err();
        assert_eq!(err.kind(), "empty_content");
    }

    #[test]
    fn test_docx_without_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.docx");
        write_docx(&path, Docx::new().add_paragraph(Paragraph::new()));

        let err = ExtractionUseCase::default().parse_docx_text(&path).unwrap_err();
        assert_eq!(err.kind(), "empty_content");
    }

    #[test]
    fn test_corrupt_docx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        fs::write(&path, b"not a docx").unwrap();

        let err = ExtractionUseCase::default().parse_docx_text(&path).unwrap_err();
        assert_eq!(err.kind(), "parse_error");
    }
}
