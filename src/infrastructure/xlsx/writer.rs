// ============================================================
// XLSX WRITER
// ============================================================
// Minimal Office Open XML workbook: one sheet plus shared strings,
// serialized with quick-xml inside a zip container

use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::error::{AppError, Result};
use crate::domain::table::{Dataset, Value};

const SHEET_NAME: &str = "Sheet1";

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
    r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
    r#"</Types>"#
);

const ROOT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"</Relationships>"#
);

const WORKBOOK_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
    r#"</Relationships>"#
);

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Write `dataset` as a single-sheet workbook. Null cells are left out.
pub fn write_xlsx(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut strings = SharedStrings::default();
    let sheet = build_sheet(dataset, &mut strings).map_err(|e| write_error(path, e))?;
    let shared = strings.to_xml().map_err(|e| write_error(path, e))?;
    let workbook = build_workbook().map_err(|e| write_error(path, e))?;

    let file = File::create(path).map_err(|e| write_error(path, e))?;
    let mut zip = ZipWriter::new(file);

    let parts: [(&str, &[u8]); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", ROOT_RELS.as_bytes()),
        ("xl/workbook.xml", workbook.as_slice()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
        ("xl/worksheets/sheet1.xml", sheet.as_slice()),
        ("xl/sharedStrings.xml", shared.as_slice()),
    ];

    for (name, body) in parts {
        zip.start_file(name, file_options())
            .map_err(|e| write_error(path, e))?;
        zip.write_all(body).map_err(|e| write_error(path, e))?;
    }

    zip.finish().map_err(|e| write_error(path, e))?;
    Ok(())
}

fn file_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;
type XmlResult<T> = std::result::Result<T, quick_xml::Error>;

fn start_document() -> XmlResult<XmlWriter> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(writer)
}

/// Write `<name>text</name>`; the text is escaped on the way out.
fn write_text_element(writer: &mut XmlWriter, element: BytesStart<'_>, text: &str) -> XmlResult<()> {
    let end = element.to_end().into_owned();
    writer.write_event(Event::Start(element))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(end))?;
    Ok(())
}

#[derive(Default)]
struct SharedStrings {
    index: HashMap<String, usize>,
    ordered: Vec<String>,
    references: usize,
}

impl SharedStrings {
    fn intern(&mut self, text: &str) -> usize {
        self.references += 1;
        if let Some(&position) = self.index.get(text) {
            return position;
        }
        let position = self.ordered.len();
        self.index.insert(text.to_string(), position);
        self.ordered.push(text.to_string());
        position
    }

    fn to_xml(&self) -> XmlResult<Vec<u8>> {
        let mut writer = start_document()?;

        let count = self.references.to_string();
        let unique = self.ordered.len().to_string();
        let mut root = BytesStart::new("sst");
        root.push_attribute(("xmlns", SPREADSHEET_NS));
        root.push_attribute(("count", count.as_str()));
        root.push_attribute(("uniqueCount", unique.as_str()));
        writer.write_event(Event::Start(root))?;

        for text in &self.ordered {
            writer.write_event(Event::Start(BytesStart::new("si")))?;
            let mut t = BytesStart::new("t");
            t.push_attribute(("xml:space", "preserve"));
            write_text_element(&mut writer, t, text)?;
            writer.write_event(Event::End(BytesEnd::new("si")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("sst")))?;
        Ok(writer.into_inner().into_inner())
    }
}

fn build_workbook() -> XmlResult<Vec<u8>> {
    let mut writer = start_document()?;

    let mut root = BytesStart::new("workbook");
    root.push_attribute(("xmlns", SPREADSHEET_NS));
    root.push_attribute(("xmlns:r", RELATIONSHIPS_NS));
    writer.write_event(Event::Start(root))?;
    writer.write_event(Event::Start(BytesStart::new("sheets")))?;

    let mut sheet = BytesStart::new("sheet");
    sheet.push_attribute(("name", SHEET_NAME));
    sheet.push_attribute(("sheetId", "1"));
    sheet.push_attribute(("r:id", "rId1"));
    writer.write_event(Event::Empty(sheet))?;

    writer.write_event(Event::End(BytesEnd::new("sheets")))?;
    writer.write_event(Event::End(BytesEnd::new("workbook")))?;
    Ok(writer.into_inner().into_inner())
}

fn build_sheet(dataset: &Dataset, strings: &mut SharedStrings) -> XmlResult<Vec<u8>> {
    let mut writer = start_document()?;

    let mut root = BytesStart::new("worksheet");
    root.push_attribute(("xmlns", SPREADSHEET_NS));
    writer.write_event(Event::Start(root))?;
    writer.write_event(Event::Start(BytesStart::new("sheetData")))?;

    let header: Vec<Value> = dataset
        .columns()
        .iter()
        .map(|name| Value::Text(name.clone()))
        .collect();

    for (row_index, row) in std::iter::once(&header)
        .chain(dataset.rows().iter())
        .enumerate()
    {
        let row_number = (row_index + 1).to_string();
        let mut row_start = BytesStart::new("row");
        row_start.push_attribute(("r", row_number.as_str()));
        writer.write_event(Event::Start(row_start))?;

        for (column_index, value) in row.iter().enumerate() {
            let cell_value = match value {
                Value::Null => continue,
                Value::Int(int) => int.to_string(),
                Value::Real(real) => real.to_string(),
                Value::Text(text) => strings.intern(text).to_string(),
            };

            let reference = format!("{}{}", column_letters(column_index), row_number);
            let mut cell = BytesStart::new("c");
            cell.push_attribute(("r", reference.as_str()));
            if matches!(value, Value::Text(_)) {
                cell.push_attribute(("t", "s"));
            }
            writer.write_event(Event::Start(cell))?;
            write_text_element(&mut writer, BytesStart::new("v"), &cell_value)?;
            writer.write_event(Event::End(BytesEnd::new("c")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("row")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("sheetData")))?;
    writer.write_event(Event::End(BytesEnd::new("worksheet")))?;
    Ok(writer.into_inner().into_inner())
}

/// Spreadsheet column name for a zero-based index: 0 -> A, 26 -> AA.
fn column_letters(index: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = index + 1;
    while remaining > 0 {
        let offset = (remaining - 1) % 26;
        letters.push((b'A' + offset as u8) as char);
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn write_error(path: &Path, err: impl std::fmt::Display) -> AppError {
    AppError::WriteError(format!("{}: {}", path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::xlsx::read_first_sheet;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
    }

    #[test]
    fn test_written_workbook_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let mut dataset = Dataset::with_header(["Empresa", "Ano", "Lucro Líquido"]);
        dataset
            .push_row(vec![
                Value::Text("Açaí & Cia <Ltda>".to_string()),
                Value::Int(2021),
                Value::Real(1250.75),
            ])
            .unwrap();
        dataset
            .push_row(vec![
                Value::Text("Açaí & Cia <Ltda>".to_string()),
                Value::Null,
                Value::Real(-3.5),
            ])
            .unwrap();

        write_xlsx(&dataset, &path).unwrap();
        let reread = read_first_sheet(&path).unwrap();

        assert_eq!(reread, dataset);
    }
}
