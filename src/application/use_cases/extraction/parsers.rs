mod csv;
mod docx;
mod pdf;
mod xlsx;

use crate::domain::error::{AppError, Result};
use crate::domain::table::{Dataset, Value};

/// Drop blank entries and trim the rest. An empty result is `EmptyContent`.
fn into_paragraphs<I>(raw: I, source: &str) -> Result<Vec<String>>
where
    I: IntoIterator<Item = String>,
{
    let paragraphs: Vec<String> = raw
        .into_iter()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    if paragraphs.is_empty() {
        return Err(AppError::EmptyContent(format!("{} has no text", source)));
    }
    Ok(paragraphs)
}

/// First row is the header, the rest are data rows fitted to its width.
fn table_from_rows(rows: Vec<Vec<String>>, source: &str) -> Result<Dataset> {
    if rows.len() < 2 {
        return Err(AppError::EmptyContent(format!(
            "{} table has fewer than 2 rows",
            source
        )));
    }

    let mut rows = rows.into_iter();
    let header = rows.next().unwrap_or_default();
    let mut dataset = Dataset::with_header(header);
    for row in rows {
        dataset.push_row_fitted(row.iter().map(|cell| Value::infer(cell)).collect());
    }
    Ok(dataset)
}
