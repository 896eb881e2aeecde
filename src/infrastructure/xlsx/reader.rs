// ============================================================
// XLSX READER
// ============================================================
// First worksheet of a workbook into a dataset

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};

use crate::domain::error::{AppError, Result};
use crate::domain::table::{Dataset, Value};

/// Largest magnitude at which every integral f64 is an exact i64.
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Read the first worksheet; its first row is the header.
pub fn read_first_sheet(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(AppError::FileNotFound(path.display().to_string()));
    }

    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| {
        AppError::ParseError(format!("Failed to open Excel file {}: {}", path.display(), e))
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::EmptyContent("No worksheet found".to_string()))?
        .map_err(|e| AppError::ParseError(format!("Failed to read Excel range: {}", e)))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| AppError::EmptyContent("First worksheet is empty".to_string()))?;

    let mut dataset = Dataset::with_header(header.iter().map(header_text));
    for row in rows {
        dataset.push_row_fitted(row.iter().map(cell_value).collect());
    }

    if dataset.is_empty() {
        return Err(AppError::EmptyContent(
            "First worksheet has a header but no data rows".to_string(),
        ));
    }

    Ok(dataset)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        other => cell_value(other).render(),
    }
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Int(int) => Value::Int(*int),
        Data::Float(real) if !real.is_finite() => Value::Null,
        Data::Float(real) if real.fract() == 0.0 && real.abs() < EXACT_INT_LIMIT => {
            Value::Int(*real as i64)
        }
        Data::Float(real) => Value::Real(*real),
        Data::String(text) if text.trim().is_empty() => Value::Null,
        Data::String(text) => Value::Text(text.trim().to_string()),
        Data::Bool(flag) => Value::Text(if *flag { "True" } else { "False" }.to_string()),
        Data::Empty | Data::Error(_) => Value::Null,
        other => Value::Text(other.to_string()),
    }
}
