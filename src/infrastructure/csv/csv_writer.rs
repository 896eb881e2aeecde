// ============================================================
// CSV WRITER
// ============================================================
// Write datasets as UTF-8 (with BOM) comma-separated files

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::domain::error::{AppError, Result};
use crate::domain::table::Dataset;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Write `dataset` to `path`, header first. Nulls become empty fields.
///
/// The byte-order mark lets spreadsheet tools pick UTF-8 when reopening, so
/// accented text survives.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|e| write_error(path, e))?;
    file.write_all(UTF8_BOM).map_err(|e| write_error(path, e))?;

    let mut writer = WriterBuilder::new().from_writer(file);
    writer
        .write_record(dataset.columns())
        .map_err(|e| write_error(path, e))?;

    for row in dataset.rows() {
        writer
            .write_record(row.iter().map(|value| value.render()))
            .map_err(|e| write_error(path, e))?;
    }

    writer.flush().map_err(|e| write_error(path, e))?;
    Ok(())
}

fn write_error(path: &Path, err: impl std::fmt::Display) -> AppError {
    AppError::WriteError(format!("{}: {}", path.display(), err))
}
