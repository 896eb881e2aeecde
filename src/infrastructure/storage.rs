use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::{AppError, Result};

/// List the regular files of the intake directory, sorted by file name.
///
/// Sub-directories are ignored. A missing directory or one without files
/// halts the run.
pub fn list_intake_files(intake_dir: &Path) -> Result<Vec<PathBuf>> {
    if !intake_dir.is_dir() {
        return Err(AppError::IntakeMissing(intake_dir.display().to_string()));
    }

    let entries = fs::read_dir(intake_dir).map_err(|e| {
        AppError::IntakeMissing(format!("{}: {}", intake_dir.display(), e))
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();

    if files.is_empty() {
        return Err(AppError::IntakeEmpty(intake_dir.display().to_string()));
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            AppError::WriteError(format!(
                "Failed to create directory {}: {}",
                path.display(),
                e
            ))
        })?;
    }
    Ok(())
}

/// Create the directory a destination file will live in.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// `<stem><suffix>.<extension>` inside `dir`, e.g. `vendas_tratado.csv`.
pub fn derived_output_path(dir: &Path, source: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    dir.join(format!("{}{}.{}", stem, suffix, extension))
}
