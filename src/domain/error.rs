use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppError {
    FileNotFound(String),
    UnsupportedFormat(String),
    ParseError(String),
    EmptyContent(String),
    WriteError(String),
    IntakeMissing(String),
    IntakeEmpty(String),
    ConfigError(String),
}

impl AppError {
    /// Errors that stop the whole batch instead of a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::IntakeMissing(_) | AppError::IntakeEmpty(_) | AppError::ConfigError(_)
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::FileNotFound(_) => "file_not_found",
            AppError::UnsupportedFormat(_) => "unsupported_format",
            AppError::ParseError(_) => "parse_error",
            AppError::EmptyContent(_) => "empty_content",
            AppError::WriteError(_) => "write_error",
            AppError::IntakeMissing(_) => "intake_missing",
            AppError::IntakeEmpty(_) => "intake_empty",
            AppError::ConfigError(_) => "config_error",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            AppError::UnsupportedFormat(msg) => write!(f, "Unsupported format: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::EmptyContent(msg) => write!(f, "Empty content: {}", msg),
            AppError::WriteError(msg) => write!(f, "Write error: {}", msg),
            AppError::IntakeMissing(msg) => write!(f, "Intake directory missing: {}", msg),
            AppError::IntakeEmpty(msg) => write!(f, "Intake directory empty: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

// Bare io errors only surface on the write side; readers map their own.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::WriteError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
