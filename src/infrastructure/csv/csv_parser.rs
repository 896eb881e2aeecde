// ============================================================
// CSV PARSER
// ============================================================
// Parse delimited files into datasets with encoding detection

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use encoding_rs::Encoding;

use crate::domain::error::{AppError, Result};
use crate::domain::table::{Dataset, Value};

/// CSV parser with encoding detection
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values
    trim: bool,

    /// Encoding used when the bytes are not UTF-8 and carry no BOM
    fallback_encoding: Option<&'static Encoding>,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
            fallback_encoding: None,
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Decode non-UTF-8 input with the encoding behind `label`
    pub fn with_fallback_encoding(mut self, label: Option<&str>) -> Self {
        self.fallback_encoding = label.and_then(|l| Encoding::for_label(l.as_bytes()));
        self
    }

    /// Parse a CSV file into a dataset
    pub fn parse_file(&self, path: &Path) -> Result<Dataset> {
        let content = self.read_with_encoding_detection(path)?;
        self.parse_content(&content)
    }

    /// Parse CSV content from string. The first record is the header.
    pub fn parse_content(&self, content: &str) -> Result<Dataset> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true) // short rows are padded below
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        if headers.is_empty() {
            return Err(AppError::EmptyContent("CSV has no header row".to_string()));
        }

        let mut dataset = Dataset::with_header(headers.iter());

        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            if record.len() > dataset.width() {
                let line = record.position().map(|p| p.line()).unwrap_or(index as u64 + 2);
                return Err(AppError::ParseError(format!(
                    "Line {} has {} fields, expected {}",
                    line,
                    record.len(),
                    dataset.width()
                )));
            }

            dataset.push_row_fitted(record.iter().map(Value::infer).collect());
        }

        if dataset.is_empty() {
            return Err(AppError::EmptyContent("CSV has a header but no data rows".to_string()));
        }

        Ok(dataset)
    }

    /// Read file bytes and decode them.
    ///
    /// A UTF-8/UTF-16 BOM decides the encoding. Without one the bytes must be
    /// UTF-8 unless a fallback encoding was configured.
    pub fn read_with_encoding_detection(&self, path: &Path) -> Result<String> {
        let buffer = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AppError::FileNotFound(path.display().to_string()),
            _ => AppError::ParseError(format!("Failed to read {}: {}", path.display(), e)),
        })?;

        decode_bytes(&buffer, self.fallback_encoding)
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        let sample_lines: Vec<_> = content.lines().take(10).collect();
        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

pub(crate) fn decode_bytes(buffer: &[u8], fallback: Option<&'static Encoding>) -> Result<String> {
    if let Some((encoding, bom_length)) = Encoding::for_bom(buffer) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&buffer[bom_length..]);
        if had_errors {
            return Err(AppError::ParseError(format!(
                "Malformed {} content after byte-order mark",
                encoding.name()
            )));
        }
        return Ok(text.into_owned());
    }

    match std::str::from_utf8(buffer) {
        Ok(text) => Ok(text.to_string()),
        Err(utf8_error) => match fallback {
            Some(encoding) => {
                let (text, _, had_errors) = encoding.decode(buffer);
                if had_errors {
                    return Err(AppError::ParseError(format!(
                        "Content is neither UTF-8 nor valid {}",
                        encoding.name()
                    )));
                }
                Ok(text.into_owned())
            }
            None => Err(AppError::ParseError(format!(
                "Invalid UTF-8 at byte {}",
                utf8_error.valid_up_to()
            ))),
        },
    }
}
