use std::path::Path;

use tracing::debug;

use super::super::ExtractionUseCase;
use crate::domain::error::Result;
use crate::domain::table::Dataset;
use crate::infrastructure::csv::CsvParser;

impl ExtractionUseCase {
    pub(in crate::application::use_cases::extraction) fn parse_csv(
        &self,
        path: &Path,
    ) -> Result<Dataset> {
        let parser = CsvParser::new().with_fallback_encoding(self.fallback_encoding.as_deref());

        if !self.detect_delimiter {
            return parser.with_delimiter(self.delimiter).parse_file(path);
        }

        // Detection needs the decoded text, so read once and parse from memory
        let content = parser.read_with_encoding_detection(path)?;
        let delimiter = CsvParser::detect_delimiter(&content);
        debug!(
            file = %path.display(),
            delimiter = ?(delimiter as char),
            "Detected delimiter"
        );

        parser.with_delimiter(delimiter).parse_content(&content)
    }
}
