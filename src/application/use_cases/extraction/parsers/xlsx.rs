use std::path::Path;

use super::super::ExtractionUseCase;
use crate::domain::error::Result;
use crate::domain::table::Dataset;
use crate::infrastructure::xlsx::read_first_sheet;

impl ExtractionUseCase {
    pub(in crate::application::use_cases::extraction) fn parse_xlsx(
        &self,
        path: &Path,
    ) -> Result<Dataset> {
        read_first_sheet(path)
    }
}
