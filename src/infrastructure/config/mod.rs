// ============================================================
// APPLICATION CONFIGURATION
// ============================================================
// Layered settings: defaults < TOML file < DOCFLOW_* env < CLI overrides

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};
use crate::domain::format::{DocumentMode, TableFormat};

pub const DEFAULT_CONFIG_FILE: &str = "docflow.toml";
const ENV_PREFIX: &str = "DOCFLOW_";

/// Runtime settings for a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory scanned (non-recursively) for source files
    pub intake_dir: PathBuf,

    /// Directory receiving cleaned tables and text analyses
    pub output_dir: PathBuf,

    /// Directory receiving chart images (default: `<output_dir>/charts`)
    pub charts_dir: Option<PathBuf>,

    /// Format of the cleaned dataset file
    pub table_format: TableFormat,

    /// Whether PDF/DOCX sources yield paragraphs or their first table
    pub document_mode: DocumentMode,

    /// Field delimiter for delimited sources
    pub delimiter: char,

    /// Score common delimiters on the first lines instead of using `delimiter`
    pub detect_delimiter: bool,

    /// Encoding label used when a delimited source is not valid UTF-8
    pub fallback_encoding: Option<String>,

    /// Symbol printed in front of executive summary amounts
    pub currency_symbol: String,

    /// `tracing` filter directive; `RUST_LOG` takes precedence
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            intake_dir: PathBuf::from("entrada"),
            output_dir: PathBuf::from("saida"),
            charts_dir: None,
            table_format: TableFormat::Csv,
            document_mode: DocumentMode::Text,
            delimiter: ',',
            detect_delimiter: false,
            fallback_encoding: None,
            currency_symbol: "€".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

/// Values given on the command line; unset fields leave the layered value alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intake_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charts_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_format: Option<TableFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_mode: Option<DocumentMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl AppConfig {
    /// Load the layered configuration. A missing config file is not an error.
    pub fn load(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let file = config_file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        let config: AppConfig = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::globals(overrides))
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from TOML text on top of the defaults.
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config: AppConfig = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::string(toml))
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.intake_dir.as_os_str().is_empty() {
            return Err(AppError::ConfigError("intake_dir must not be empty".to_string()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(AppError::ConfigError("output_dir must not be empty".to_string()));
        }
        if !self.delimiter.is_ascii() || self.delimiter == '"' {
            return Err(AppError::ConfigError(format!(
                "delimiter must be a single ASCII character other than '\"', got {:?}",
                self.delimiter
            )));
        }
        if let Some(label) = &self.fallback_encoding {
            if encoding_rs::Encoding::for_label(label.as_bytes()).is_none() {
                return Err(AppError::ConfigError(format!(
                    "unknown fallback_encoding '{}'",
                    label
                )));
            }
        }
        Ok(())
    }

    pub fn charts_dir(&self) -> PathBuf {
        self.charts_dir
            .clone()
            .unwrap_or_else(|| self.output_dir.join("charts"))
    }

    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }
}
