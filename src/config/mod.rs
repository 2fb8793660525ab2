#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{ImportSqlArgs, ReplaceSqlArgs, SyncCliConfig};
pub use toml_config::TomlConfig;

use crate::app::pipelines::sync_pipeline::DEFAULT_BATCH_SIZE;
use crate::core::csv_source::CsvSource;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use std::time::Duration;

pub const SERVICE_KEY_ENV: &str = "SUPABASE_SERVICE_KEY";
pub const SUPABASE_URL_ENV: &str = "SUPABASE_URL";

pub const DEFAULT_FULL_MENU_PATH: &str = "full-menus.csv";
pub const DEFAULT_DISHES_PATH: &str = "all-dishes.csv";
pub const DEFAULT_SCRIPT_OUTPUT: &str = "supabase/import-full-menus.sql";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Loads and validates the config file when one was given.
pub fn load_config_file(path: Option<&str>) -> Result<Option<TomlConfig>> {
    match path {
        Some(path) => {
            let config = TomlConfig::from_file(path)?;
            config.validate()?;
            Ok(Some(config))
        }
        None => Ok(None),
    }
}

/// Resolved settings for the SQL script generators.
#[derive(Debug, Clone)]
pub struct ScriptSettings {
    pub input_path: String,
    pub delimiter: u8,
    pub normalize_categories: bool,
    pub output_path: Option<String>,
    pub verification_excludes: Vec<String>,
}

impl ScriptSettings {
    pub fn csv_source(&self) -> CsvSource {
        CsvSource::new(&self.input_path)
            .with_delimiter(self.delimiter)
            .with_normalized_categories(self.normalize_categories)
    }
}

impl Validate for ScriptSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input_path)?;
        if let Some(output) = &self.output_path {
            validation::validate_path("output", output)?;
        }
        Ok(())
    }
}

/// Resolved settings for the remote sync.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub input_path: String,
    pub delimiter: u8,
    pub normalize_categories: bool,
    pub supabase_url: Option<String>,
    pub service_key: Option<String>,
    pub batch_size: usize,
    pub timeout: Option<Duration>,
    pub dry_run: bool,
}

impl SyncSettings {
    pub fn csv_source(&self) -> CsvSource {
        CsvSource::new(&self.input_path)
            .with_delimiter(self.delimiter)
            .with_normalized_categories(self.normalize_categories)
    }

    /// URL and service key for the remote store. The key is checked first.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let key = self
            .service_key
            .as_deref()
            .ok_or_else(|| EtlError::MissingConfigError {
                field: SERVICE_KEY_ENV.to_string(),
            })?;
        let url = validation::validate_required_field(SUPABASE_URL_ENV, &self.supabase_url)?;
        Ok((url.as_str(), key))
    }
}

impl Validate for SyncSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input_path)?;
        validation::validate_range("batch_size", self.batch_size, 1, 1000)?;
        if let Some(url) = &self.supabase_url {
            validation::validate_url("supabase_url", url)?;
        }
        if let Some(timeout) = self.timeout {
            validation::validate_positive_number("timeout_seconds", timeout.as_secs(), 1)?;
        }
        if !self.dry_run {
            self.credentials()?;
        }
        Ok(())
    }
}

pub(crate) fn resolve_delimiter(cli: Option<char>, file: Option<&TomlConfig>) -> Result<u8> {
    match cli {
        Some(c) => validation::parse_delimiter("delimiter", &c.to_string()),
        None => match file.and_then(|f| f.delimiter()) {
            Some(d) => validation::parse_delimiter("source.delimiter", d),
            None => Ok(b','),
        },
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            input_path: DEFAULT_DISHES_PATH.to_string(),
            delimiter: b',',
            normalize_categories: false,
            supabase_url: None,
            service_key: None,
            batch_size: DEFAULT_BATCH_SIZE,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)),
            dry_run: false,
        }
    }
}
