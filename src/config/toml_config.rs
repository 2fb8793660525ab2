use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file shared by all three tools. Every section and key may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: Option<SourceConfig>,
    pub script: Option<ScriptConfig>,
    pub supabase: Option<SupabaseConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub csv_path: Option<String>,
    pub delimiter: Option<String>,
    pub normalize_categories: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptConfig {
    pub output_path: Option<String>,
    pub verification_excludes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub service_key: Option<String>,
    pub batch_size: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after replacing `${VAR}` placeholders from the process environment.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = Self::substitute_env_vars(content, lookup)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    // Unset variables are left as the literal placeholder.
    fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn csv_path(&self) -> Option<&str> {
        self.source.as_ref()?.csv_path.as_deref()
    }

    pub fn delimiter(&self) -> Option<&str> {
        self.source.as_ref()?.delimiter.as_deref()
    }

    pub fn normalize_categories(&self) -> Option<bool> {
        self.source.as_ref()?.normalize_categories
    }

    pub fn output_path(&self) -> Option<&str> {
        self.script.as_ref()?.output_path.as_deref()
    }

    pub fn verification_excludes(&self) -> Option<&[String]> {
        self.script.as_ref()?.verification_excludes.as_deref()
    }

    pub fn supabase_url(&self) -> Option<&str> {
        self.supabase.as_ref()?.url.as_deref()
    }

    /// The service key, unless it is missing or still an unresolved `${...}` placeholder.
    pub fn service_key(&self) -> Option<&str> {
        self.supabase
            .as_ref()?
            .service_key
            .as_deref()
            .filter(|key| !key.trim().is_empty() && !key.starts_with("${"))
    }

    pub fn batch_size(&self) -> Option<usize> {
        self.supabase.as_ref()?.batch_size
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.supabase.as_ref()?.timeout_seconds
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = self.csv_path() {
            validation::validate_path("source.csv_path", path)?;
        }
        if let Some(delimiter) = self.delimiter() {
            validation::parse_delimiter("source.delimiter", delimiter)?;
        }
        if let Some(path) = self.output_path() {
            validation::validate_path("script.output_path", path)?;
        }
        if let Some(url) = self.supabase_url() {
            validation::validate_url("supabase.url", url)?;
        }
        if let Some(batch_size) = self.batch_size() {
            validation::validate_range("supabase.batch_size", batch_size, 1, 1000)?;
        }
        if let Some(timeout) = self.timeout_seconds() {
            validation::validate_positive_number("supabase.timeout_seconds", timeout, 1)?;
        }
        Ok(())
    }
}
