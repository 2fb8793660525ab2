use super::{
    resolve_delimiter, ScriptSettings, SyncSettings, TomlConfig, DEFAULT_DISHES_PATH,
    DEFAULT_FULL_MENU_PATH, DEFAULT_SCRIPT_OUTPUT, DEFAULT_TIMEOUT_SECONDS, SERVICE_KEY_ENV,
    SUPABASE_URL_ENV,
};
use crate::app::pipelines::sync_pipeline::DEFAULT_BATCH_SIZE;
use crate::core::sql::DEFAULT_VERIFICATION_EXCLUDES;
use crate::utils::error::Result;
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "menu-import-sql")]
#[command(about = "Generate an insert-only SQL import script from a full menu file")]
pub struct ImportSqlArgs {
    /// Menu file with restaurant_name,dish_name,category,price columns [default: full-menus.csv]
    #[arg(short, long)]
    pub input: Option<String>,

    /// Where to write the script [default: supabase/import-full-menus.sql]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Restaurants left out of the verification query (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Keep underscores in category names
    #[arg(long)]
    pub keep_underscores: bool,

    /// Field delimiter of the menu file [default: ,]
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ImportSqlArgs {
    pub fn resolve(&self, file: Option<&TomlConfig>) -> Result<ScriptSettings> {
        let verification_excludes = match (&self.exclude, file.and_then(|f| f.verification_excludes())) {
            (Some(cli), _) => cli.clone(),
            (None, Some(configured)) => configured.to_vec(),
            (None, None) => DEFAULT_VERIFICATION_EXCLUDES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        Ok(ScriptSettings {
            input_path: self
                .input
                .clone()
                .or_else(|| file.and_then(|f| f.csv_path()).map(str::to_string))
                .unwrap_or_else(|| DEFAULT_FULL_MENU_PATH.to_string()),
            delimiter: resolve_delimiter(self.delimiter, file)?,
            normalize_categories: !self.keep_underscores
                && file.and_then(|f| f.normalize_categories()).unwrap_or(true),
            output_path: Some(
                self.output
                    .clone()
                    .or_else(|| file.and_then(|f| f.output_path()).map(str::to_string))
                    .unwrap_or_else(|| DEFAULT_SCRIPT_OUTPUT.to_string()),
            ),
            verification_excludes: verification_excludes
                .into_iter()
                .filter(|name| !name.trim().is_empty())
                .collect(),
        })
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "menu-replace-sql")]
#[command(about = "Print delete-then-insert SQL for every restaurant in a menu file")]
pub struct ReplaceSqlArgs {
    /// Menu file with restaurant_name,dish_name,category,price columns [default: all-dishes.csv]
    #[arg(short, long)]
    pub input: Option<String>,

    /// Replace underscores in category names with spaces
    #[arg(long)]
    pub normalize_categories: bool,

    /// Field delimiter of the menu file [default: ,]
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ReplaceSqlArgs {
    pub fn resolve(&self, file: Option<&TomlConfig>) -> Result<ScriptSettings> {
        Ok(ScriptSettings {
            input_path: self
                .input
                .clone()
                .or_else(|| file.and_then(|f| f.csv_path()).map(str::to_string))
                .unwrap_or_else(|| DEFAULT_DISHES_PATH.to_string()),
            delimiter: resolve_delimiter(self.delimiter, file)?,
            normalize_categories: self.normalize_categories
                || file.and_then(|f| f.normalize_categories()).unwrap_or(false),
            output_path: None,
            verification_excludes: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "menu-sync")]
#[command(about = "Replace each restaurant's dishes in Supabase with the rows of a menu file")]
pub struct SyncCliConfig {
    /// Menu file with restaurant_name,dish_name,category,price columns [default: all-dishes.csv]
    #[arg(short, long)]
    pub input: Option<String>,

    /// Supabase project URL [default: $SUPABASE_URL]
    #[arg(long)]
    pub supabase_url: Option<String>,

    /// Rows per insert request [default: 100]
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Per-request HTTP timeout [default: 30]
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Field delimiter of the menu file [default: ,]
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Replace underscores in category names with spaces
    #[arg(long)]
    pub normalize_categories: bool,

    /// Read and group the file, then show what would be synced
    #[arg(long)]
    pub dry_run: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl SyncCliConfig {
    /// Merges flags, the config file and the environment, in that order of precedence.
    pub fn resolve<F>(&self, file: Option<&TomlConfig>, env: F) -> Result<SyncSettings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_key = file
            .and_then(|f| f.service_key())
            .map(str::to_string)
            .or_else(|| env(SERVICE_KEY_ENV))
            .filter(|key| !key.trim().is_empty());

        let timeout_seconds = self
            .timeout_seconds
            .or_else(|| file.and_then(|f| f.timeout_seconds()))
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);

        Ok(SyncSettings {
            input_path: self
                .input
                .clone()
                .or_else(|| file.and_then(|f| f.csv_path()).map(str::to_string))
                .unwrap_or_else(|| DEFAULT_DISHES_PATH.to_string()),
            delimiter: resolve_delimiter(self.delimiter, file)?,
            normalize_categories: self.normalize_categories
                || file.and_then(|f| f.normalize_categories()).unwrap_or(false),
            supabase_url: self
                .supabase_url
                .clone()
                .or_else(|| file.and_then(|f| f.supabase_url()).map(str::to_string))
                .or_else(|| env(SUPABASE_URL_ENV)),
            service_key,
            batch_size: self
                .batch_size
                .or_else(|| file.and_then(|f| f.batch_size()))
                .unwrap_or(DEFAULT_BATCH_SIZE),
            timeout: Some(Duration::from_secs(timeout_seconds)),
            dry_run: self.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use crate::utils::validation::Validate;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_import_defaults() {
        let args = ImportSqlArgs::parse_from(["menu-import-sql"]);
        let settings = args.resolve(None).unwrap();

        assert_eq!(settings.input_path, "full-menus.csv");
        assert_eq!(settings.output_path.as_deref(), Some("supabase/import-full-menus.sql"));
        assert!(settings.normalize_categories);
        assert_eq!(
            settings.verification_excludes,
            vec!["Bangkok Cuisine".to_string(), "Vineyard Caribbean Cuisine".to_string()]
        );
    }

    #[test]
    fn test_import_flags_override_file() {
        let file = TomlConfig::from_toml_str_with(
            "[source]\ncsv_path = \"from-file.csv\"\n[script]\nverification_excludes = [\"A\"]\n",
            no_env,
        )
        .unwrap();
        let args = ImportSqlArgs::parse_from([
            "menu-import-sql",
            "--input",
            "cli.csv",
            "--exclude",
            "X,Y",
            "--keep-underscores",
        ]);
        let settings = args.resolve(Some(&file)).unwrap();

        assert_eq!(settings.input_path, "cli.csv");
        assert_eq!(settings.verification_excludes, vec!["X".to_string(), "Y".to_string()]);
        assert!(!settings.normalize_categories);

        let from_file = ImportSqlArgs::parse_from(["menu-import-sql"])
            .resolve(Some(&file))
            .unwrap();
        assert_eq!(from_file.input_path, "from-file.csv");
        assert_eq!(from_file.verification_excludes, vec!["A".to_string()]);
    }

    #[test]
    fn test_replace_defaults() {
        let settings = ReplaceSqlArgs::parse_from(["menu-replace-sql"])
            .resolve(None)
            .unwrap();
        assert_eq!(settings.input_path, "all-dishes.csv");
        assert!(!settings.normalize_categories);
        assert!(settings.output_path.is_none());
    }

    #[test]
    fn test_sync_reads_key_from_env() {
        let args = SyncCliConfig::parse_from(["menu-sync", "--supabase-url", "https://demo.supabase.co"]);
        let settings = args
            .resolve(None, |name| (name == SERVICE_KEY_ENV).then(|| "env-key".to_string()))
            .unwrap();

        assert_eq!(settings.service_key.as_deref(), Some("env-key"));
        assert_eq!(settings.batch_size, 100);
        assert_eq!(settings.timeout, Some(Duration::from_secs(30)));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_sync_file_key_wins_over_env() {
        let file = TomlConfig::from_toml_str_with(
            "[supabase]\nurl = \"https://file.supabase.co\"\nservice_key = \"file-key\"\nbatch_size = 25\n",
            no_env,
        )
        .unwrap();
        let args = SyncCliConfig::parse_from(["menu-sync", "--batch-size", "10"]);
        let settings = args
            .resolve(Some(&file), |_| Some("env-value".to_string()))
            .unwrap();

        assert_eq!(settings.service_key.as_deref(), Some("file-key"));
        assert_eq!(settings.supabase_url.as_deref(), Some("https://file.supabase.co"));
        assert_eq!(settings.batch_size, 10);
    }

    #[test]
    fn test_sync_without_key_fails_validation() {
        let args = SyncCliConfig::parse_from(["menu-sync", "--supabase-url", "https://demo.supabase.co"]);
        let settings = args.resolve(None, no_env).unwrap();

        let err = settings.validate().unwrap_err();
        assert!(matches!(err, EtlError::MissingConfigError { .. }));
        assert!(err.recovery_suggestion().contains("export SUPABASE_SERVICE_KEY"));
    }

    #[test]
    fn test_bad_delimiter_is_rejected() {
        let args = ReplaceSqlArgs::parse_from(["menu-replace-sql", "--delimiter", "é"]);
        assert!(args.resolve(None).is_err());
    }
}
