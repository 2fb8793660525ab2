pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::dry_run::DryRunStore;
pub use adapters::storage::{LocalStorage, StdoutStorage};
pub use adapters::supabase::SupabaseStore;
pub use app::pipelines::{ScriptPipeline, SyncPipeline};
#[cfg(feature = "cli")]
pub use config::{ImportSqlArgs, ReplaceSqlArgs, SyncCliConfig};
pub use config::{ScriptSettings, SyncSettings, TomlConfig};
pub use self::core::{csv_source::CsvSource, etl::EtlEngine, sql::ScriptFlavor};
pub use utils::error::{EtlError, Result};
