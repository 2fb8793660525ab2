use clap::Parser;
use menu_sync::config::{load_config_file, SyncSettings};
use menu_sync::utils::error::{exit_on_error, Result};
use menu_sync::utils::{logger, validation::Validate};
use menu_sync::{DryRunStore, EtlEngine, SupabaseStore, SyncCliConfig, SyncPipeline};

#[tokio::main]
async fn main() {
    let config = SyncCliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = run(config).await {
        exit_on_error(&e);
    }
}

async fn run(config: SyncCliConfig) -> Result<()> {
    let file = load_config_file(config.config.as_deref())?;
    let settings = config.resolve(file.as_ref(), |name| std::env::var(name).ok())?;
    settings.validate()?;

    if settings.dry_run {
        return dry_run(&settings).await;
    }

    println!("🚀 Starting CSV → Supabase sync...");
    println!();

    let (url, key) = settings.credentials()?;
    let store = SupabaseStore::new(url, key, settings.timeout)?;
    let pipeline =
        SyncPipeline::new(settings.csv_source(), store).with_batch_size(settings.batch_size);

    let report = EtlEngine::new(pipeline).run().await?;
    println!();
    print!("{}", report.render());

    Ok(())
}

async fn dry_run(settings: &SyncSettings) -> Result<()> {
    tracing::info!(
        "🔍 DRY RUN MODE - No remote calls will be made for {}",
        settings.input_path
    );

    let pipeline = SyncPipeline::new(settings.csv_source(), DryRunStore::new())
        .with_batch_size(settings.batch_size);
    let engine = EtlEngine::new(pipeline);
    let report = engine.run().await?;

    print!("{}", report.render_failures());
    print!("{}", engine.pipeline().store().render_plan(&report).await);

    Ok(())
}
