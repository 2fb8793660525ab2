use clap::Parser;
use menu_sync::config::{load_config_file, DEFAULT_SCRIPT_OUTPUT};
use menu_sync::core::ScriptReport;
use menu_sync::utils::error::{exit_on_error, Result};
use menu_sync::utils::{logger, validation::Validate};
use menu_sync::{EtlEngine, ImportSqlArgs, LocalStorage, ScriptFlavor, ScriptPipeline};

#[tokio::main]
async fn main() {
    let args = ImportSqlArgs::parse();
    logger::init_cli_logger(args.verbose);

    match run(args).await {
        Ok(report) => print!("{}", report.render_summary()),
        Err(e) => exit_on_error(&e),
    }
}

async fn run(args: ImportSqlArgs) -> Result<ScriptReport> {
    let file = load_config_file(args.config.as_deref())?;
    let settings = args.resolve(file.as_ref())?;
    settings.validate()?;

    let output = settings
        .output_path
        .clone()
        .unwrap_or_else(|| DEFAULT_SCRIPT_OUTPUT.to_string());
    tracing::info!("📁 Reading {} → {}", settings.input_path, output);

    let pipeline = ScriptPipeline::new(
        settings.csv_source(),
        ScriptFlavor::Append {
            verification_excludes: settings.verification_excludes.clone(),
        },
        LocalStorage::new(".".to_string()),
        output.clone(),
        output,
    );

    EtlEngine::new(pipeline).run().await
}
