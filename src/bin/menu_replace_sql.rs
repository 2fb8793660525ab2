use clap::Parser;
use menu_sync::config::load_config_file;
use menu_sync::core::ScriptReport;
use menu_sync::utils::error::{exit_on_error, Result};
use menu_sync::utils::{logger, validation::Validate};
use menu_sync::{EtlEngine, ReplaceSqlArgs, ScriptFlavor, ScriptPipeline, StdoutStorage};

#[tokio::main]
async fn main() {
    let args = ReplaceSqlArgs::parse();
    logger::init_cli_logger(args.verbose);

    match run(args).await {
        // stdout holds the script; the summary goes to the log.
        Ok(report) => tracing::info!("{}", report.render_one_line()),
        Err(e) => exit_on_error(&e),
    }
}

async fn run(args: ReplaceSqlArgs) -> Result<ScriptReport> {
    let file = load_config_file(args.config.as_deref())?;
    let settings = args.resolve(file.as_ref())?;
    settings.validate()?;

    let source = settings.csv_source();
    let flavor = ScriptFlavor::Replace {
        source_name: source.source_name(),
    };
    let pipeline = ScriptPipeline::new(source, flavor, StdoutStorage, "-", "<stdout>");

    EtlEngine::new(pipeline).run().await
}
