use aisle::{
    AppContext, AppError, CatalogApp, Cli, FileStore, Flags, HttpCatalog, MemoryStore, PositionStore,
    Settings,
};
use aisle_engine::{CatalogSource, MemoryCatalog};
use aisle_runtime::ProgramOptions;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "exiting");
            eprintln!("aisle: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    settings.apply_cli(&cli)?;

    if let Some(path) = &cli.log_file {
        aisle::logging::init(Some(path.as_path()), cli.verbose).map_err(|source| AppError::Logging {
            path: path.clone(),
            source,
        })?;
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), offline = cli.offline, "aisle starting");

    let source: Arc<dyn CatalogSource> = if cli.offline {
        Arc::new(MemoryCatalog::demo())
    } else {
        Arc::new(HttpCatalog::new(&settings.api)?)
    };

    let store: Box<dyn PositionStore> = match (cli.no_persist, &settings.state.file) {
        (true, _) => Box::new(MemoryStore::new()),
        (false, Some(path)) => Box::new(FileStore::new(path)),
        (false, None) => match FileStore::default_path() {
            Some(path) => Box::new(FileStore::new(path)),
            None => {
                tracing::warn!("no state directory, position will not be saved");
                Box::new(MemoryStore::new())
            }
        },
    };

    let seed = cli.at.as_deref().map(aisle::location::decode).transpose()?;
    let size = crossterm::terminal::size().unwrap_or((80, 24));

    let options = ProgramOptions {
        fps: settings.ui.fps,
        mouse: settings.ui.mouse,
        ..ProgramOptions::default()
    };
    let flags = Flags {
        context: AppContext::new(source, store, settings),
        seed,
        size,
    };
    let app = aisle_runtime::run_with::<CatalogApp>(flags, options).await?;
    let link = app.deep_link()?;
    tracing::info!(position = %link, "aisle exited");
    Ok(())
}
