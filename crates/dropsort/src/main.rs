use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::watch;

use dropsort::config::{load_config, Config};
use dropsort::logging::init_logging;
use dropsort::{
    search, BroadcastObserver, DropsortError, OllamaClient, Organizer, PipelineConfig,
    ReportGenerator, SearchOutcome, Stores, Summarizer, WatchCoordinator,
};

const USAGE: &str = "usage: dropsort [watch] [CONFIG]
       dropsort report [CONFIG]
       dropsort search QUERY [CONFIG]";

enum Command {
    Watch,
    Report,
    Search(String),
}

fn parse_args(mut args: Vec<String>) -> Option<(Command, Option<PathBuf>)> {
    let command = match args.first().map(String::as_str) {
        Some("watch") => {
            args.remove(0);
            Command::Watch
        }
        Some("report") => {
            args.remove(0);
            Command::Report
        }
        Some("search") => {
            args.remove(0);
            if args.is_empty() {
                return None;
            }
            Command::Search(args.remove(0))
        }
        Some("-h") | Some("--help") => return None,
        _ => Command::Watch,
    };

    if args.len() > 1 {
        return None;
    }
    Some((command, args.pop().map(PathBuf::from)))
}

fn main() -> ExitCode {
    let Some((command, config_path)) = parse_args(std::env::args().skip(1).collect()) else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };

    let config = match config_path {
        Some(ref path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    init_logging(&config.logging);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async {
        match command {
            Command::Watch => watch_folders(config).await,
            Command::Report => daily_report(config).await,
            Command::Search(query) => search_activity(config, &query),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn watch_folders(config: Config) -> Result<(), DropsortError> {
    info!("Starting dropsort v{}", env!("CARGO_PKG_VERSION"));

    let stores = Stores::open(config.organized_root_path(), config.retention)?;
    let backend = Arc::new(OllamaClient::new(&config.inference)?);
    info!("Using model {} at {}", backend.model(), config.inference.url);

    let organizer = Organizer::new(
        PipelineConfig::from_config(&config),
        stores,
        backend,
        Arc::new(BroadcastObserver::default()),
    )?;
    let coordinator = WatchCoordinator::new(Arc::new(organizer), config.watch_paths());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Shutdown requested");
        let _ = shutdown_tx.send(true);
    }) {
        warn!("Could not install Ctrl-C handler: {}", e);
    }

    coordinator.run(shutdown_rx).await?;
    info!("Goodbye");
    Ok(())
}

async fn daily_report(config: Config) -> Result<(), DropsortError> {
    let stores = Stores::open(config.organized_root_path(), config.retention)?;
    let backend = Arc::new(OllamaClient::new(&config.inference)?);
    let summarizer = Summarizer::new(backend, config.inference.timeout());

    let generator = ReportGenerator::new(
        Arc::clone(&stores.activity),
        summarizer,
        config.report_batch,
        stores.report_path(),
    );
    let report = generator.generate().await?;

    println!("{}", report.text);
    Ok(())
}

fn search_activity(config: Config, query: &str) -> Result<(), DropsortError> {
    let stores = Stores::open(config.organized_root_path(), config.retention)?;

    match search(&stores.activity, query) {
        SearchOutcome::Hint(hint) => println!("{}", hint),
        SearchOutcome::Matches(records) if records.is_empty() => println!("No matches found."),
        SearchOutcome::Matches(records) => {
            for record in records {
                println!(
                    "{}\n  {}\n  {} | {}\n",
                    record.original_file, record.new_path, record.category, record.reason
                );
            }
        }
    }
    Ok(())
}
