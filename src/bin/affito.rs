use affito::api::ListingService;
use affito::cli as prog_cli;
use affito::config::{AppConfig, CliOverrides};
use affito::store::MemoryStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "affito", version, about = "Affito listing query service CLI", long_about = None)]
struct Cli {
    /// Path to a config file (TOML)
    #[arg(long, help = "Path to a config file (TOML). Falls back to AFFITO_CONFIG, then ./affito.toml.")]
    config: Option<PathBuf>,
    /// Override the listings file (takes precedence over config and env)
    #[arg(long, help = "Listings file (NDJSON or JSON array). Takes precedence over config/env.")]
    data: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "List non-deleted listings matching filter options")]
    List {
        #[arg(help = "Filter options as JSON, e.g. '{\"priceMin\":100,\"elevator\":\"Sì\"}'")]
        filter_json: Option<String>,
    },
    #[command(about = "All non-deleted listings, summary fields only")]
    Stats,
    #[command(about = "Get one listing by id")]
    Get {
        #[arg(help = "Listing id")]
        id: String,
    },
    #[command(name = "set-state", about = "Change the review state of a listing")]
    SetState {
        #[arg(help = "Listing id")]
        id: String,
        #[arg(help = "New state: 0 (under review), 1 (approved) or 2 (rejected)")]
        state: String,
        #[arg(long, help = "Bearer token identifying the caller")]
        token: String,
        #[arg(long, help = "Write the listings file back after a successful change")]
        save: bool,
    },
    #[command(about = "Show the Mongo pipeline and post-filter for filter options")]
    Explain {
        #[arg(help = "Filter options as JSON")]
        filter_json: Option<String>,
    },
    #[command(about = "Health check")]
    Health,
    #[command(about = "Print process counters in OpenMetrics text format")]
    Metrics,
    #[command(name = "check-origin", about = "Check an Origin header against the CORS policy")]
    CheckOrigin {
        #[arg(help = "Origin, e.g. http://localhost:3000")]
        origin: String,
    },
}

impl From<Commands> for prog_cli::Command {
    fn from(c: Commands) -> Self {
        match c {
            Commands::List { filter_json } => Self::List { filter_json },
            Commands::Stats => Self::Stats,
            Commands::Get { id } => Self::Get { id },
            Commands::SetState { id, state, token, save } => Self::SetState { id, state, token, save },
            Commands::Explain { filter_json } => Self::Explain { filter_json },
            Commands::Health => Self::Health,
            Commands::Metrics => Self::Metrics,
            Commands::CheckOrigin { origin } => Self::CheckOrigin { origin },
        }
    }
}

fn init_logging(cfg: &AppConfig) {
    let level = cfg.logging.level.as_deref();
    let r = match cfg.logging.dir.as_deref() {
        Some(dir) => affito::logger::configure_logging(Some(dir), level, cfg.logging.retention),
        None => affito::logger::configure_console(level),
    };
    if let Err(e) = r {
        eprintln!("warning: logging not configured: {e}");
    }
    if let Some(ms) = cfg.logging.slow_query_ms {
        affito::telemetry::set_slow_query_ms(ms);
    }
}

fn main() {
    let cli = Cli::parse();
    let cfg = match AppConfig::load(&CliOverrides { config: cli.config.clone(), data: cli.data.clone() }) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };
    init_logging(&cfg);

    let data_file = cfg.store.data_file.clone();
    let store = match data_file.as_deref() {
        Some(p) => match MemoryStore::load(p) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(2);
            }
        },
        None => {
            log::warn!("no listings file configured; starting with an empty store");
            MemoryStore::new()
        }
    };
    let service = ListingService::from_config(store, &cfg);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match prog_cli::run(&service, cli.command.into(), data_file.as_deref(), &mut out) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
