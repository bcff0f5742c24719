use std::path::PathBuf;

use bs_app::{DEFAULT_LIBRARY_DIR, DEFAULT_RUNS_DIR, ServiceConfig, SimulationService};
use bs_server::{AppState, router};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bs-server")]
#[command(about = "batsim HTTP API - battery simulation request service", long_about = None)]
struct Args {
    /// Service configuration YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Address to listen on (overrides config and BATSIM_BIND_ADDRESS)
    #[arg(long)]
    bind: Option<String>,
    /// Maximum number of concurrent solves
    #[arg(long)]
    workers: Option<usize>,
    /// Run history directory
    #[arg(long)]
    runs_dir: Option<PathBuf>,
    /// Template and custom parameter set directory
    #[arg(long)]
    library_dir: Option<PathBuf>,
    /// Solve every request even when a stored run matches
    #[arg(long)]
    no_cache: bool,
}

fn load_config(args: &Args) -> Result<ServiceConfig, bs_app::AppError> {
    let mut config = match &args.config {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };
    config.apply_env();
    if let Some(bind) = &args.bind {
        config.bind_address = bind.clone();
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(dir) = &args.runs_dir {
        config.runs_dir = Some(dir.clone());
    }
    if config.runs_dir.is_none() {
        config.runs_dir = Some(PathBuf::from(DEFAULT_RUNS_DIR));
    }
    if let Some(dir) = &args.library_dir {
        config.library_dir = Some(dir.clone());
    }
    if config.library_dir.is_none() {
        config.library_dir = Some(PathBuf::from(DEFAULT_LIBRARY_DIR));
    }
    if args.no_cache {
        config.use_cache = false;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args)?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = config.bind_address.clone();
    let service = SimulationService::with_reference_engine(config)?;
    let app = router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("batsim API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
