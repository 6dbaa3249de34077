use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};

use metro_router::logging::init_logger;
use metro_router::planner::RouterConfig;
use metro_router::timings::{BandedTimings, TimingsConfig};
use metro_router::topology;
use metro_router::web::{AppState, create_router};

/// Stations map used when `METRO_STATIONS_MAP` is not set.
const DEFAULT_STATIONS_MAP: &str = "data/stations-map.json";

/// Address used when `METRO_ADDR` is not set.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> ExitCode {
    init_logger();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let stations_map = std::env::var("METRO_STATIONS_MAP")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIONS_MAP));
    let timings_path = std::env::var("METRO_TIMINGS").ok().map(PathBuf::from);
    let addr: SocketAddr = std::env::var("METRO_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()?;

    let network = topology::load_file(&stations_map)?;
    info!(
        path = %stations_map.display(),
        lines = network.lines().len(),
        stations = network.stations().len(),
        "Loaded network"
    );

    let timings = match &timings_path {
        Some(path) => BandedTimings::new(TimingsConfig::load(path)?)?,
        None => BandedTimings::singapore(),
    };
    info!(timezone = %timings.timezone(), "Loaded timings");

    let state = AppState::new(network, timings, RouterConfig::default());
    let app = create_router(state);

    println!("Metro router listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health              - Health check");
    println!("  GET  /stations?q=         - Search stations by name");
    println!("  GET  /routes?from=&to=&at= - Find the fastest routes");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
