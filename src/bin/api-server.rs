//! Range filter API server
//!
//! Serves the latest signal per symbol from the worker's signal file.
//! Stateless; runs as a separate process from the worker.

use dotenvy::dotenv;
use rangefilter::config::{get_environment, Config};
use rangefilter::core::http::start_server;
use rangefilter::logging;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env()?;
    let port = config.port;
    let signals_file = config.signals_file.clone();

    info!("Starting range filter API server");
    info!(environment = %get_environment(), "Environment");
    info!(port = port, file = %signals_file.display(), "Serving signals from {}", signals_file.display());

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, signals_file).await {
            error!(error = %e, "HTTP server error");
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
