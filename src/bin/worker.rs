//! Range filter worker
//!
//! Polls candles for every configured symbol once per candle close, runs the
//! range filter analysis and writes new signals.

use dotenvy::dotenv;
use rangefilter::config::{get_environment, Config};
use rangefilter::core::http::start_metrics_server;
use rangefilter::core::runtime::{AnalysisRuntime, RuntimeConfig};
use rangefilter::core::scheduler::{CandleSchedule, JobScheduler};
use rangefilter::db::{AnalysisDatabase, SignalFileStore};
use rangefilter::logging;
use rangefilter::metrics::Metrics;
use rangefilter::services::coinex::CoinexClient;
use rangefilter::services::market_data::MarketDataProvider;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env()?;
    info!("Starting the analysis bot...");
    info!(environment = %get_environment(), "Environment");
    info!(
        symbols = ?config.symbols,
        resolution = config.resolution_minutes,
        candles = config.candle_count,
        "Analyzing {} every {} minutes",
        config.symbols.join(", "),
        config.resolution_minutes
    );

    let metrics = Arc::new(Metrics::new()?);
    let metrics_port = config.metrics_port;
    let server_metrics = metrics.clone();
    tokio::spawn(async move {
        if let Err(e) = start_metrics_server(metrics_port, server_metrics).await {
            error!(error = %e, "Metrics server error");
        }
    });

    let provider: Arc<dyn MarketDataProvider> =
        Arc::new(CoinexClient::new(config.coinex_base_url.clone())?);
    let signal_store = Arc::new(SignalFileStore::new(config.signals_file.clone()));

    let mut runtime = AnalysisRuntime::new(RuntimeConfig::from(&config), provider, signal_store)
        .with_metrics(metrics.clone());

    match config.questdb_url.as_deref() {
        Some(url) => match AnalysisDatabase::connect(url).await {
            Ok(db) => {
                info!("QuestDB connected");
                metrics.database_connected.set(1.0);
                runtime = runtime.with_database(Arc::new(db));
            }
            Err(e) => {
                warn!(error = %e, "Failed to connect to QuestDB, analysis series will not be stored");
            }
        },
        None => info!("QUESTDB_URL not set, analysis series will not be stored"),
    }

    let schedule = CandleSchedule::new(config.resolution_minutes)?;
    let scheduler = JobScheduler::new(
        Arc::new(runtime),
        schedule,
        Duration::from_secs(config.error_backoff_seconds),
    );
    scheduler.start().await;

    info!("Worker started, waiting for shutdown signal...");
    signal::ctrl_c().await?;
    info!("Bot stopped manually by the user.");
    scheduler.stop().await;

    Ok(())
}
