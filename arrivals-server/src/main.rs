use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use arrivals_server::config::ServerConfig;
use arrivals_server::mbta::{MbtaClient, MockTransitApi, TransitApi};
use arrivals_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("arrivals_server=info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    let api: Arc<dyn TransitApi> = match &config.mock_file {
        Some(path) => {
            let mock = MockTransitApi::from_file(path)?;
            info!(path = %path.display(), stations = mock.stations().len(), "serving mock data");
            Arc::new(mock)
        }
        None => {
            if config.mbta.api_key.is_none() {
                warn!("MBTA_API_KEY not set; requests will be rate limited");
            }
            Arc::new(MbtaClient::new(config.mbta.clone())?)
        }
    };

    let state = AppState::new(api, &config.sessions);
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Live arrivals listening on http://{}", config.bind);
    info!("API endpoints:");
    info!("  GET  /health                    - Health check");
    info!("  GET  /api/stations              - Station list");
    info!("  GET  /api/predictions?stop=<id> - Arrivals in the next hour");

    axum::serve(listener, app).await?;
    Ok(())
}
