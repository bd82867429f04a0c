use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use skybook_api::{app, AppState};
use skybook_core::LocationDirectory;
use skybook_order::{settlement_for, Collaborators};
use skybook_store::{BackendClient, Config, GeoJsIpResolver, VietQrBankDirectory};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SESSION_SWEEP_SECONDS: u64 = 60;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skybook_api=debug,skybook_order=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Skybook API on port {}", config.server.port);

    let directory = LocationDirectory::load(config.search.directory_path.as_deref())
        .context("Failed to load location directory")?;
    tracing::info!("Location directory ready with {} locations", directory.len());

    // Collaborators
    let backend = Arc::new(BackendClient::new(&config.backend)?);
    let banks = Arc::new(VietQrBankDirectory::new(&config.bank_directory)?);
    let ip = Arc::new(GeoJsIpResolver::new(&config.ip_lookup)?);
    let payment = config.payment_settings();
    tracing::info!("Settlement mode: {:?}", payment.settlement);

    let collaborators = Collaborators {
        bookings: backend.clone(),
        bank_info: backend.clone(),
        banks,
        ip,
        settlement: settlement_for(payment.settlement, backend),
    };

    let state = AppState::new(Arc::new(directory), config.search.settings(), payment, collaborators);
    state.spawn_session_sweeper(Duration::from_secs(SESSION_SWEEP_SECONDS));
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
