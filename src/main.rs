use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use tunecourier::application::ports::TransientStore;
use tunecourier::application::services::{DeliveryOrchestrator, TrackResolver};
use tunecourier::infrastructure::extraction::YtDlpExtractor;
use tunecourier::infrastructure::messaging::{TelegramBotClient, TelegramListener};
use tunecourier::infrastructure::observability::{TracingConfig, init_tracing};
use tunecourier::infrastructure::storage::LocalTransientStore;
use tunecourier::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::new(environment, settings.logging.json));

    let store = Arc::new(LocalTransientStore::new(&settings.extraction.working_dir));
    store
        .prepare()
        .await
        .context("Failed to prepare working directory")?;

    let extractor = Arc::new(
        YtDlpExtractor::new(&settings.extraction.binary)
            .with_timeout(settings.extraction.timeout()),
    );
    let resolver = Arc::new(
        TrackResolver::new(extractor, settings.extraction.profile())
            .with_title_placeholder(&settings.delivery.title_placeholder),
    );

    let bot = Arc::new(TelegramBotClient::new(
        &settings.telegram.api_base_url,
        &settings.telegram.bot_token,
    ));

    let listener_handle = settings.telegram.listener_enabled.then(|| {
        TelegramListener::new(Arc::clone(&bot), settings.telegram.poll_timeout_secs).start()
    });

    let orchestrator = Arc::new(DeliveryOrchestrator::new(
        resolver,
        Arc::clone(&bot),
        store,
        settings.delivery.policy(),
    ));

    let router = create_router(AppState { orchestrator });

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!(%addr, environment = %environment, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = listener_handle {
        handle.stop().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
