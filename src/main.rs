use std::sync::Arc;
use std::time::Duration;

use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use estate_news::aggregator::Aggregator;
use estate_news::config::Config;
use estate_news::fetcher::Fetcher;
use estate_news::routes::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "estate_news=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load("feeds.toml")?;
    let bind_addr = config.bind_addr.clone();
    let fetch_timeout = Duration::from_secs(config.fetch_timeout_secs);

    let registry = config.registry.into_registry();
    info!("Loaded {} feed sources from configuration", registry.len());

    // Create the aggregation pipeline
    let aggregator = Aggregator::with_fetcher(registry, Fetcher::with_timeout(fetch_timeout));
    let state = Arc::new(AppState { aggregator });

    // Build router
    let app = routes::router(state).layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server starting on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
